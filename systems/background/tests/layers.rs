use image::RgbaImage;
use tessera_core::{DrawCall, Image, RecordingGraphic, Rectangle};
use tessera_system_background::{
    Background, BackgroundComponent, BackgroundElement, CloudLine, Clouds, Parallax,
};

fn image(width: u32, height: u32) -> Image {
    Image::new(RgbaImage::new(width, height))
}

#[test]
fn parallax_bands_drift_with_depth_and_wrap() {
    let sprite = image(40, 30);
    let mut parallax = Parallax::new(sprite.clone(), 3, 0.5, 0.0, 0.0);
    for _ in 0..12 {
        parallax.update(0.0, 6.0, 4.0, 1.0);
    }
    assert_eq!(parallax.offsets(), &[0.0, 24.0, 8.0]);

    let mut g = RecordingGraphic::new();
    parallax.render(&mut g);
    let calls = g.take_calls();
    assert_eq!(calls.len(), 6, "each band tiles twice");
    assert_eq!(
        calls[4..],
        [
            DrawCall::ImageRegion {
                image: sprite.id(),
                source: Rectangle::new(0.0, 20.0, 40.0, 10.0),
                x: -8,
                y: 26,
            },
            DrawCall::ImageRegion {
                image: sprite.id(),
                source: Rectangle::new(0.0, 20.0, 40.0, 10.0),
                x: 32,
                y: 26,
            },
        ]
    );
}

#[test]
fn long_runs_stay_within_sprite_width() {
    let mut parallax = Parallax::new(image(64, 8), 4, 0.3, 0.0, 0.0);
    for _ in 0..100_000 {
        parallax.update(0.0, 0.0, 1.7, 1.0);
    }
    assert!(parallax.offsets().iter().all(|offset| (0.0..64.0).contains(offset)));
}

#[test]
fn cloud_lines_scroll_independently() {
    let slow = image(50, 10);
    let fast = image(20, 10);
    let mut clouds = Clouds::new(vec![
        CloudLine::new(slow.clone(), 5.0, 1.0),
        CloudLine::new(fast.clone(), 30.0, 3.0),
    ]);
    for _ in 0..5 {
        clouds.update(0.0, 0.0, 2.0, 1.0);
    }

    let offsets: Vec<_> = clouds.lines().iter().map(CloudLine::offset).collect();
    assert_eq!(offsets, vec![10.0, 10.0]);
}

#[test]
fn layers_render_in_order_with_vertical_offset() {
    let sky = image(16, 16);
    let hill = image(8, 8);
    let mut background = Background::new(0.0, 100.0, 20.0).expect("valid range");
    background.add_component(BackgroundElement::new(sky.clone(), 0.0, 0.0));
    background.add_component(Clouds::new(vec![CloudLine::new(hill.clone(), 4.0, 1.0)]));

    background.update(1.0, 50.0, 1.0);
    assert_eq!(background.offset_y(), 10.0);

    let mut g = RecordingGraphic::new();
    background.render(&mut g);
    assert_eq!(
        g.calls(),
        &[
            DrawCall::Image {
                image: sky.id(),
                x: 0,
                y: 10
            },
            DrawCall::Image {
                image: hill.id(),
                x: -1,
                y: 14
            },
            DrawCall::Image {
                image: hill.id(),
                x: 7,
                y: 14
            },
        ]
    );
}
