//! Map tiles and their collision queries.

use std::sync::Arc;

use tessera_core::{DVec2, Localizable};

use crate::collision::{Axis, CollisionClass, CollisionFunction};

/// Index of a tile sheet within the map's sheet list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SheetId(u32);

impl SheetId {
    /// Creates a sheet identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Fixed-size grid cell of a map.
#[derive(Clone, Debug)]
pub struct Tile {
    tx: u32,
    ty: u32,
    width: u32,
    height: u32,
    sheet: SheetId,
    number: u32,
    group: Option<Arc<str>>,
    collision: Arc<CollisionClass>,
}

impl Tile {
    /// Creates a tile placed at `(tx, ty)` in tile units.
    #[must_use]
    pub fn new(
        tx: u32,
        ty: u32,
        size: (u32, u32),
        sheet: SheetId,
        number: u32,
        collision: Arc<CollisionClass>,
    ) -> Self {
        Self {
            tx,
            ty,
            width: size.0,
            height: size.1,
            sheet,
            number,
            group: None,
            collision,
        }
    }

    /// Column in tile units.
    #[must_use]
    pub const fn tx(&self) -> u32 {
        self.tx
    }

    /// Row in tile units.
    #[must_use]
    pub const fn ty(&self) -> u32 {
        self.ty
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Sheet the tile graphic comes from.
    #[must_use]
    pub const fn sheet(&self) -> SheetId {
        self.sheet
    }

    /// Index of the tile graphic within its sheet.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Tile group the tile belongs to, if any.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Assigns the tile group.
    pub fn set_group(&mut self, group: Option<Arc<str>>) {
        self.group = group;
    }

    /// Collision classification.
    #[must_use]
    pub fn collision(&self) -> &Arc<CollisionClass> {
        &self.collision
    }

    /// Replaces the collision classification.
    pub fn set_collision(&mut self, collision: Arc<CollisionClass>) {
        self.collision = collision;
    }

    /// Left edge in world units.
    #[must_use]
    pub fn x(&self) -> f64 {
        f64::from(self.tx) * f64::from(self.width)
    }

    /// Top edge in world units.
    #[must_use]
    pub fn y(&self) -> f64 {
        f64::from(self.ty) * f64::from(self.height)
    }

    /// Vertical collision line crossed by the probe between its two locations.
    #[must_use]
    pub fn collision_x(&self, probe: &impl Localizable) -> Option<f64> {
        let old = probe.old_location();
        let current = probe.location();
        self.functions_on(Axis::X).find_map(|function| {
            let line = self.line(function, current)?;
            let (low, high) = ordered(old.x, current.x);
            (low <= line && line <= high).then_some(line)
        })
    }

    /// Horizontal collision line crossed by the probe between its two locations.
    ///
    /// The crossing test is widened by the horizontal travel times the slope
    /// of the function, so a diagonal move cannot skip a sloped line.
    #[must_use]
    pub fn collision_y(&self, probe: &impl Localizable) -> Option<f64> {
        let old = probe.old_location();
        let current = probe.location();
        self.functions_on(Axis::Y).find_map(|function| {
            let line = self.line(function, current)?;
            let margin = (current.x - old.x).abs() * function.slope();
            let (low, high) = ordered(old.y, current.y);
            (low <= line + margin && high >= line - margin).then_some(line)
        })
    }

    /// Reports whether the probe crossed any collision line of the tile.
    #[must_use]
    pub fn has_collision(&self, probe: &impl Localizable) -> bool {
        self.collision_x(probe).is_some() || self.collision_y(probe).is_some()
    }

    fn functions_on(&self, axis: Axis) -> impl Iterator<Item = &CollisionFunction> {
        self.collision
            .functions()
            .iter()
            .filter(move |function| function.axis() == axis)
    }

    fn line(&self, function: &CollisionFunction, location: DVec2) -> Option<f64> {
        let input = self.relative_input(function.input(), location);
        if !function.accepts(input) {
            return None;
        }
        let origin = match function.axis() {
            Axis::X => self.x(),
            Axis::Y => self.y(),
        };
        Some(origin + function.compute(f64::from(input)))
    }

    fn relative_input(&self, input: Axis, location: DVec2) -> u32 {
        let (coordinate, origin, size) = match input {
            Axis::X => (location.x, self.x(), self.width),
            Axis::Y => (location.y, self.y(), self.height),
        };
        let upper = f64::from(size.saturating_sub(1));
        (coordinate - origin).floor().clamp(0.0, upper) as u32
    }
}

fn ordered(first: f64, second: f64) -> (f64, f64) {
    if first <= second {
        (first, second)
    } else {
        (second, first)
    }
}
