//! Raster count, wrap and mirroring rules.

use tessera_core::{EngineError, Result};

/// Largest number of authored rasters per set.
pub const MAX_RASTERS: u32 = 20;

/// Derives every raster constant from one count and the smooth flag.
///
/// Without smoothing `count` rasters are generated and the lookup mirrors
/// over a period of `2 * count`, visiting `0..=mid` then `mid..=0`. With
/// smoothing the mirrored half is generated as well, so `2 * count`
/// rasters are looked up without mirroring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RasterPolicy {
    count: u32,
    smooth: bool,
}

impl RasterPolicy {
    /// Creates a policy, rejecting counts outside `1..=MAX_RASTERS`.
    pub fn new(count: u32, smooth: bool) -> Result<Self> {
        if (1..=MAX_RASTERS).contains(&count) {
            Ok(Self { count, smooth })
        } else {
            Err(EngineError::invalid(
                "raster policy",
                format!("raster count {count} must lie in 1..={MAX_RASTERS}"),
            ))
        }
    }

    /// Authored raster count.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Reports whether the mirrored half is generated.
    #[must_use]
    pub const fn smooth(&self) -> bool {
        self.smooth
    }

    /// Number of images generated.
    #[must_use]
    pub const fn generated(&self) -> u32 {
        if self.smooth {
            self.count * 2
        } else {
            self.count
        }
    }

    /// Period of the index lookup.
    #[must_use]
    pub const fn wrap(&self) -> u32 {
        self.count * 2
    }

    /// Highest index reached before mirroring.
    #[must_use]
    pub const fn mid(&self) -> u32 {
        self.count - 1
    }

    /// Raster index for the vertical position `y`.
    #[must_use]
    pub fn index(&self, y: f64, raster_height: u32) -> usize {
        let band = (y / f64::from(raster_height.max(1))).floor();
        let band = if band.is_finite() { band as i64 } else { 0 };
        let index = band.rem_euclid(i64::from(self.wrap())) as u32;
        let index = if !self.smooth && index > self.mid() {
            self.mid() - (index - self.count)
        } else {
            index
        };
        index as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_bounded() {
        assert!(RasterPolicy::new(0, false).is_err());
        assert!(RasterPolicy::new(MAX_RASTERS + 1, true).is_err());
        assert!(RasterPolicy::new(MAX_RASTERS, true).is_ok());
    }

    #[test]
    fn non_smooth_lookup_mirrors_symmetrically() {
        let policy = RasterPolicy::new(4, false).expect("valid policy");
        let indices: Vec<_> = (0..8).map(|band| policy.index(f64::from(band) * 10.0, 10)).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 3, 2, 1, 0]);
        assert_eq!(policy.generated(), 4);
    }

    #[test]
    fn smooth_lookup_never_mirrors() {
        let policy = RasterPolicy::new(3, true).expect("valid policy");
        let indices: Vec<_> = (0..6).map(|band| policy.index(f64::from(band) * 10.0, 10)).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(policy.generated(), 6);
    }

    #[test]
    fn lookup_has_period_of_wrap() {
        for smooth in [false, true] {
            let policy = RasterPolicy::new(5, smooth).expect("valid policy");
            let period = f64::from(policy.wrap() * 16);
            for step in -40..40 {
                let y = f64::from(step) * 7.5;
                assert_eq!(
                    policy.index(y, 16),
                    policy.index(y + period, 16),
                    "index at {y} should repeat after one period"
                );
                assert!(policy.index(y, 16) < policy.generated() as usize);
            }
        }
    }

    #[test]
    fn single_raster_always_selects_zero() {
        let policy = RasterPolicy::new(1, false).expect("valid policy");
        assert_eq!(policy.index(0.0, 8), 0);
        assert_eq!(policy.index(8.0, 8), 0);
        assert_eq!(policy.index(-8.0, 8), 0);
    }
}
