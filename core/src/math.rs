//! Small numeric helpers.

/// Wraps `value` into `[min, max)`.
///
/// Uses the Euclidean remainder so long-running offsets never accumulate
/// drift past the range. A degenerate range yields `min`.
#[must_use]
pub fn wrap(value: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    if range <= 0.0 {
        return min;
    }
    let wrapped = min + (value - min).rem_euclid(range);
    if wrapped >= max {
        min
    } else {
        wrapped
    }
}

/// Returns `-1.0`, `0.0` or `1.0` following the sign of `value`.
#[must_use]
pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_handles_negative_values() {
        assert_eq!(wrap(-1.0, 0.0, 10.0), 9.0);
        assert_eq!(wrap(25.0, 0.0, 10.0), 5.0);
        assert_eq!(wrap(10.0, 0.0, 10.0), 0.0);
    }

    #[test]
    fn wrap_with_empty_range_returns_min() {
        assert_eq!(wrap(3.0, 2.0, 2.0), 2.0);
    }

    #[test]
    fn sign_of_zero_is_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-4.5), -1.0);
        assert_eq!(sign(0.1), 1.0);
    }
}
