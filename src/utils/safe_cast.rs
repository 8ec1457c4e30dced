//! Safe casting utilities for pixel and desktop coordinates

use crate::{Error, Result};

/// Convert a frame dimension reported by `OpenCV` to `u32`
///
/// # Errors
///
/// Returns an error if the value is negative
pub fn i32_to_u32(value: i32) -> Result<u32> {
    value
        .try_into()
        .map_err(|_| Error::InvalidInput(format!("Dimension {value} is negative")))
}

/// Convert a desktop coordinate to the X11 `i16` range, saturating
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Clamping ensures safe truncation
pub fn i32_to_i16_clamp(value: i32) -> i16 {
    value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

/// Clamp and convert f64 to i32 for pixel coordinates
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Clamping ensures safe truncation
pub fn f64_to_i32_clamp(value: f64, min: i32, max: i32) -> i32 {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };

    if value.is_nan() {
        return min;
    }

    value.clamp(f64::from(min), f64::from(max)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_i32_to_u32() {
        assert_eq!(i32_to_u32(640).unwrap(), 640);
        assert_eq!(i32_to_u32(0).unwrap(), 0);
        assert!(i32_to_u32(-1).is_err());
    }

    #[test]
    fn test_i32_to_i16_clamp() {
        assert_eq!(i32_to_i16_clamp(1234), 1234);
        assert_eq!(i32_to_i16_clamp(-1234), -1234);
        assert_eq!(i32_to_i16_clamp(40_000), i16::MAX);
        assert_eq!(i32_to_i16_clamp(-40_000), i16::MIN);
    }

    #[test]
    fn test_f64_to_i32_clamp() {
        assert_eq!(f64_to_i32_clamp(50.7, 0, 100), 50);
        assert_eq!(f64_to_i32_clamp(-10.0, 0, 100), 0);
        assert_eq!(f64_to_i32_clamp(150.0, 0, 100), 100);
        assert_eq!(f64_to_i32_clamp(f64::NAN, 0, 100), 0);
        assert_eq!(f64_to_i32_clamp(f64::INFINITY, 0, 100), 100);
        assert_eq!(f64_to_i32_clamp(5.0, 100, 0), 5);
    }

    proptest! {
        #[test]
        fn prop_i16_clamp_is_identity_in_range(value in i16::MIN..=i16::MAX) {
            prop_assert_eq!(i32_to_i16_clamp(i32::from(value)), value);
        }

        #[test]
        fn prop_f64_clamp_within_bounds(value in any::<f64>(), a in any::<i32>(), b in any::<i32>()) {
            let result = f64_to_i32_clamp(value, a, b);
            prop_assert!(result >= a.min(b));
            prop_assert!(result <= a.max(b));
        }
    }
}
