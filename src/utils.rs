//! Utility functions for frame geometry and coordinate conversions.

pub mod safe_cast;

/// Size of an image scaled to fit a model input while keeping its aspect ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    /// Scaled width, at most the target width
    pub width: i32,
    /// Scaled height, at most the target height
    pub height: i32,
    /// Factor that maps source pixels to scaled pixels
    pub scale: f32,
}

/// Fit a `src_width` x `src_height` image inside `dst_width` x `dst_height`.
///
/// The scaled image is anchored at the top-left corner of the target and the
/// remainder is padding.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn letterbox(src_width: i32, src_height: i32, dst_width: i32, dst_height: i32) -> Letterbox {
    if src_width <= 0 || src_height <= 0 {
        return Letterbox {
            width: dst_width,
            height: dst_height,
            scale: 1.0,
        };
    }

    let src_ratio = src_height as f32 / src_width as f32;
    let dst_ratio = dst_height as f32 / dst_width as f32;

    let (width, height) = if src_ratio > dst_ratio {
        ((dst_height as f32 / src_ratio) as i32, dst_height)
    } else {
        (dst_width, (dst_width as f32 * src_ratio) as i32)
    };

    Letterbox {
        width: width.max(1),
        height: height.max(1),
        scale: height as f32 / src_height as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letterbox_landscape() {
        let lb = letterbox(640, 480, 640, 640);
        assert_eq!((lb.width, lb.height), (640, 480));
        assert!((lb.scale - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_letterbox_downscale() {
        let lb = letterbox(1280, 720, 640, 640);
        assert_eq!((lb.width, lb.height), (640, 360));
        assert!((lb.scale - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_letterbox_portrait() {
        let lb = letterbox(480, 960, 640, 640);
        assert_eq!((lb.width, lb.height), (320, 640));
        assert!((lb.scale - (640.0 / 960.0)).abs() < 1e-6);
    }

    #[test]
    fn test_letterbox_empty_source() {
        let lb = letterbox(0, 0, 640, 640);
        assert_eq!((lb.width, lb.height), (640, 640));
    }
}
