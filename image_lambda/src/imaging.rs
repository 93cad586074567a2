//! Thumbnail rendering.
//!
//! Decoding and encoding are CPU bound and blocking; async callers go through
//! `tokio::task::spawn_blocking`.

use std::path::Path;

use image::imageops::FilterType;
use image::{GenericImageView, ImageFormat};
use lambda_runtime::tracing;

use crate::error::PipelineError;

/// Dimensions of `width` x `height` scaled to fit a `max` x `max` box.
/// Images already inside the box keep their size.
pub fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }
    let scale = |side: u32, long: u32| {
        let scaled = (u64::from(side) * u64::from(max) + u64::from(long) / 2) / u64::from(long);
        (scaled as u32).max(1)
    };
    if width >= height {
        (max, scale(height, width))
    } else {
        (scale(width, height), max)
    }
}

/// Identify the container format from the leading magic bytes.
pub fn sniff_format(key: &str, bytes: &[u8]) -> Result<ImageFormat, PipelineError> {
    image::guess_format(bytes).map_err(|source| PipelineError::UnsupportedImage {
        key: key.to_string(),
        source,
    })
}

/// Decode `source`, shrink it into the `max_dimension` box and write it to
/// `target` in the same container `format`. Returns the new dimensions.
pub fn render_thumbnail(
    source: &Path,
    target: &Path,
    format: ImageFormat,
    max_dimension: u32,
) -> Result<(u32, u32), PipelineError> {
    let img = image::ImageReader::open(source)?
        .with_guessed_format()?
        .decode()?;

    let (orig_w, orig_h) = img.dimensions();
    let (new_w, new_h) = fit_within(orig_w, orig_h, max_dimension);
    tracing::debug!(orig_w, orig_h, new_w, new_h, "resizing image");

    let thumb = if (new_w, new_h) == (orig_w, orig_h) {
        img
    } else {
        img.resize_exact(new_w, new_h, FilterType::Triangle)
    };
    thumb.save_with_format(target, format)?;
    Ok((new_w, new_h))
}


#[cfg(test)]
mod tests {
    use super::test_support::encoded_image;
    use super::*;

    #[test]
    fn test_fit_within_landscape_and_portrait() {
        assert_eq!(fit_within(1200, 800, 128), (128, 85));
        assert_eq!(fit_within(800, 1200, 128), (85, 128));
        assert_eq!(fit_within(500, 500, 128), (128, 128));
    }

    #[test]
    fn test_fit_within_never_upscales() {
        assert_eq!(fit_within(64, 32, 128), (64, 32));
        assert_eq!(fit_within(128, 128, 128), (128, 128));
    }

    #[test]
    fn test_fit_within_keeps_a_pixel_on_extreme_ratios() {
        assert_eq!(fit_within(10_000, 3, 128), (128, 1));
        assert_eq!(fit_within(1, 4_000, 128), (1, 128));
    }

    #[test]
    fn test_fit_within_preserves_ratio() {
        for (w, h) in [(1920, 1080), (333, 777), (4032, 3024), (129, 1000)] {
            let (tw, th) = fit_within(w, h, 128);
            assert!(tw <= 128 && th <= 128);
            let (short, expected) = if w >= h {
                (th, 128.0 * f64::from(h) / f64::from(w))
            } else {
                (tw, 128.0 * f64::from(w) / f64::from(h))
            };
            assert!((expected - f64::from(short)).abs() <= 1.0, "{w}x{h} -> {tw}x{th}");
        }
    }

    #[test]
    fn test_sniff_format() {
        let png = encoded_image(4, 4, ImageFormat::Png);
        assert_eq!(sniff_format("uploads/a.jpg", &png).unwrap(), ImageFormat::Png);

        let err = sniff_format("uploads/a.jpg", b"plain text, not an image").unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedImage { .. }));
    }

    #[test]
    fn test_render_thumbnail_bounds_and_format() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("wide.jpg");
        let target = dir.path().join("thumb-wide.jpg");
        std::fs::write(&source, encoded_image(640, 320, ImageFormat::Jpeg)).unwrap();

        let dims = render_thumbnail(&source, &target, ImageFormat::Jpeg, 128).unwrap();
        assert_eq!(dims, (128, 64));

        let written = std::fs::read(&target).unwrap();
        assert_eq!(image::guess_format(&written).unwrap(), ImageFormat::Jpeg);
        let thumb = image::load_from_memory(&written).unwrap();
        assert_eq!(thumb.dimensions(), (128, 64));
    }

    #[test]
    fn test_render_thumbnail_keeps_png_container() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("tall.jpg");
        let target = dir.path().join("thumb-tall.jpg");
        std::fs::write(&source, encoded_image(90, 300, ImageFormat::Png)).unwrap();

        let dims = render_thumbnail(&source, &target, ImageFormat::Png, 128).unwrap();
        assert_eq!(dims, (38, 128));
        let written = std::fs::read(&target).unwrap();
        assert_eq!(image::guess_format(&written).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_render_thumbnail_rejects_corrupt_data() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("broken.jpg");
        let mut bytes = encoded_image(64, 64, ImageFormat::Png);
        bytes.truncate(24);
        std::fs::write(&source, bytes).unwrap();

        let result = render_thumbnail(
            &source,
            &dir.path().join("thumb-broken.jpg"),
            ImageFormat::Png,
            128,
        );
        assert!(result.is_err());
    }
}
