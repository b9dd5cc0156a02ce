/// Pixelwise difference maps against the reference pane
///
/// Each compared image is diffed against the reference per color channel,
/// reduced to grayscale, and then the whole batch is stretched to 0..=255
/// using one shared min/max so intensities are comparable across panes.
use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};

/// What to do when a compared image has different dimensions
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiffPolicy {
    /// Leave that pane without a map and keep going
    #[default]
    SkipMismatched,
    /// Fail the whole batch
    Abort,
}

/// Normalized maps for panes 1..N (index 0 here is pane 1)
#[derive(Debug, Default)]
pub struct DiffBatch {
    pub maps: Vec<Option<GrayImage>>,
    /// Mismatches dropped under `DiffPolicy::SkipMismatched`
    pub skipped: Vec<ViewerError>,
    /// Shared (min, max) before normalization, if any map was produced
    pub range: Option<(u8, u8)>,
}

/// Absolute per-channel difference, converted to grayscale
///
/// `index` is the pane index, used only for the mismatch error.
pub fn abs_diff_gray(index: usize, reference: &RgbaImage, image: &RgbaImage) -> Result<GrayImage> {
    if reference.dimensions() != image.dimensions() {
        return Err(ViewerError::DimensionMismatch {
            index,
            expected: reference.dimensions(),
            found: image.dimensions(),
        });
    }

    let (width, height) = reference.dimensions();
    let diff: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(width, height, |x, y| {
        let a = reference.get_pixel(x, y).0;
        let b = image.get_pixel(x, y).0;
        Rgb([a[0].abs_diff(b[0]), a[1].abs_diff(b[1]), a[2].abs_diff(b[2])])
    });

    Ok(DynamicImage::ImageRgb8(diff).into_luma8())
}

/// Global (min, max) over every pixel of every map
pub fn batch_range<'a>(maps: impl IntoIterator<Item = &'a GrayImage>) -> Option<(u8, u8)> {
    maps.into_iter()
        .flat_map(|map| map.pixels().map(|p| p.0[0]))
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Stretch `map` linearly so `min` becomes 0 and `max` becomes 255
///
/// Values outside `[min, max]` are masked to 0. A flat range (`min == max`)
/// produces an all-zero map.
pub fn normalize(map: &GrayImage, min: u8, max: u8) -> GrayImage {
    let (width, height) = map.dimensions();
    if min >= max {
        return GrayImage::new(width, height);
    }

    let span = f32::from(max - min);
    ImageBuffer::from_fn(width, height, |x, y| {
        let v = map.get_pixel(x, y).0[0];
        if v < min || v > max {
            return Luma([0]);
        }
        let scaled = f32::from(v - min) * 255.0 / span;
        Luma([scaled.round().clamp(0.0, 255.0) as u8])
    })
}

/// Diff every compared image against `reference`
///
/// `images[i]` belongs to pane `i + 1`; `None` entries (pane without an
/// image) stay `None` in the output.
pub fn compute_diffs(
    reference: &RgbaImage,
    images: &[Option<&RgbaImage>],
    policy: DiffPolicy,
) -> Result<DiffBatch> {
    let mut raw: Vec<Option<GrayImage>> = Vec::with_capacity(images.len());
    let mut skipped = Vec::new();

    for (offset, image) in images.iter().enumerate() {
        let Some(image) = image else {
            raw.push(None);
            continue;
        };

        match abs_diff_gray(offset + 1, reference, image) {
            Ok(map) => raw.push(Some(map)),
            Err(e) if policy == DiffPolicy::SkipMismatched => {
                log::warn!("⚠️  Skipping diff: {}", e);
                skipped.push(e);
                raw.push(None);
            }
            Err(e) => return Err(e),
        }
    }

    let range = batch_range(raw.iter().flatten());
    let maps = match range {
        Some((min, max)) => raw
            .iter()
            .map(|m| m.as_ref().map(|m| normalize(m, min, max)))
            .collect(),
        None => raw,
    };

    if let Some((min, max)) = range {
        log::info!("📊 Diff batch normalized over range {}..={}", min, max);
    }

    Ok(DiffBatch {
        maps,
        skipped,
        range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gray_rgba(width: u32, height: u32, v: u8) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([v, v, v, 255]))
    }

    #[test]
    fn test_abs_diff_is_symmetric_per_channel() {
        let reference = gray_rgba(4, 4, 50);
        let brighter = gray_rgba(4, 4, 80);
        let darker = gray_rgba(4, 4, 20);

        let a = abs_diff_gray(1, &reference, &brighter).unwrap();
        let b = abs_diff_gray(2, &reference, &darker).unwrap();
        assert!(a.pixels().all(|p| p.0[0] == 30));
        assert_eq!(a, b);
    }

    #[test]
    fn test_identical_images_diff_to_zero() {
        let image = ImageBuffer::from_fn(8, 8, |x, y| Rgba([x as u8 * 20, y as u8 * 10, 7, 255]));
        let map = abs_diff_gray(1, &image, &image).unwrap();
        assert!(map.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_dimension_mismatch_is_an_error() {
        let err = abs_diff_gray(3, &gray_rgba(4, 4, 0), &gray_rgba(4, 5, 0)).unwrap_err();
        assert!(matches!(
            err,
            ViewerError::DimensionMismatch { index: 3, expected: (4, 4), found: (4, 5) }
        ));
    }

    #[test]
    fn test_batch_normalization_uses_shared_range() {
        // Pane A spans 10..=48, pane B spans 48..=200: global range 10..=200
        let a = GrayImage::from_raw(2, 1, vec![10, 48]).unwrap();
        let b = GrayImage::from_raw(2, 1, vec![48, 200]).unwrap();

        assert_eq!(batch_range([&a, &b]), Some((10, 200)));
        assert_eq!(normalize(&a, 10, 200).as_raw(), &vec![0, 51]);
        assert_eq!(normalize(&b, 10, 200).as_raw(), &vec![51, 255]);
    }

    #[test]
    fn test_flat_range_normalizes_to_zero() {
        let reference = gray_rgba(3, 3, 100);
        let same_shift = [gray_rgba(3, 3, 142), gray_rgba(3, 3, 58)];
        let images: Vec<_> = same_shift.iter().map(Some).collect();

        let batch = compute_diffs(&reference, &images, DiffPolicy::Abort).unwrap();
        assert_eq!(batch.range, Some((42, 42)));
        assert!(batch.maps.iter().flatten().all(|m| m.pixels().all(|p| p.0[0] == 0)));
    }

    #[test]
    fn test_values_outside_range_are_masked() {
        let map = GrayImage::from_raw(3, 1, vec![5, 20, 250]).unwrap();
        let out = normalize(&map, 10, 200);
        assert_eq!(out.as_raw(), &vec![0, 13, 0]);
    }

    #[test]
    fn test_compute_diffs_skips_missing_and_mismatched() {
        let reference = gray_rgba(4, 4, 100);
        let close = gray_rgba(4, 4, 110);
        let far = gray_rgba(4, 4, 160);
        let wrong_size = gray_rgba(2, 2, 100);

        let images = [Some(&close), None, Some(&wrong_size), Some(&far)];
        let batch = compute_diffs(&reference, &images, DiffPolicy::SkipMismatched).unwrap();

        assert_eq!(batch.maps.len(), 4);
        assert_eq!(batch.range, Some((10, 60)));
        assert!(batch.maps[0].as_ref().unwrap().pixels().all(|p| p.0[0] == 0));
        assert!(batch.maps[1].is_none());
        assert!(batch.maps[2].is_none());
        assert!(batch.maps[3].as_ref().unwrap().pixels().all(|p| p.0[0] == 255));
        assert_eq!(batch.skipped.len(), 1);
    }

    #[test]
    fn test_compute_diffs_abort_policy() {
        let reference = gray_rgba(4, 4, 100);
        let wrong_size = gray_rgba(3, 4, 100);
        let result = compute_diffs(&reference, &[Some(&wrong_size)], DiffPolicy::Abort);
        assert!(matches!(result, Err(ViewerError::DimensionMismatch { index: 1, .. })));
    }
}
