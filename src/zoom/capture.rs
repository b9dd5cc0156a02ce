/// Magnifier capture: crop from the full-resolution source, then rescale
///
/// The crop is always cut from the original image, so the preview shows
/// real source pixels no matter how far the pane bitmap was downscaled.
use image::{imageops::FilterType, ImageBuffer, RgbaImage};

use super::mapper::SourcePoint;
use super::view::{fit_size, SourceView};
use crate::state::data::{Interpolation, SelectionBox, ZoomSettings};

/// Crop rectangle in source pixels; may hang over the image edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x + i64::from(self.width) <= i64::from(width)
            && self.y + i64::from(self.height) <= i64::from(height)
    }
}

/// Size of the selection box in source pixels (floored)
pub fn source_rect_size(select_box: SelectionBox, scale_ratio: f64) -> (u32, u32) {
    (
        (f64::from(select_box.width) * scale_ratio).floor() as u32,
        (f64::from(select_box.height) * scale_ratio).floor() as u32,
    )
}

/// Crop rectangle of `size` centered on `center`
pub fn crop_rect(center: SourcePoint, size: (u32, u32)) -> CropRect {
    CropRect {
        x: i64::from(center.x) - i64::from(size.0 / 2),
        y: i64::from(center.y) - i64::from(size.1 / 2),
        width: size.0,
        height: size.1,
    }
}

/// Copy `rect` out of `image`, reading the nearest edge pixel for any part
/// of the rectangle outside the image
pub fn crop_clamped(image: &RgbaImage, rect: CropRect) -> RgbaImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return RgbaImage::new(rect.width, rect.height);
    }

    if rect.fits_within(width, height) {
        return image::imageops::crop_imm(
            image,
            rect.x as u32,
            rect.y as u32,
            rect.width,
            rect.height,
        )
        .to_image();
    }

    let max_x = i64::from(width) - 1;
    let max_y = i64::from(height) - 1;
    ImageBuffer::from_fn(rect.width, rect.height, |cx, cy| {
        let sx = (rect.x + i64::from(cx)).clamp(0, max_x) as u32;
        let sy = (rect.y + i64::from(cy)).clamp(0, max_y) as u32;
        *image.get_pixel(sx, sy)
    })
}

fn filter_for(interpolation: Interpolation) -> FilterType {
    match interpolation {
        Interpolation::Nearest => FilterType::Nearest,
        Interpolation::Smooth => FilterType::Triangle,
    }
}

/// Rescale a crop into the zoom area, keeping its aspect ratio
pub fn magnify(crop: &RgbaImage, settings: &ZoomSettings) -> Option<RgbaImage> {
    let (w, h) = fit_size(crop.dimensions(), settings.zoom_area());
    if w == 0 || h == 0 {
        return None;
    }
    Some(image::imageops::resize(crop, w, h, filter_for(settings.interpolation)))
}

/// Full capture for one pane: size, position, crop and magnify
///
/// The source rectangle never exceeds the source image. Returns `None` only
/// when the box or zoom area is degenerate (0 px).
pub fn capture(view: &SourceView, center: SourcePoint, settings: &ZoomSettings) -> Option<RgbaImage> {
    let (source_w, source_h) = view.source_size();
    let size = source_rect_size(settings.select_box, view.scale_ratio());
    let size = (size.0.min(source_w), size.1.min(source_h));
    if size.0 == 0 || size.1 == 0 {
        return None;
    }

    let crop = crop_clamped(view.original(), crop_rect(center, size));
    magnify(&crop, settings)
}
