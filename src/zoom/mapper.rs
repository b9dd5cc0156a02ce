/// Display-space to source-space coordinate mapping
///
/// A pane shows a downscaled copy of its source image, centered in the pane
/// when the pane is larger than the bitmap. Mapping removes the centering
/// offset and multiplies by the pane's scale ratio (source / displayed).

/// Geometry needed to map one pane's cursor into its source image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneGeometry {
    /// Size of the pane on screen
    pub viewport: (u32, u32),
    /// Size of the displayed (scaled) bitmap
    pub bitmap: (u32, u32),
    /// Size of the full-resolution source image
    pub source: (u32, u32),
    /// Source height / displayed height
    pub scale_ratio: f64,
}

/// A pixel position in the full-resolution source image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePoint {
    pub x: u32,
    pub y: u32,
}

/// Offset of a centered bitmap inside its viewport, per axis
pub fn centering_offset(viewport: (u32, u32), bitmap: (u32, u32)) -> (i32, i32) {
    let axis = |view: u32, bmp: u32| {
        if view > bmp {
            ((view - bmp) / 2) as i32
        } else {
            0
        }
    };
    (axis(viewport.0, bitmap.0), axis(viewport.1, bitmap.1))
}

/// Scaled source-space position before bounds checking
pub fn source_position(display_x: i32, display_y: i32, geometry: &PaneGeometry) -> (f64, f64) {
    let (x_offset, y_offset) = centering_offset(geometry.viewport, geometry.bitmap);
    (
        f64::from(display_x - x_offset) * geometry.scale_ratio,
        f64::from(display_y - y_offset) * geometry.scale_ratio,
    )
}

/// Map a display position to a source pixel
///
/// Returns `None` when the position is outside the image. Bounds are strict
/// on both ends, so a position mapping exactly onto row or column 0 is
/// outside too. Callers skip the capture instead of clamping.
pub fn map_to_source(display_x: i32, display_y: i32, geometry: &PaneGeometry) -> Option<SourcePoint> {
    let (adjusted_x, adjusted_y) = source_position(display_x, display_y, geometry);
    let (width, height) = geometry.source;

    let inside = adjusted_x > 0.0
        && adjusted_x < f64::from(width)
        && adjusted_y > 0.0
        && adjusted_y < f64::from(height);
    if !inside {
        return None;
    }

    Some(SourcePoint {
        x: adjusted_x.floor() as u32,
        y: adjusted_y.floor() as u32,
    })
}
