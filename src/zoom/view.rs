/// Source image paired with its display-scaled bitmap
///
/// The original buffer, the displayed bitmap and the ratio between them are
/// built together and replaced together, so a pane can never map a cursor
/// through a ratio that belongs to a different image.
use image::{imageops::FilterType, RgbaImage};

/// Largest size with `source`'s aspect ratio that fits inside `target`
///
/// Integer arithmetic; a non-empty source never collapses below 1 px.
pub fn fit_size(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (w, h) = (u64::from(source.0), u64::from(source.1));
    let (tw, th) = (u64::from(target.0), u64::from(target.1));
    if w == 0 || h == 0 || tw == 0 || th == 0 {
        return (0, 0);
    }

    // Width if we use the full target height
    let rw = th * w / h;
    let (fw, fh) = if rw <= tw { (rw, th) } else { (tw, tw * h / w) };
    (fw.max(1) as u32, fh.max(1) as u32)
}

#[derive(Debug, Clone)]
pub struct SourceView {
    original: RgbaImage,
    display: RgbaImage,
    scale_ratio: f64,
}

impl SourceView {
    /// Scale `original` to fit `viewport` and record the ratio
    ///
    /// An empty viewport shows the image at its own size.
    pub fn new(original: RgbaImage, viewport: (u32, u32)) -> Self {
        let viewport = if viewport.0 == 0 || viewport.1 == 0 {
            original.dimensions()
        } else {
            viewport
        };

        let (dw, dh) = fit_size(original.dimensions(), viewport);
        let display = if (dw, dh) == original.dimensions() {
            original.clone()
        } else {
            image::imageops::resize(&original, dw, dh, FilterType::Triangle)
        };

        let scale_ratio = if display.height() == 0 {
            1.0
        } else {
            f64::from(original.height()) / f64::from(display.height())
        };

        Self {
            original,
            display,
            scale_ratio,
        }
    }

    /// Rebuild the display bitmap for a new viewport
    pub fn rescaled(self, viewport: (u32, u32)) -> Self {
        Self::new(self.original, viewport)
    }

    pub fn original(&self) -> &RgbaImage {
        &self.original
    }

    pub fn display(&self) -> &RgbaImage {
        &self.display
    }

    /// Source height / displayed height
    pub fn scale_ratio(&self) -> f64 {
        self.scale_ratio
    }

    pub fn source_size(&self) -> (u32, u32) {
        self.original.dimensions()
    }

    pub fn display_size(&self) -> (u32, u32) {
        self.display.dimensions()
    }
}
