/// Image decoding for the panes
///
/// Every pane works on 8-bit RGBA regardless of the file's own layout, so
/// crops, diffs and display handles share one pixel format.
use image::RgbaImage;
use std::path::Path;

use crate::error::{Result, ViewerError};

/// Decode the image at `path` into RGBA8
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|source| ViewerError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("📷 Loaded {} ({}x{})", path.display(), img.width(), img.height());
    Ok(img.into_rgba8())
}
