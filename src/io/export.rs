/// Comparison batch: the frozen crops of every pane, tiled for saving
use chrono::NaiveDateTime;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::path::Path;

use crate::error::{Result, ViewerError};

/// Space between tiles and around the border
pub const GUTTER: u32 = 8;

/// What the crops in a batch were cut from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    /// Original images
    Crops,
    /// Diff maps (reference pane still shows its image)
    DiffCrops,
}

impl BatchKind {
    pub fn describe(self) -> &'static str {
        match self {
            Self::Crops => "crops",
            Self::DiffCrops => "difference crops",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchEntry {
    pub label: String,
    pub image: RgbaImage,
}

#[derive(Debug, Clone)]
pub struct ComparisonBatch {
    pub kind: BatchKind,
    pub entries: Vec<BatchEntry>,
}

impl ComparisonBatch {
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    /// Tile the crops row by row on a white background
    pub fn compose(&self, columns: usize) -> RgbaImage {
        let count = self.entries.len();
        if count == 0 {
            return RgbaImage::new(0, 0);
        }

        let columns = columns.clamp(1, count);
        let rows = count.div_ceil(columns);
        let cell_w = self.entries.iter().map(|e| e.image.width()).max().unwrap_or(0);
        let cell_h = self.entries.iter().map(|e| e.image.height()).max().unwrap_or(0);

        let width = columns as u32 * (cell_w + GUTTER) + GUTTER;
        let height = rows as u32 * (cell_h + GUTTER) + GUTTER;
        let mut grid = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));

        for (i, entry) in self.entries.iter().enumerate() {
            let col = (i % columns) as u32;
            let row = (i / columns) as u32;
            let x = GUTTER + col * (cell_w + GUTTER);
            let y = GUTTER + row * (cell_h + GUTTER);
            image::imageops::overlay(&mut grid, &entry.image, i64::from(x), i64::from(y));
        }

        grid
    }

    /// Write the tiled batch as PNG, JPEG or BMP, picked by extension
    pub fn save(&self, path: &Path, columns: usize) -> Result<()> {
        if self.entries.is_empty() {
            return Err(ViewerError::EmptyComparison);
        }

        let format = match ImageFormat::from_path(path) {
            Ok(f @ (ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Bmp)) => f,
            _ => return Err(ViewerError::UnsupportedFormat(path.to_path_buf())),
        };

        let grid = self.compose(columns);
        match format {
            // JPEG has no alpha channel
            ImageFormat::Jpeg => DynamicImage::ImageRgba8(grid)
                .into_rgb8()
                .save_with_format(path, format)?,
            _ => grid.save_with_format(path, format)?,
        }

        log::info!(
            "💾 Saved {} of [{}] to {}",
            self.kind.describe(),
            self.labels().join(", "),
            path.display()
        );
        Ok(())
    }
}

/// Suggested file name for the save dialog
pub fn default_file_name(now: NaiveDateTime) -> String {
    format!("comparison_{}.png", now.format("%Y%m%d_%H%M%S"))
}
