/// Error types shared by the viewer core
///
/// Every fallible core operation returns `error::Result<T>`. The UI layer
/// turns these into status-line text; nothing in the core panics on bad input.
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, ViewerError>;

#[derive(Debug, Error)]
pub enum ViewerError {
    /// Folder count prompt received something that is not a whole number
    #[error("expected a whole number of folders, got {0:?}")]
    NotANumber(String),

    /// Folder count outside the supported 2..=6 range
    #[error("folder count must be between {min} and {max}, got {found}")]
    PaneCountOutOfRange { found: usize, min: usize, max: usize },

    /// Selection box width/height was not an integer in 1..=MAX_BOX_SIDE
    #[error("box size must be two integers from 1 to {max}, got {width:?} x {height:?}", max = crate::state::data::MAX_BOX_SIDE)]
    InvalidBoxSize { width: String, height: String },

    /// A compared image does not have the reference image's dimensions
    #[error(
        "dimension mismatch: pane {index} is {}x{}, reference is {}x{}",
        .found.0, .found.1, .expected.0, .expected.1
    )]
    DimensionMismatch {
        index: usize,
        expected: (u32, u32),
        found: (u32, u32),
    },

    /// Export requested while tracking is live, or no pane has a crop
    #[error("nothing to export: freeze the magnifier over an image first")]
    EmptyComparison,

    /// Export path has an extension we do not write
    #[error("unsupported export format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// A pane's image could not be opened or decoded
    #[error("failed to load {}: {}", .path.display(), .source)]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to list directory: {0}")]
    Listing(#[from] walkdir::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_message() {
        let err = ViewerError::DimensionMismatch {
            index: 2,
            expected: (640, 480),
            found: (320, 240),
        };
        assert_eq!(
            err.to_string(),
            "dimension mismatch: pane 2 is 320x240, reference is 640x480"
        );
    }

    #[test]
    fn test_pane_count_message() {
        let err = ViewerError::PaneCountOutOfRange { found: 9, min: 2, max: 6 };
        assert!(err.to_string().contains("between 2 and 6"));
    }
}
