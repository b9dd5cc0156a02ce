/// Filesystem side of the viewer
///
/// This module handles:
/// - Listing image files shared by the pane directories
/// - Decoding pane images
/// - Tiling and saving comparison batches

pub mod listing;
pub mod loader;
pub mod export;
