/// State management module
///
/// This module handles all comparison state, including:
/// - Shared value types (data.rs)
/// - Per-pane image and magnifier state (pane.rs)
/// - The session that owns the panes and fans events out (session.rs)

pub mod data;
pub mod pane;
pub mod session;
