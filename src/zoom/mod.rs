/// Synchronized magnifier engine
///
/// - `mapper.rs` - display cursor to source pixel mapping
/// - `view.rs` - source image + display bitmap + scale ratio, kept together
/// - `capture.rs` - source-resolution crop and magnified rescale
/// - `broadcast.rs` - fan-out of cursor/tracking events to all panes

pub mod mapper;
pub mod view;
pub mod capture;
pub mod broadcast;

pub use broadcast::{ComparisonReady, SyncBroadcaster, ZoomTarget};
pub use mapper::{map_to_source, PaneGeometry};
pub use view::SourceView;
