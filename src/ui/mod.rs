pub mod canvas;
pub mod controls;
pub mod pane_view;

pub use controls::BoxInputs;
pub use pane_view::PaneHandles;
