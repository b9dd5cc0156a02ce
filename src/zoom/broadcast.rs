/// Fan-out of cursor and tracking events to every pane
///
/// One pane produces the raw event; the broadcaster owns all panes and
/// applies the event to each of them before returning. Panes never talk to
/// each other directly.
use crate::state::data::ZoomSettings;

/// Observer interface implemented by anything that renders a magnifier
pub trait ZoomTarget {
    /// New shared cursor position in display space
    fn update_zoom_rect(&mut self, x: i32, y: i32);
    /// Switch between tracking (`true`) and frozen (`false`)
    fn update_tracking_flag(&mut self, tracking: bool);
    /// New shared box size, magnification or interpolation
    fn apply_settings(&mut self, settings: &ZoomSettings);
    fn is_tracking(&self) -> bool;
}

/// Notification for the export control after a tracking toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonReady(pub bool);

pub struct SyncBroadcaster<T> {
    targets: Vec<T>,
}

impl<T: ZoomTarget> SyncBroadcaster<T> {
    pub fn new(targets: Vec<T>) -> Self {
        Self { targets }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.targets.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.targets.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.targets.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.targets.iter_mut()
    }

    /// Push a cursor move from `origin` to every target, origin included
    ///
    /// Returns false when the event was dropped (unknown or frozen origin).
    pub fn cursor_moved(&mut self, origin: usize, x: i32, y: i32) -> bool {
        match self.targets.get(origin) {
            Some(target) if target.is_tracking() => {}
            _ => return false,
        }

        log::trace!("cursor ({}, {}) from pane {}", x, y, origin);
        for target in &mut self.targets {
            target.update_zoom_rect(x, y);
        }
        true
    }

    /// Flip tracking on `origin` and apply the new state everywhere
    ///
    /// Exactly one notification per toggle; `None` for an unknown origin.
    pub fn toggle_tracking(&mut self, origin: usize) -> Option<ComparisonReady> {
        let tracking = !self.targets.get(origin)?.is_tracking();
        for target in &mut self.targets {
            target.update_tracking_flag(tracking);
        }

        log::debug!(
            "pane {} switched all panes to {}",
            origin,
            if tracking { "tracking" } else { "frozen" }
        );
        Some(ComparisonReady(!tracking))
    }

    pub fn apply_settings(&mut self, settings: &ZoomSettings) {
        for target in &mut self.targets {
            target.apply_settings(settings);
        }
    }

    /// All targets share the same tracking state after any broadcast
    pub fn is_tracking(&self) -> bool {
        self.targets.first().map_or(true, |t| t.is_tracking())
    }
}
