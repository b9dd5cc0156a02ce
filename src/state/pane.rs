/// One comparison slot: its directory, its image and its magnifier state
use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, RgbaImage};

use super::data::{BoxColor, Corner, DisplayRect, TrackingState, ZoomSettings};
use crate::zoom::capture::capture;
use crate::zoom::{map_to_source, PaneGeometry, SourceView, ZoomTarget};

#[derive(Debug, Clone)]
pub struct Pane {
    index: usize,
    directory: Option<PathBuf>,
    /// Loaded image with its display bitmap and scale ratio
    image: Option<SourceView>,
    /// Normalized diff map against the reference pane, as RGBA for
    /// display and capture
    diff_view: Option<SourceView>,
    show_diff: bool,
    viewport: (u32, u32),
    tracking: TrackingState,
    settings: ZoomSettings,
    cursor: (i32, i32),
    /// Last magnified crop, kept while frozen for export
    magnified: Option<RgbaImage>,
}

impl Pane {
    pub fn new(index: usize, settings: ZoomSettings, viewport: (u32, u32)) -> Self {
        Self {
            index,
            directory: None,
            image: None,
            diff_view: None,
            show_diff: false,
            viewport,
            tracking: TrackingState::Tracking,
            settings,
            cursor: (0, 0),
            magnified: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Button/export label: `Dir N` until a folder is chosen, then the
    /// last two path components
    pub fn label(&self) -> String {
        match &self.directory {
            Some(dir) => short_dir_label(dir),
            None => format!("Dir {}", self.index + 1),
        }
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn set_directory(&mut self, directory: PathBuf) {
        self.directory = Some(directory);
    }

    /// Install a freshly loaded image (or clear the pane with `None`)
    ///
    /// The scale ratio is rebuilt here, before any mapping can use it, and
    /// any diff from the previous image is dropped.
    pub fn set_image(&mut self, image: Option<RgbaImage>) {
        self.image = image.map(|img| SourceView::new(img, self.viewport));
        self.diff_view = None;
        self.magnified = None;
        self.capture_zoom_area();
    }

    /// Attach (or remove) this pane's normalized diff map
    pub fn set_diff_map(&mut self, map: Option<GrayImage>) {
        self.diff_view = map.map(|m| SourceView::new(DynamicImage::ImageLuma8(m).into_rgba8(), self.viewport));
        if self.show_diff {
            self.magnified = None;
            self.capture_zoom_area();
        }
    }

    /// Show the diff map instead of the image (when one exists)
    pub fn set_show_diff(&mut self, show: bool) {
        if self.show_diff != show {
            self.show_diff = show;
            self.magnified = None;
            self.capture_zoom_area();
        }
    }

    /// New on-screen size: rebuild display bitmaps and ratios
    ///
    /// A frozen pane keeps its crop; it is recaptured on unfreeze.
    pub fn set_viewport(&mut self, viewport: (u32, u32)) {
        if self.viewport == viewport {
            return;
        }
        self.viewport = viewport;
        self.image = self.image.take().map(|v| v.rescaled(viewport));
        self.diff_view = self.diff_view.take().map(|v| v.rescaled(viewport));
        if self.tracking.is_tracking() {
            self.capture_zoom_area();
        }
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Diff view when diff display is on and available, else the image
    pub fn active_view(&self) -> Option<&SourceView> {
        match (&self.diff_view, self.show_diff) {
            (Some(view), true) => Some(view),
            _ => self.image.as_ref(),
        }
    }

    pub fn original(&self) -> Option<&RgbaImage> {
        self.image.as_ref().map(|v| v.original())
    }

    pub fn display(&self) -> Option<&RgbaImage> {
        self.active_view().map(|v| v.display())
    }

    /// Diff map as shown, if this pane has one
    #[cfg(test)]
    pub fn diff_map(&self) -> Option<&RgbaImage> {
        self.diff_view.as_ref().map(SourceView::original)
    }

    pub fn magnified(&self) -> Option<&RgbaImage> {
        self.magnified.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    #[cfg(test)]
    pub fn scale_ratio(&self) -> Option<f64> {
        self.active_view().map(|v| v.scale_ratio())
    }

    pub fn geometry(&self) -> Option<PaneGeometry> {
        self.active_view().map(|view| PaneGeometry {
            viewport: self.viewport,
            bitmap: view.display_size(),
            source: view.source_size(),
            scale_ratio: view.scale_ratio(),
        })
    }

    #[cfg(test)]
    pub fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    #[cfg(test)]
    pub fn settings(&self) -> &ZoomSettings {
        &self.settings
    }

    /// Map the shared cursor and refresh the magnified crop
    ///
    /// Out-of-bounds positions leave the previous crop untouched.
    pub fn capture_zoom_area(&mut self) {
        let Some(geometry) = self.geometry() else {
            self.magnified = None;
            return;
        };

        let Some(point) = map_to_source(self.cursor.0, self.cursor.1, &geometry) else {
            return;
        };

        let zoomed = self
            .active_view()
            .and_then(|view| capture(view, point, &self.settings));
        if zoomed.is_some() {
            self.magnified = zoomed;
        }
    }

    /// Selection box in display space, centered on the cursor
    pub fn selection_rect(&self) -> DisplayRect {
        let select_box = self.settings.select_box;
        DisplayRect {
            x: self.cursor.0 - (select_box.width / 2) as i32,
            y: self.cursor.1 - (select_box.height / 2) as i32,
            width: select_box.width,
            height: select_box.height,
        }
    }

    pub fn box_color(&self) -> BoxColor {
        match self.tracking {
            TrackingState::Tracking => BoxColor::Red,
            TrackingState::Frozen => BoxColor::Black,
        }
    }

    pub fn zoom_area_size(&self) -> (u32, u32) {
        self.settings.zoom_area()
    }

    /// Corner for the magnified preview that keeps it off the selection
    pub fn magnifier_corner(&self) -> Corner {
        let rect = self.selection_rect();
        let (zoom_w, zoom_h) = self.zoom_area_size();
        if rect.x > zoom_w as i32 || rect.y > zoom_h as i32 {
            Corner::TopLeft
        } else {
            Corner::BottomRight
        }
    }

    /// Top-left position of the magnified preview inside the pane
    pub fn magnifier_origin(&self) -> (i32, i32) {
        match self.magnifier_corner() {
            Corner::TopLeft => (0, 0),
            Corner::BottomRight => {
                let (zoom_w, zoom_h) = self.zoom_area_size();
                (
                    self.viewport.0 as i32 - zoom_w as i32,
                    self.viewport.1 as i32 - zoom_h as i32,
                )
            }
        }
    }
}

impl ZoomTarget for Pane {
    fn update_zoom_rect(&mut self, x: i32, y: i32) {
        if !self.tracking.is_tracking() {
            return;
        }
        self.cursor = (x, y);
        self.capture_zoom_area();
    }

    fn update_tracking_flag(&mut self, tracking: bool) {
        self.tracking = TrackingState::from_flag(tracking);
        if tracking {
            self.capture_zoom_area();
        }
    }

    fn apply_settings(&mut self, settings: &ZoomSettings) {
        self.settings = *settings;
        self.capture_zoom_area();
    }

    fn is_tracking(&self) -> bool {
        self.tracking.is_tracking()
    }
}

/// `.../parent/name` for a directory, or the whole path when it is short
fn short_dir_label(dir: &Path) -> String {
    let names: Vec<_> = dir
        .components()
        .rev()
        .take(2)
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    match names.as_slice() {
        [name, parent] => format!(".../{}/{}", parent, name),
        _ => dir.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::{SelectionBox, MAX_BOX_SIDE};
    use image::{ImageBuffer, Luma, Rgba};

    fn pane_with_image(width: u32, height: u32, viewport: (u32, u32)) -> Pane {
        let mut pane = Pane::new(0, ZoomSettings::default(), viewport);
        let image = ImageBuffer::from_fn(width, height, |x, y| Rgba([(x % 256) as u8, (y % 256) as u8, 0, 255]));
        pane.set_image(Some(image));
        pane
    }

    #[test]
    fn test_label() {
        let mut pane = Pane::new(2, ZoomSettings::default(), (100, 100));
        assert_eq!(pane.label(), "Dir 3");
        pane.set_directory(PathBuf::from("/data/runs/baseline"));
        assert_eq!(pane.label(), ".../runs/baseline");
    }

    #[test]
    fn test_scale_ratio_follows_new_images() {
        let mut pane = pane_with_image(900, 1200, (300, 400));
        assert_eq!(pane.scale_ratio(), Some(3.0));

        let smaller = RgbaImage::from_pixel(600, 800, Rgba([0, 0, 0, 255]));
        pane.set_image(Some(smaller));
        assert_eq!(pane.scale_ratio(), Some(2.0));

        pane.set_viewport((150, 200));
        assert_eq!(pane.scale_ratio(), Some(4.0));
    }

    #[test]
    fn test_cursor_move_captures() {
        let mut pane = pane_with_image(900, 1200, (300, 400));
        pane.update_zoom_rect(150, 200);
        let zoomed = pane.magnified().unwrap();
        assert_eq!(zoomed.dimensions(), (200, 200));
    }

    #[test]
    fn test_out_of_bounds_keeps_previous_crop() {
        let mut pane = pane_with_image(900, 1200, (300, 400));
        pane.update_zoom_rect(150, 200);
        let before = pane.magnified().cloned();

        pane.update_zoom_rect(0, 0);
        assert_eq!(pane.cursor(), (0, 0));
        assert_eq!(pane.magnified().cloned(), before);
    }

    #[test]
    fn test_empty_pane_never_captures() {
        let mut pane = Pane::new(1, ZoomSettings::default(), (300, 300));
        pane.update_zoom_rect(150, 150);
        assert!(pane.magnified().is_none());
        assert!(pane.geometry().is_none());
    }

    #[test]
    fn test_frozen_pane_ignores_cursor_and_turns_black() {
        let mut pane = pane_with_image(300, 300, (300, 300));
        pane.update_zoom_rect(100, 100);
        assert_eq!(pane.box_color(), BoxColor::Red);

        pane.update_tracking_flag(false);
        assert_eq!(pane.box_color(), BoxColor::Black);
        let frozen_crop = pane.magnified().cloned();

        pane.update_zoom_rect(200, 200);
        assert_eq!(pane.cursor(), (100, 100));
        assert_eq!(pane.magnified().cloned(), frozen_crop);

        pane.update_tracking_flag(true);
        assert_eq!(pane.box_color(), BoxColor::Red);
    }

    #[test]
    fn test_resize_keeps_frozen_crop() {
        let mut pane = pane_with_image(300, 300, (300, 300));
        pane.update_zoom_rect(100, 100);
        pane.update_tracking_flag(false);
        let frozen_crop = pane.magnified().cloned();

        pane.set_viewport((150, 150));
        assert_eq!(pane.scale_ratio(), Some(2.0));
        assert_eq!(pane.cursor(), (100, 100));
        assert_eq!(pane.magnified().cloned(), frozen_crop);

        // Unfreezing recaptures through the new geometry
        pane.update_tracking_flag(true);
        assert_ne!(pane.magnified().cloned(), frozen_crop);
    }

    #[test]
    fn test_oversized_box_never_exceeds_source() {
        let mut pane = pane_with_image(100, 100, (100, 100));
        pane.update_zoom_rect(50, 50);
        pane.apply_settings(&ZoomSettings {
            select_box: SelectionBox { width: u32::MAX, height: u32::MAX },
            ..ZoomSettings::default()
        });

        let zoomed = pane.magnified().unwrap();
        let side = MAX_BOX_SIDE * 2;
        assert_eq!(zoomed.dimensions(), (side, side));
    }

    #[test]
    fn test_selection_rect_centered_on_cursor() {
        let mut pane = Pane::new(0, ZoomSettings::default(), (400, 400));
        pane.apply_settings(&ZoomSettings {
            select_box: SelectionBox { width: 41, height: 20 },
            ..ZoomSettings::default()
        });
        pane.update_zoom_rect(100, 50);
        assert_eq!(
            pane.selection_rect(),
            DisplayRect { x: 80, y: 40, width: 41, height: 20 }
        );
    }

    #[test]
    fn test_magnifier_placement() {
        // Box 100x100, ratio 2.0: zoom area 200x200
        let mut pane = Pane::new(0, ZoomSettings::default(), (800, 600));

        // Box near the top-left: preview goes bottom-right
        pane.update_zoom_rect(120, 120);
        assert_eq!(pane.magnifier_corner(), Corner::BottomRight);
        assert_eq!(pane.magnifier_origin(), (600, 400));

        // Box left edge past the zoom width: preview goes top-left
        pane.update_zoom_rect(251, 120);
        assert_eq!(pane.magnifier_corner(), Corner::TopLeft);
        assert_eq!(pane.magnifier_origin(), (0, 0));

        // Exactly at the threshold still counts as overlapping
        pane.update_zoom_rect(250, 250);
        assert_eq!(pane.magnifier_corner(), Corner::BottomRight);

        pane.update_zoom_rect(100, 251);
        assert_eq!(pane.magnifier_corner(), Corner::TopLeft);
    }

    #[test]
    fn test_diff_view_replaces_source_for_capture() {
        let mut pane = pane_with_image(200, 200, (200, 200));
        pane.set_diff_map(Some(GrayImage::from_pixel(200, 200, Luma([77]))));
        pane.update_zoom_rect(100, 100);
        assert_ne!(*pane.magnified().unwrap().get_pixel(0, 0), Rgba([77, 77, 77, 255]));

        pane.set_show_diff(true);
        let zoomed = pane.magnified().unwrap();
        assert!(zoomed.pixels().all(|p| *p == Rgba([77, 77, 77, 255])));

        // A new image drops the stale diff
        pane.set_image(Some(RgbaImage::from_pixel(200, 200, Rgba([1, 1, 1, 255]))));
        assert!(pane.diff_map().is_none());
        assert_eq!(*pane.magnified().unwrap().get_pixel(0, 0), Rgba([1, 1, 1, 255]));
    }
}
