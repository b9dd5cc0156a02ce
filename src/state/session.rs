/// A comparison session: the panes, the shared file list and the modes that
/// apply to all panes at once
///
/// Every mutation that concerns more than one pane goes through the
/// broadcaster, so all panes are updated before any method returns.
use std::path::PathBuf;

use image::RgbaImage;

use super::data::{Interpolation, SelectionBox, ZoomSettings};
use super::pane::Pane;
use crate::diff::{compute_diffs, DiffPolicy};
use crate::error::{Result, ViewerError};
use crate::io::export::{BatchEntry, BatchKind, ComparisonBatch};
use crate::io::listing::{shared_filenames, ListingMode};
use crate::io::loader::load_rgba;
use crate::zoom::{ComparisonReady, SyncBroadcaster};

pub struct Session {
    panes: SyncBroadcaster<Pane>,
    settings: ZoomSettings,
    listing_mode: ListingMode,
    filenames: Vec<String>,
    selected: Option<String>,
    diff_enabled: bool,
    diff_policy: DiffPolicy,
    /// Shared (min, max) of the last diff batch
    diff_range: Option<(u8, u8)>,
    comparison_ready: bool,
}

impl Session {
    pub fn new(
        pane_count: usize,
        settings: ZoomSettings,
        listing_mode: ListingMode,
        viewport: (u32, u32),
    ) -> Self {
        let panes = (0..pane_count)
            .map(|i| Pane::new(i, settings, viewport))
            .collect();

        log::info!("🖼️  New comparison session with {} panes", pane_count);

        Self {
            panes: SyncBroadcaster::new(panes),
            settings,
            listing_mode,
            filenames: Vec::new(),
            selected: None,
            diff_enabled: false,
            diff_policy: DiffPolicy::default(),
            diff_range: None,
            comparison_ready: false,
        }
    }

    /// How diff mode treats images whose size differs from pane 1
    pub fn with_diff_policy(mut self, policy: DiffPolicy) -> Self {
        self.diff_policy = policy;
        self
    }

    pub fn pane_count(&self) -> usize {
        self.panes.len()
    }

    pub fn pane(&self, index: usize) -> Option<&Pane> {
        self.panes.get(index)
    }

    pub fn panes(&self) -> impl Iterator<Item = &Pane> {
        self.panes.iter()
    }

    pub fn settings(&self) -> &ZoomSettings {
        &self.settings
    }

    pub fn filenames(&self) -> &[String] {
        &self.filenames
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn diff_enabled(&self) -> bool {
        self.diff_enabled
    }

    /// Raw difference range the shown maps were stretched from
    pub fn diff_range(&self) -> Option<(u8, u8)> {
        self.diff_range
    }

    /// True while the panes are frozen and a batch can be exported
    pub fn comparison_ready(&self) -> bool {
        self.comparison_ready
    }

    // ========== Files ==========

    /// Assign a directory to a pane and rebuild the shared file list
    pub fn set_directory(&mut self, index: usize, directory: PathBuf) -> Result<()> {
        let Some(pane) = self.panes.get_mut(index) else {
            return Ok(());
        };
        log::info!("📁 Pane {} -> {}", index + 1, directory.display());
        pane.set_directory(directory);
        self.refresh_listing()
    }

    pub fn refresh_listing(&mut self) -> Result<()> {
        let dirs: Vec<_> = self.panes.iter().map(Pane::directory).collect();
        let names = shared_filenames(&dirs, self.listing_mode);

        // Keep the old list if the scan failed
        self.filenames = names?;
        log::info!("🔍 {} images in the shared list", self.filenames.len());
        Ok(())
    }

    /// Load `filename` from every pane's directory
    ///
    /// Panes without a directory or without a readable file are cleared and
    /// render empty; their errors are returned as warnings.
    pub fn select_file(&mut self, filename: &str) -> Vec<ViewerError> {
        let mut warnings = Vec::new();

        for pane in self.panes.iter_mut() {
            let Some(path) = pane.directory().map(|dir| dir.join(filename)) else {
                pane.set_image(None);
                continue;
            };

            match load_rgba(&path) {
                Ok(image) => pane.set_image(Some(image)),
                Err(e) => {
                    log::warn!("⚠️  Pane {}: {}", pane.index() + 1, e);
                    pane.set_image(None);
                    warnings.push(e);
                }
            }
        }

        self.selected = Some(filename.to_string());
        warnings.extend(self.refresh_diffs());
        warnings
    }

    // ========== Magnifier ==========

    /// New pane size reported by the UI, applied to every pane
    pub fn resize(&mut self, viewport: (u32, u32)) {
        for pane in self.panes.iter_mut() {
            pane.set_viewport(viewport);
        }
    }

    pub fn cursor_moved(&mut self, origin: usize, x: i32, y: i32) -> bool {
        self.panes.cursor_moved(origin, x, y)
    }

    pub fn toggle_tracking(&mut self, origin: usize) -> Option<ComparisonReady> {
        let ready = self.panes.toggle_tracking(origin)?;
        self.comparison_ready = ready.0;
        Some(ready)
    }

    pub fn is_tracking(&self) -> bool {
        self.panes.is_tracking()
    }

    pub fn set_select_box(&mut self, select_box: SelectionBox) {
        self.settings.select_box = select_box;
        self.panes.apply_settings(&self.settings);
    }

    pub fn set_enlarge_ratio(&mut self, ratio: f32) {
        self.settings.enlarge_ratio = ratio;
        self.panes.apply_settings(&self.settings);
    }

    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.settings.interpolation = interpolation;
        self.panes.apply_settings(&self.settings);
    }

    // ========== Diff ==========

    pub fn set_diff_enabled(&mut self, enabled: bool) -> Vec<ViewerError> {
        self.diff_enabled = enabled;
        self.refresh_diffs()
    }

    fn clear_diffs(&mut self) {
        self.diff_range = None;
        for pane in self.panes.iter_mut() {
            pane.set_diff_map(None);
            pane.set_show_diff(false);
        }
    }

    /// Recompute (or clear) diff maps for panes 1..N against pane 0
    pub fn refresh_diffs(&mut self) -> Vec<ViewerError> {
        let has_reference = self.panes.get(0).is_some_and(Pane::has_image);
        if !self.diff_enabled || !has_reference {
            self.clear_diffs();
            return Vec::new();
        }

        let batch = {
            let mut originals = self.panes.iter().map(Pane::original);
            match originals.next().flatten() {
                Some(reference) => {
                    let others: Vec<Option<&RgbaImage>> = originals.collect();
                    compute_diffs(reference, &others, self.diff_policy)
                }
                None => return Vec::new(),
            }
        };

        let batch = match batch {
            Ok(batch) => batch,
            Err(e) => {
                log::warn!("⚠️  Diff batch aborted: {}", e);
                self.clear_diffs();
                return vec![e];
            }
        };

        self.diff_range = batch.range;
        for (pane, map) in self.panes.iter_mut().skip(1).zip(batch.maps) {
            pane.set_diff_map(map);
            pane.set_show_diff(true);
        }
        batch.skipped
    }

    // ========== Export ==========

    /// Frozen crops of every pane that has one
    pub fn comparison_batch(&self) -> Result<ComparisonBatch> {
        if self.is_tracking() {
            return Err(ViewerError::EmptyComparison);
        }

        let entries: Vec<BatchEntry> = self
            .panes
            .iter()
            .filter_map(|pane| {
                pane.magnified().map(|image| BatchEntry {
                    label: pane.label(),
                    image: image.clone(),
                })
            })
            .collect();

        if entries.is_empty() {
            return Err(ViewerError::EmptyComparison);
        }

        let kind = if self.diff_enabled {
            BatchKind::DiffCrops
        } else {
            BatchKind::Crops
        };
        Ok(ComparisonBatch { kind, entries })
    }
}
