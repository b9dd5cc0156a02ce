/// Shared data structures for the comparison state
///
/// These small value types flow between the UI controls, the broadcaster
/// and every pane. They carry no image data.
use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};

/// Smallest and largest number of panes a session can hold
pub const MIN_PANES: usize = 2;
pub const MAX_PANES: usize = 6;

/// Magnification slider range (tenths): 10 = 1.0x, 40 = 4.0x
pub const ENLARGE_SLIDER_MIN: u8 = 10;
pub const ENLARGE_SLIDER_MAX: u8 = 40;

/// Largest selection box side in display pixels
pub const MAX_BOX_SIDE: u32 = 1024;

/// Parse the folder-count prompt
pub fn parse_pane_count(input: &str) -> Result<usize> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(ViewerError::NotANumber(input.to_string()));
    }

    // All digits but too long for usize is still "out of range"
    let found = trimmed.parse::<usize>().unwrap_or(usize::MAX);
    if !(MIN_PANES..=MAX_PANES).contains(&found) {
        return Err(ViewerError::PaneCountOutOfRange {
            found,
            min: MIN_PANES,
            max: MAX_PANES,
        });
    }

    Ok(found)
}

/// Rows and columns of the pane grid for a given pane count
pub fn grid_shape(panes: usize) -> (usize, usize) {
    match panes {
        0..=2 => (1, 2),
        3 => (1, 3),
        4 => (2, 2),
        _ => (2, 3),
    }
}

/// Selection rectangle size in display pixels, shared by every pane
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionBox {
    pub width: u32,
    pub height: u32,
}

impl Default for SelectionBox {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
        }
    }
}

impl SelectionBox {
    /// Parse the width/height text inputs. Both must be integers in
    /// `1..=MAX_BOX_SIDE`.
    pub fn parse(width: &str, height: &str) -> Result<Self> {
        let invalid = || ViewerError::InvalidBoxSize {
            width: width.to_string(),
            height: height.to_string(),
        };

        let w: u32 = width.trim().parse().map_err(|_| invalid())?;
        let h: u32 = height.trim().parse().map_err(|_| invalid())?;
        if !(1..=MAX_BOX_SIDE).contains(&w) || !(1..=MAX_BOX_SIDE).contains(&h) {
            return Err(invalid());
        }

        Ok(Self {
            width: w,
            height: h,
        })
    }
}

/// Resampling policy for the magnified crop
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Exact pixel inspection
    #[default]
    Nearest,
    /// Bilinear smoothing
    Smooth,
}

impl Interpolation {
    pub fn from_flag(smooth: bool) -> Self {
        if smooth {
            Self::Smooth
        } else {
            Self::Nearest
        }
    }

    pub fn is_smooth(self) -> bool {
        self == Self::Smooth
    }
}

/// Zoom parameters every pane must agree on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomSettings {
    pub select_box: SelectionBox,
    /// Magnification ratio, 1.0..=4.0
    pub enlarge_ratio: f32,
    pub interpolation: Interpolation,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            select_box: SelectionBox::default(),
            enlarge_ratio: 2.0,
            interpolation: Interpolation::Nearest,
        }
    }
}

impl ZoomSettings {
    /// Size of the magnified preview area: box size times the ratio, truncated
    ///
    /// Box sides are capped at `MAX_BOX_SIDE`.
    pub fn zoom_area(&self) -> (u32, u32) {
        let width = self.select_box.width.min(MAX_BOX_SIDE);
        let height = self.select_box.height.min(MAX_BOX_SIDE);
        (
            (width as f32 * self.enlarge_ratio) as u32,
            (height as f32 * self.enlarge_ratio) as u32,
        )
    }

    /// Ratio for a slider position in tenths
    pub fn ratio_from_slider(value: u8) -> f32 {
        value.clamp(ENLARGE_SLIDER_MIN, ENLARGE_SLIDER_MAX) as f32 / 10.0
    }

    /// Slider position for the current ratio
    pub fn slider_value(&self) -> u8 {
        let tenths = (self.enlarge_ratio * 10.0).round();
        (tenths as u8).clamp(ENLARGE_SLIDER_MIN, ENLARGE_SLIDER_MAX)
    }
}

/// Tracking state of a pane's selection box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingState {
    /// Box follows the cursor
    #[default]
    Tracking,
    /// Box and crop are pinned for comparison
    Frozen,
}

impl TrackingState {
    pub fn from_flag(tracking: bool) -> Self {
        if tracking {
            Self::Tracking
        } else {
            Self::Frozen
        }
    }

    pub fn is_tracking(self) -> bool {
        self == Self::Tracking
    }
}

/// Color of the selection box outline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxColor {
    Red,
    Black,
}

impl BoxColor {
    pub fn rgb(self) -> [u8; 3] {
        match self {
            BoxColor::Red => [255, 0, 0],
            BoxColor::Black => [0, 0, 0],
        }
    }
}

/// Corner of the pane the magnified preview is drawn in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    BottomRight,
}

/// Integer rectangle in display space (may extend past the pane)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pane_count() {
        assert_eq!(parse_pane_count("4").unwrap(), 4);
        assert_eq!(parse_pane_count(" 2 ").unwrap(), 2);

        assert!(matches!(parse_pane_count("abc"), Err(ViewerError::NotANumber(_))));
        assert!(matches!(parse_pane_count("-3"), Err(ViewerError::NotANumber(_))));
        assert!(matches!(parse_pane_count(""), Err(ViewerError::NotANumber(_))));
        assert!(matches!(
            parse_pane_count("7"),
            Err(ViewerError::PaneCountOutOfRange { found: 7, .. })
        ));
        assert!(matches!(
            parse_pane_count("1"),
            Err(ViewerError::PaneCountOutOfRange { found: 1, .. })
        ));
    }

    #[test]
    fn test_grid_shape() {
        assert_eq!(grid_shape(2), (1, 2));
        assert_eq!(grid_shape(3), (1, 3));
        assert_eq!(grid_shape(4), (2, 2));
        assert_eq!(grid_shape(5), (2, 3));
        assert_eq!(grid_shape(6), (2, 3));
    }

    #[test]
    fn test_selection_box_parse() {
        assert_eq!(
            SelectionBox::parse("120", " 80").unwrap(),
            SelectionBox { width: 120, height: 80 }
        );
        assert!(SelectionBox::parse("0", "10").is_err());
        assert!(SelectionBox::parse("10", "").is_err());
        assert!(SelectionBox::parse("-5", "10").is_err());
        assert!(SelectionBox::parse("1.5", "10").is_err());
    }

    #[test]
    fn test_selection_box_parse_rejects_oversized() {
        let side = MAX_BOX_SIDE.to_string();
        assert_eq!(
            SelectionBox::parse(&side, &side).unwrap(),
            SelectionBox { width: MAX_BOX_SIDE, height: MAX_BOX_SIDE }
        );

        let too_big = (MAX_BOX_SIDE + 1).to_string();
        assert!(matches!(
            SelectionBox::parse(&too_big, "10"),
            Err(ViewerError::InvalidBoxSize { .. })
        ));
        assert!(matches!(
            SelectionBox::parse("4294967295", "4294967295"),
            Err(ViewerError::InvalidBoxSize { .. })
        ));
    }

    #[test]
    fn test_slider_mapping() {
        assert_eq!(ZoomSettings::ratio_from_slider(20), 2.0);
        assert_eq!(ZoomSettings::ratio_from_slider(5), 1.0);
        assert_eq!(ZoomSettings::ratio_from_slider(99), 4.0);

        let settings = ZoomSettings {
            enlarge_ratio: 2.7,
            ..ZoomSettings::default()
        };
        assert_eq!(settings.slider_value(), 27);
    }

    #[test]
    fn test_zoom_area_truncates() {
        let settings = ZoomSettings {
            select_box: SelectionBox { width: 33, height: 10 },
            enlarge_ratio: 1.5,
            interpolation: Interpolation::Nearest,
        };
        assert_eq!(settings.zoom_area(), (49, 15));
    }
}
