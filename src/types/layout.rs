use serde::{Deserialize, Serialize};

/// Device orientation, which also fixes the split axis.
///
/// Portrait stacks the panes top/bottom; Landscape places them side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Portrait when the container is at least as tall as it is wide.
    pub fn from_bounds(width: f64, height: f64) -> Self {
        if height >= width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }
}

/// Axis-aligned rectangle in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Lifecycle of the one-time drag hint overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintState {
    /// Never dismissed; will be shown on the next entry.
    Pending,
    Visible,
    Dismissed,
}

/// Fixed sizing parameters for the split layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Minimum extent either pane keeps along the split axis.
    pub min_pane: f64,
    /// Thickness of the drag handle drawn over the divider.
    pub handle_thickness: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_pane: 100.0,
            handle_thickness: 19.0,
        }
    }
}

/// Snapshot of the layout handed to the host for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutFrames {
    pub orientation: Orientation,
    pub total_extent: f64,
    pub divider_position: f64,
    pub first_pane: Rect,
    pub second_pane: Rect,
    pub divider_handle: Rect,
    pub hint: HintState,
}
