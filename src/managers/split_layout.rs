//! Split Pane Layout for SplitScreen.
//!
//! Sizes two content panes separated by a draggable divider. The split axis
//! follows orientation: panes stack vertically in portrait and sit side by
//! side in landscape. `divider_position` is the extent of the first pane
//! along that axis and always stays within
//! `[min_pane, total_extent - min_pane]` when the container is large enough.

use crate::types::layout::{HintState, LayoutConfig, LayoutFrames, Orientation, Rect};

/// Drag-to-resize state machine for the split-screen container.
#[derive(Debug, Clone)]
pub struct SplitPaneLayout {
    config: LayoutConfig,
    orientation: Orientation,
    width: f64,
    height: f64,
    divider: f64,
    /// Last divider position per orientation, restored on rotation back.
    remembered_portrait: Option<f64>,
    remembered_landscape: Option<f64>,
    dragging: bool,
    hint: HintState,
    laid_out: bool,
}

impl SplitPaneLayout {
    /// Creates a layout with no bounds yet.
    ///
    /// `hint_dismissed` is the persisted flag; when false the hint is shown
    /// on the first [`enter`](Self::enter).
    pub fn new(config: LayoutConfig, hint_dismissed: bool) -> Self {
        Self {
            config,
            orientation: Orientation::Portrait,
            width: 0.0,
            height: 0.0,
            divider: 0.0,
            remembered_portrait: None,
            remembered_landscape: None,
            dragging: false,
            hint: if hint_dismissed {
                HintState::Dismissed
            } else {
                HintState::Pending
            },
            laid_out: false,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Container extent along the split axis.
    pub fn total_extent(&self) -> f64 {
        match self.orientation {
            Orientation::Portrait => self.height,
            Orientation::Landscape => self.width,
        }
    }

    pub fn divider_position(&self) -> f64 {
        self.divider
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn hint(&self) -> HintState {
        self.hint
    }

    /// Updates container bounds, switching orientation if needed.
    ///
    /// The first bounds that fit two minimum panes place the divider at the
    /// midpoint; smaller bounds before that do not count as a layout. On a
    /// flip the old position is remembered for the old orientation (unless
    /// the old extent was too small to hold a real position) and the new
    /// orientation restores its own remembered position, or scales the
    /// current one proportionally. Non-finite or negative sizes are ignored.
    pub fn set_bounds(&mut self, width: f64, height: f64) {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return;
        }

        let old_extent = self.total_extent();
        let old_orientation = self.orientation;
        let new_orientation = Orientation::from_bounds(width, height);

        self.width = width;
        self.height = height;
        self.orientation = new_orientation;
        let new_extent = self.total_extent();

        let target = if !self.laid_out {
            self.laid_out = self.fits_two_panes(new_extent);
            new_extent / 2.0
        } else if new_orientation != old_orientation {
            if self.fits_two_panes(old_extent) {
                self.remember(old_orientation, self.divider);
            }
            match self.remembered(new_orientation) {
                Some(position) => position,
                None => scale(self.divider, old_extent, new_extent),
            }
        } else {
            scale(self.divider, old_extent, new_extent)
        };

        self.divider = self.clamp(target);
    }

    /// Marks first entry to the screen. Returns true if the hint should be shown.
    pub fn enter(&mut self) -> bool {
        if self.hint == HintState::Pending {
            self.hint = HintState::Visible;
            return true;
        }
        false
    }

    /// Starts a divider drag.
    ///
    /// Returns true if this dismissed the hint for the first time, in which
    /// case the caller should persist the dismissal.
    pub fn begin_drag(&mut self) -> bool {
        self.dragging = true;
        self.dismiss_hint()
    }

    /// Moves the divider by `delta` along the split axis and returns the new position.
    ///
    /// Works whether or not `begin_drag` was called, since pan recognizers
    /// report deltas from the first movement.
    pub fn drag_by(&mut self, delta: f64) -> f64 {
        if delta.is_finite() {
            self.divider = self.clamp(self.divider + delta);
        }
        self.divider
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Hides the hint after its display timeout. Same return value as `begin_drag`.
    pub fn hint_timed_out(&mut self) -> bool {
        self.dismiss_hint()
    }

    /// Sets an absolute divider position, clamped.
    pub fn set_divider_position(&mut self, position: f64) {
        if position.is_finite() {
            self.divider = self.clamp(position);
        }
    }

    /// Valid divider range for the current extent.
    ///
    /// Collapses to the midpoint when the container cannot fit two minimum panes.
    pub fn divider_range(&self) -> (f64, f64) {
        let extent = self.total_extent().max(0.0);
        let min = self.config.min_pane.max(0.0);
        if extent < 2.0 * min {
            let mid = extent / 2.0;
            return (mid, mid);
        }
        (min, extent - min)
    }

    /// Rectangles for both panes and the drag handle.
    pub fn frames(&self) -> LayoutFrames {
        let p = self.divider;
        let half = self.config.handle_thickness / 2.0;
        let (first_pane, second_pane, divider_handle) = match self.orientation {
            Orientation::Portrait => (
                Rect { x: 0.0, y: 0.0, width: self.width, height: p },
                Rect { x: 0.0, y: p, width: self.width, height: self.height - p },
                Rect { x: 0.0, y: p - half, width: self.width, height: self.config.handle_thickness },
            ),
            Orientation::Landscape => (
                Rect { x: 0.0, y: 0.0, width: p, height: self.height },
                Rect { x: p, y: 0.0, width: self.width - p, height: self.height },
                Rect { x: p - half, y: 0.0, width: self.config.handle_thickness, height: self.height },
            ),
        };

        LayoutFrames {
            orientation: self.orientation,
            total_extent: self.total_extent(),
            divider_position: p,
            first_pane,
            second_pane,
            divider_handle,
            hint: self.hint,
        }
    }

    fn fits_two_panes(&self, extent: f64) -> bool {
        extent > 0.0 && extent >= 2.0 * self.config.min_pane.max(0.0)
    }

    fn dismiss_hint(&mut self) -> bool {
        if self.hint == HintState::Dismissed {
            return false;
        }
        self.hint = HintState::Dismissed;
        true
    }

    fn clamp(&self, position: f64) -> f64 {
        let (lo, hi) = self.divider_range();
        position.clamp(lo, hi)
    }

    fn remember(&mut self, orientation: Orientation, position: f64) {
        match orientation {
            Orientation::Portrait => self.remembered_portrait = Some(position),
            Orientation::Landscape => self.remembered_landscape = Some(position),
        }
    }

    fn remembered(&self, orientation: Orientation) -> Option<f64> {
        match orientation {
            Orientation::Portrait => self.remembered_portrait,
            Orientation::Landscape => self.remembered_landscape,
        }
    }
}

impl Default for SplitPaneLayout {
    fn default() -> Self {
        Self::new(LayoutConfig::default(), false)
    }
}

/// Keeps the divider at the same fraction of the extent.
fn scale(position: f64, old_extent: f64, new_extent: f64) -> f64 {
    if old_extent > 0.0 {
        position / old_extent * new_extent
    } else {
        new_extent / 2.0
    }
}
