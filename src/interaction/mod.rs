mod pan_resize;
mod scrollbar;

pub use pan_resize::{drag_bounds, pointer_down, pointer_leave, pointer_move, pointer_up};
pub use scrollbar::{ScrollbarGeometry, TrackRect};

use serde::{Deserialize, Serialize};

use crate::core::{AxisBounds, PointerPosition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragAxis {
    X,
    Y,
}

/// Part of a scrollbar a drag started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragTarget {
    /// End cap at the low end of the window.
    MinHandle,
    /// End cap at the high end of the window.
    MaxHandle,
    /// Window body, or the empty track around it.
    Thumb,
}

/// Active drag: where it started and the axis window at that moment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragState {
    pub axis: DragAxis,
    pub target: DragTarget,
    pub start: PointerPosition,
    pub start_bounds: AxisBounds,
}

/// Per-control drag record.
///
/// Each control owns its own context, so several controls can be dragged
/// independently.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DragContext {
    active: Option<DragState>,
}

impl DragContext {
    #[must_use]
    pub fn active(self) -> Option<DragState> {
        self.active
    }

    #[must_use]
    pub fn is_dragging(self) -> bool {
        self.active.is_some()
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    pub(crate) fn begin(&mut self, state: DragState) {
        self.active = Some(state);
    }
}
