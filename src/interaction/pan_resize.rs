use tracing::{debug, trace};

use crate::core::zoom::ZOOM_DIVISOR;
use crate::core::{AxisBounds, AxisDomains, PointerPosition};

use super::{DragAxis, DragContext, DragState, DragTarget, ScrollbarGeometry};

/// Starts a drag when the pointer lands on a scrollbar track.
///
/// Returns the new drag state, or `None` when the pointer misses both tracks
/// or a drag is already in progress.
pub fn pointer_down(
    context: &mut DragContext,
    geometry: &ScrollbarGeometry,
    position: PointerPosition,
    x: &AxisDomains,
    y: &AxisDomains,
) -> Option<DragState> {
    if context.is_dragging() {
        trace!("pointer down ignored while dragging");
        return None;
    }

    let axis = geometry.hit_axis(position)?;
    let start_bounds = match axis {
        DragAxis::X => x.bounds(),
        DragAxis::Y => y.bounds(),
    };
    let state = DragState {
        axis,
        target: geometry.classify(axis, position, start_bounds),
        start: position,
        start_bounds,
    };
    context.begin(state);
    debug!(axis = ?state.axis, target = ?state.target, "drag started");
    Some(state)
}

/// Applies the drag for the current pointer position. The drag stays active.
///
/// Returns whether an axis window changed.
pub fn pointer_move(
    context: &DragContext,
    geometry: &ScrollbarGeometry,
    position: PointerPosition,
    x: &mut AxisDomains,
    y: &mut AxisDomains,
) -> bool {
    let Some(state) = context.active() else {
        return false;
    };
    apply_drag(&state, geometry, position, x, y)
}

/// Applies the final drag position and ends the drag.
///
/// A pointer-up without a matching pointer-down changes nothing.
pub fn pointer_up(
    context: &mut DragContext,
    geometry: &ScrollbarGeometry,
    position: PointerPosition,
    x: &mut AxisDomains,
    y: &mut AxisDomains,
) -> bool {
    let Some(state) = context.active() else {
        return false;
    };
    let changed = apply_drag(&state, geometry, position, x, y);
    context.clear();
    debug!(axis = ?state.axis, changed, "drag finished");
    changed
}

/// Ends any drag without touching the axis windows.
pub fn pointer_leave(context: &mut DragContext) {
    if context.is_dragging() {
        debug!("drag cancelled on pointer leave");
    }
    context.clear();
}

/// Axis window `(min, max)` for a drag that has reached `position`.
///
/// The delta is always measured from the drag start against the window
/// captured at that moment, so repeated moves to the same point agree.
#[must_use]
pub fn drag_bounds(
    state: &DragState,
    geometry: &ScrollbarGeometry,
    position: PointerPosition,
) -> (f64, f64) {
    let bounds = state.start_bounds;
    let AxisBounds {
        min0,
        max0,
        min,
        max,
        step,
    } = bounds;
    let initial_extent = bounds.initial_extent();
    let current_extent = bounds.current_extent();

    let (length, travelled) = match state.axis {
        DragAxis::X => (geometry.x_track_length(), position.x - state.start.x),
        DragAxis::Y => (geometry.y_track_length(), state.start.y - position.y),
    };
    if !(length > 0.0) {
        return (min, max);
    }
    let mut delta = initial_extent * travelled / length;
    if bounds.is_ordinal() {
        delta = delta.round();
    }

    let minimum_window = if bounds.is_ordinal() {
        step
    } else {
        initial_extent / ZOOM_DIVISOR
    };

    match state.target {
        DragTarget::MinHandle => {
            let delta = delta
                .min(current_extent - minimum_window)
                .max(min0 - min);
            (min + delta, max)
        }
        DragTarget::MaxHandle => {
            let delta = delta
                .max(minimum_window - current_extent)
                .min(max0 - max);
            (min, max + delta)
        }
        DragTarget::Thumb => {
            if delta == 0.0 {
                delta = track_click_delta(state, geometry, position, length);
                if bounds.is_ordinal() {
                    delta = delta.round();
                }
            }
            let delta = delta.max(min0 - min).min(max0 - max);
            (min + delta, max + delta)
        }
    }
}

/// Shift that centers the window on a click beside the thumb; zero for a
/// click on the thumb itself.
fn track_click_delta(
    state: &DragState,
    geometry: &ScrollbarGeometry,
    position: PointerPosition,
    length: f64,
) -> f64 {
    let bounds = state.start_bounds;
    let initial_extent = bounds.initial_extent();
    let half_window = bounds.current_extent() / 2.0;

    match state.axis {
        DragAxis::X => {
            let (min_edge, max_edge) = geometry.x_thumb(bounds);
            if position.x < min_edge {
                initial_extent * (position.x - min_edge) / length - half_window
            } else if max_edge < position.x {
                initial_extent * (position.x - max_edge) / length + half_window
            } else {
                0.0
            }
        }
        DragAxis::Y => {
            let (min_edge, max_edge) = geometry.y_thumb(bounds);
            if min_edge < position.y {
                initial_extent * (min_edge - position.y) / length - half_window
            } else if position.y < max_edge {
                initial_extent * (max_edge - position.y) / length + half_window
            } else {
                0.0
            }
        }
    }
}

fn apply_drag(
    state: &DragState,
    geometry: &ScrollbarGeometry,
    position: PointerPosition,
    x: &mut AxisDomains,
    y: &mut AxisDomains,
) -> bool {
    let axis = match state.axis {
        DragAxis::X => x,
        DragAxis::Y => y,
    };
    let before = axis.bounds();
    let (min, max) = drag_bounds(state, geometry, position);
    axis.set_bounds(min, max);
    let after = axis.bounds();
    let changed = before.min != after.min || before.max != after.max;
    if changed {
        trace!(min = after.min, max = after.max, "drag moved window");
    }
    changed
}
