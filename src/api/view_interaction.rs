use crate::core::{AxisDomains, PointerPosition, ZoomAxes, ZoomDirection, zoom_step};
use crate::interaction::{
    DragAxis, DragContext, DragState, ScrollbarGeometry, pointer_down, pointer_leave, pointer_move,
    pointer_up,
};

/// Axis windows of one view plus the drag context of its scrollbars.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewInteraction {
    x: AxisDomains,
    y: AxisDomains,
    drag: DragContext,
    geometry: ScrollbarGeometry,
    zoom_axes: ZoomAxes,
}

impl ViewInteraction {
    #[must_use]
    pub fn new(x: AxisDomains, y: AxisDomains, geometry: ScrollbarGeometry) -> Self {
        Self {
            x,
            y,
            drag: DragContext::default(),
            zoom_axes: geometry.axes(),
            geometry,
        }
    }

    #[must_use]
    pub fn x(&self) -> &AxisDomains {
        &self.x
    }

    #[must_use]
    pub fn y(&self) -> &AxisDomains {
        &self.y
    }

    #[must_use]
    pub fn drag(&self) -> DragContext {
        self.drag
    }

    #[must_use]
    pub fn geometry(&self) -> ScrollbarGeometry {
        self.geometry
    }

    /// Replaces the X axis and drops any drag, which referred to the old one.
    pub fn replace_x(&mut self, x: AxisDomains) {
        self.x = x;
        self.drag.clear();
    }

    /// Replaces the Y axis, for views whose value axis follows the data.
    ///
    /// A drag on the Y track is dropped; a drag on the X track survives.
    pub fn replace_y(&mut self, y: AxisDomains) {
        self.y = y;
        if self
            .drag
            .active()
            .is_some_and(|state| state.axis == DragAxis::Y)
        {
            self.drag.clear();
        }
    }

    /// Replaces the Y axis with a rebuilt one while keeping the Y window
    /// where it still fits.
    pub fn rebase_y(&mut self, y: AxisDomains) {
        let y = self.y.rebased(y);
        self.replace_y(y);
    }

    /// Applies one zoom step to the zoomable axes. Returns whether any
    /// window changed.
    pub fn zoom(&mut self, direction: ZoomDirection) -> bool {
        let before = (self.x.bounds(), self.y.bounds());
        zoom_step(direction, &mut self.x, &mut self.y, self.zoom_axes);
        before != (self.x.bounds(), self.y.bounds())
    }

    pub fn pointer_down(&mut self, position: PointerPosition) -> Option<DragState> {
        pointer_down(&mut self.drag, &self.geometry, position, &self.x, &self.y)
    }

    pub fn pointer_move(&mut self, position: PointerPosition) -> bool {
        pointer_move(&self.drag, &self.geometry, position, &mut self.x, &mut self.y)
    }

    pub fn pointer_up(&mut self, position: PointerPosition) -> bool {
        pointer_up(
            &mut self.drag,
            &self.geometry,
            position,
            &mut self.x,
            &mut self.y,
        )
    }

    pub fn pointer_leave(&mut self) {
        pointer_leave(&mut self.drag);
    }
}
