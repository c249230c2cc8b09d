use crate::widget::HoldPhase;
use crate::{Point, Ui, WidgetId};

/// Drag-to-scroll state carried by scrollable containers. The content extent
/// is the bounding box of the children's local bounds, refreshed on every
/// render pass; `shift` is the cumulative offset already applied to the
/// children.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScrollState {
    pub(crate) content_min: Point,
    pub(crate) content_max: Point,
    pub(crate) shift: Point,
    pub(crate) dragging: bool,
    pub(crate) last: Point,
}

impl ScrollState {
    pub fn shift(&self) -> Point {
        self.shift
    }

    pub fn dragging(&self) -> bool {
        self.dragging
    }

    /// Clamp a desired cumulative shift so the window never scrolls past the
    /// content edges on this axis.
    fn clamp_axis(desired: i32, content_min: i32, content_max: i32, size: i32) -> i32 {
        let lo = -(content_max - size).max(0);
        let hi = (-content_min).max(0);
        desired.clamp(lo, hi)
    }
}

impl Ui {
    /// Mark a container as scrollable. Its content extent is tracked from
    /// then on and `scroll_drag` becomes live.
    pub fn enable_scroll(&mut self, id: WidgetId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.scroll = Some(ScrollState::default());
        }
    }

    pub fn scroll_state(&self, id: WidgetId) -> Option<&ScrollState> {
        self.nodes.get(id)?.scroll.as_ref()
    }

    /// Recompute the content bounding box from the children's local bounds.
    /// Children's `x/y` do not move while scrolling (only their cached
    /// offsets do), so the extent is stable across a drag.
    pub(crate) fn refresh_content_bounds(&mut self, id: WidgetId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if node.scroll.is_none() {
            return;
        }
        let mut min = Point::default();
        let mut max = Point::default();
        let mut first = true;
        for child in node.children.iter() {
            let Some(c) = self.nodes.get(*child) else {
                continue;
            };
            if first {
                min = Point::new(c.x, c.y);
                max = Point::new(c.x + c.w, c.y + c.h);
                first = false;
            } else {
                min.x = min.x.min(c.x);
                min.y = min.y.min(c.y);
                max.x = max.x.max(c.x + c.w);
                max.y = max.y.max(c.y + c.h);
            }
        }
        if let Some(s) = self.nodes.get_mut(id).and_then(|n| n.scroll.as_mut()) {
            s.content_min = min;
            s.content_max = max;
        }
    }

    /// Record where a potential drag starts. Call from a touch-down hook.
    pub fn scroll_begin(&mut self, id: WidgetId, p: Point) {
        if let Some(s) = self.nodes.get_mut(id).and_then(|n| n.scroll.as_mut()) {
            s.last = p;
        }
    }

    /// Feed a touch-move into the scroll machinery. Only acts while the
    /// container itself (not a child) is the touch target. Returns `true`
    /// when the move was consumed as scrolling.
    pub fn scroll_drag(&mut self, id: WidgetId, p: Point) -> bool {
        let (dx, dy, was_dragging);
        {
            let Some(node) = self.nodes.get_mut(id) else {
                return false;
            };
            if !node.is_down {
                return false;
            }
            let (w, h) = (node.w, node.h);
            let Some(s) = node.scroll.as_mut() else {
                return false;
            };
            was_dragging = s.dragging;
            let want_x = s.shift.x + (p.x - s.last.x);
            let want_y = s.shift.y + (p.y - s.last.y);
            let nx = ScrollState::clamp_axis(want_x, s.content_min.x, s.content_max.x, w);
            let ny = ScrollState::clamp_axis(want_y, s.content_min.y, s.content_max.y, h);
            dx = nx - s.shift.x;
            dy = ny - s.shift.y;
            s.last = p;
            if dx != 0 || dy != 0 {
                s.shift = Point::new(nx, ny);
                s.dragging = true;
                // A real drag is underway; the pending hold is moot.
                node.hold_phase = HoldPhase::Cancelled;
            }
        }

        if dx != 0 || dy != 0 {
            self.cancel_hold(id);
            let children = self.nodes[id].children.clone();
            for child in children {
                self.shift_offsets(child, dx, dy);
            }
            self.invalidate(id);
            true
        } else if was_dragging {
            // Pinned at a boundary mid-gesture: settle with a repaint.
            self.invalidate(id);
            true
        } else {
            false
        }
    }

    /// Finish a drag. Returns `true` when a scroll gesture was in progress,
    /// in which case one final repaint has been requested and the caller
    /// should suppress the tap.
    pub fn scroll_end(&mut self, id: WidgetId) -> bool {
        let Some(s) = self.nodes.get_mut(id).and_then(|n| n.scroll.as_mut()) else {
            return false;
        };
        if !s.dragging {
            return false;
        }
        s.dragging = false;
        self.invalidate(id);
        true
    }

    /// Shift cached offsets of a whole subtree. Incremental on purpose: the
    /// offset invariant keeps holding without a parent-chain recompute.
    fn shift_offsets(&mut self, id: WidgetId, dx: i32, dy: i32) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.offset_x += dx;
        node.offset_y += dy;
        let children = node.children.clone();
        for child in children {
            self.shift_offsets(child, dx, dy);
        }
    }
}
