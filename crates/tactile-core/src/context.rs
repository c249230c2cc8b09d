use std::collections::VecDeque;
use std::rc::Rc;

use slotmap::SlotMap;
use web_time::Instant;

use crate::clock::{Clock, SystemClock};
use crate::event::{Event, EventKind, EventTag, Handler};
use crate::widget::{Control, HoldPhase, Widget, WidgetFlags};
use crate::{Point, Rect, SharedCanvas, WidgetId};

/// A scheduled tap-hold deadline. One entry per touched widget at most; the
/// entry is removed on move/up/dispose and the phase flag is re-checked at
/// fire time, so a stale entry silently does nothing. The hold fires at the
/// point the widget recorded on touch-down.
pub(crate) struct HoldTimer {
    pub(crate) widget: WidgetId,
    pub(crate) at: Instant,
}

/// The dispatch context: owns every widget in one tree, the shared canvas,
/// the clock, the tap-hold timer wheel, and the pending event queue.
///
/// There is no process-wide active tree; construct as many `Ui` values as you
/// need (tests run several side by side).
pub struct Ui {
    pub(crate) nodes: SlotMap<WidgetId, Widget>,
    pub(crate) canvas: SharedCanvas,
    pub(crate) clock: Rc<dyn Clock>,
    pub(crate) active_surface: Option<WidgetId>,
    pub(crate) last_pointer: Point,
    pub(crate) hold_timers: Vec<HoldTimer>,
    pub(crate) pending: VecDeque<Event>,
    pub(crate) pending_paints: Vec<Rect>,
    pub(crate) depth: u32,
}

impl Ui {
    pub fn new(canvas: SharedCanvas) -> Self {
        Ui {
            nodes: SlotMap::with_key(),
            canvas,
            clock: Rc::new(SystemClock),
            active_surface: None,
            last_pointer: Point::default(),
            hold_timers: Vec::new(),
            pending: VecDeque::new(),
            pending_paints: Vec::new(),
            depth: 0,
        }
    }

    pub fn with_clock(canvas: SharedCanvas, clock: Rc<dyn Clock>) -> Self {
        let mut ui = Ui::new(canvas);
        ui.clock = clock;
        ui
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn last_pointer(&self) -> Point {
        self.last_pointer
    }

    /// Create a detached leaf widget.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        bounds: Rect,
        behavior: Box<dyn Control>,
    ) -> WidgetId {
        self.insert(name.into(), bounds, WidgetFlags::ENABLED | WidgetFlags::VISIBLE, behavior)
    }

    /// Create a detached container.
    pub fn create_container(
        &mut self,
        name: impl Into<String>,
        bounds: Rect,
        behavior: Box<dyn Control>,
    ) -> WidgetId {
        self.insert(
            name.into(),
            bounds,
            WidgetFlags::ENABLED | WidgetFlags::VISIBLE | WidgetFlags::CONTAINER,
            behavior,
        )
    }

    fn insert(
        &mut self,
        name: String,
        bounds: Rect,
        flags: WidgetFlags,
        behavior: Box<dyn Control>,
    ) -> WidgetId {
        let mut node = Widget::new(name, bounds, flags);
        node.behavior = Some(behavior);
        self.nodes.insert(node)
    }

    pub fn alive(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.nodes.get(id)
    }

    pub fn widget_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.nodes.get_mut(id)
    }

    pub fn screen_bounds(&self, id: WidgetId) -> Option<Rect> {
        self.nodes.get(id).map(|n| n.screen_bounds())
    }

    pub fn hit_test(&self, id: WidgetId, p: Point) -> bool {
        self.nodes.get(id).is_some_and(|n| n.hit_test(p))
    }

    /// Effectively suspended: own flag or any ancestor's.
    pub fn suspended(&self, id: WidgetId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            let Some(n) = self.nodes.get(c) else { break };
            if n.flags.contains(WidgetFlags::SUSPENDED) {
                return true;
            }
            cur = n.parent;
        }
        false
    }

    /// Topmost ancestor (the widget itself when detached).
    pub fn top_level(&self, id: WidgetId) -> WidgetId {
        let mut cur = id;
        while let Some(p) = self.nodes.get(cur).and_then(|n| n.parent) {
            if !self.alive(p) {
                break;
            }
            cur = p;
        }
        cur
    }

    pub(crate) fn receives_input(&self, id: WidgetId) -> bool {
        let Some(n) = self.nodes.get(id) else {
            return false;
        };
        n.enabled() && n.visible() && !self.suspended(id)
    }

    /// Run `f` with the widget's behavior temporarily lifted out of the
    /// arena, so the hook gets `&mut Ui` without aliasing the node. Returns
    /// `None` when the widget (or its behavior) is gone; the caller treats
    /// that as handled and moves on.
    pub(crate) fn with_behavior<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut Ui, &mut dyn Control) -> R,
    ) -> Option<R> {
        let mut behavior = self.nodes.get_mut(id)?.behavior.take()?;
        let out = f(self, &mut *behavior);
        if let Some(node) = self.nodes.get_mut(id) {
            node.behavior = Some(behavior);
        }
        Some(out)
    }

    /// Borrow the behavior of `id` as a concrete type, immutably.
    pub fn behavior<T: Control>(&self, id: WidgetId) -> Option<&T> {
        self.nodes
            .get(id)?
            .behavior
            .as_ref()?
            .as_any()
            .downcast_ref::<T>()
    }

    /// Mutate the behavior of `id` as a concrete type.
    pub fn update_behavior<T: Control, R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        let t = self
            .nodes
            .get_mut(id)?
            .behavior
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<T>()?;
        Some(f(t))
    }

    // --- geometry & flags ------------------------------------------------

    /// Refresh the cached absolute offsets of `id` and every descendant from
    /// the parent chain. Called on attach, move, and ancestor moves.
    pub fn update_offsets(&mut self, id: WidgetId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let (ox, oy) = match node.parent.and_then(|p| self.nodes.get(p)) {
            Some(p) => (p.left(), p.top()),
            None => (0, 0),
        };
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.offset_x = ox;
        node.offset_y = oy;
        let children = node.children.clone();
        for child in children {
            self.update_offsets(child);
        }
    }

    pub fn set_bounds(&mut self, id: WidgetId, bounds: Rect) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let old = node.screen_bounds();
        node.x = bounds.x;
        node.y = bounds.y;
        node.w = bounds.w;
        node.h = bounds.h;
        self.update_offsets(id);
        let new = self.nodes[id].screen_bounds();
        self.invalidate_rect(id, old.union(&new));
    }

    pub fn set_position(&mut self, id: WidgetId, x: i32, y: i32) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let (w, h) = (node.w, node.h);
        self.set_bounds(id, Rect::new(x, y, w, h));
    }

    pub fn set_size(&mut self, id: WidgetId, w: i32, h: i32) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let (x, y) = (node.x, node.y);
        self.set_bounds(id, Rect::new(x, y, w, h));
    }

    pub fn set_visible(&mut self, id: WidgetId, visible: bool) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.visible() == visible {
            return;
        }
        node.flags.set(WidgetFlags::VISIBLE, visible);
        if !visible {
            node.is_down = false;
            node.hold_phase = HoldPhase::Cancelled;
            self.cancel_hold(id);
        }
        self.invalidate(id);
    }

    pub fn set_enabled(&mut self, id: WidgetId, enabled: bool) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.enabled() == enabled {
            return;
        }
        node.flags.set(WidgetFlags::ENABLED, enabled);
        if !enabled {
            node.is_down = false;
            node.hold_phase = HoldPhase::Cancelled;
            self.cancel_hold(id);
        }
        self.invalidate(id);
    }

    /// Suspend (or resume) rendering for this subtree. Resuming triggers
    /// exactly one re-render of the widget.
    pub fn set_suspended(&mut self, id: WidgetId, suspended: bool) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.flags.contains(WidgetFlags::SUSPENDED) == suspended {
            return;
        }
        node.flags.set(WidgetFlags::SUSPENDED, suspended);
        if !suspended {
            self.render(id, true);
        }
    }

    // --- events ----------------------------------------------------------

    /// Subscribe to one event kind on a widget. Handlers run once the
    /// dispatch that produced the event has unwound, so they may freely
    /// mutate the tree.
    pub fn on(&mut self, id: WidgetId, tag: EventTag, handler: impl Fn(&mut Ui, &Event) + 'static) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.subs.add(tag, Rc::new(handler) as Handler);
        }
    }

    pub(crate) fn emit(&mut self, id: WidgetId, kind: EventKind) {
        self.pending.push_back(Event { source: id, kind });
    }

    pub(crate) fn flush_pending(&mut self) {
        if self.depth != 0 {
            return;
        }
        // Repaints requested mid-dispatch ran deferred so that a widget whose
        // hook asked for them has its behavior back in the arena to paint with.
        let paints = std::mem::take(&mut self.pending_paints);
        for rect in paints {
            self.repaint_region(rect);
        }
        while let Some(ev) = self.pending.pop_front() {
            let handlers = match self.nodes.get(ev.source) {
                Some(node) => node.subs.matching(ev.kind.tag()),
                // Source died before delivery; its subscriptions died with it.
                None => continue,
            };
            for h in handlers {
                h(self, &ev);
            }
        }
    }

    /// Drain any events still queued outside a dispatch (tests mostly).
    pub fn flush_events(&mut self) {
        self.flush_pending();
    }

    // --- tap-hold timer wheel -------------------------------------------

    pub(crate) fn schedule_hold(&mut self, id: WidgetId, at: Instant) {
        // One live detector per widget.
        if self.hold_timers.iter().any(|t| t.widget == id) {
            return;
        }
        self.hold_timers.push(HoldTimer { widget: id, at });
    }

    pub(crate) fn cancel_hold(&mut self, id: WidgetId) {
        self.hold_timers.retain(|t| t.widget != id);
    }

    /// Fire due tap-hold deadlines. Driven by `dispatch`/`pump`; call it
    /// directly when idling without input.
    pub fn run_timers(&mut self) {
        let now = self.now();
        let mut due = Vec::new();
        self.hold_timers.retain(|t| {
            if t.at <= now {
                due.push(t.widget);
                false
            } else {
                true
            }
        });
        for id in due {
            if !self.receives_input(id) {
                continue;
            }
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            if node.hold_phase != HoldPhase::Waiting {
                continue;
            }
            node.hold_phase = HoldPhase::Cancelled;
            let point = node.hold_point;
            self.emit(id, EventKind::TapHold(point));
        }
        self.flush_pending();
    }

    // --- lifecycle -------------------------------------------------------

    /// Remove a widget: detach it, cancel its timers, drop its
    /// subscriptions. Children are NOT disposed: they stay in the arena
    /// behind a dead parent handle and the caller owns their teardown.
    pub fn dispose(&mut self, id: WidgetId) {
        self.cancel_hold(id);
        if let Some(parent) = self.nodes.get(id).and_then(|n| n.parent) {
            self.detach(parent, id);
        }
        if self.active_surface == Some(id) {
            self.active_surface = None;
        }
        if let Some(mut node) = self.nodes.remove(id) {
            node.subs.clear();
            log::debug!("disposed '{}'", node.name);
        }
    }
}
