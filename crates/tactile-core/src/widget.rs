use std::any::Any;

use smallvec::SmallVec;
use web_time::Instant;

use crate::clock::{DOUBLE_TAP_WINDOW, TAP_HOLD_WINDOW};
use crate::event::Subscriptions;
use crate::scroll::ScrollState;
use crate::{Canvas, EventKind, GestureKind, HardButton, Key, Point, Rect, Ui};

slotmap::new_key_type! {
    /// Handle into the widget arena. Stale handles resolve to `None`, which
    /// every dispatch and render path treats as "this widget no longer
    /// participates".
    pub struct WidgetId;
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct WidgetFlags: u8 {
        const ENABLED   = 1 << 0;
        const VISIBLE   = 1 << 1;
        /// Set on this widget only; effective suspension also looks at
        /// ancestors.
        const SUSPENDED = 1 << 2;
        const CONTAINER = 1 << 3;
        const SURFACE   = 1 << 4;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoldPhase {
    Waiting,
    Cancelled,
}

/// One node in the tree. Geometry is local; `offset_x/offset_y` cache the
/// absolute translation of the parent chain and are refreshed by
/// `Ui::update_offsets`, never on the draw path.
pub struct Widget {
    pub(crate) name: String,
    pub tag: Option<Box<dyn Any>>,
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) w: i32,
    pub(crate) h: i32,
    pub(crate) offset_x: i32,
    pub(crate) offset_y: i32,
    pub(crate) flags: WidgetFlags,
    pub(crate) is_down: bool,
    pub(crate) hold_point: Point,
    pub(crate) hold_phase: HoldPhase,
    pub(crate) last_tap: Option<Instant>,
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: SmallVec<[WidgetId; 8]>,
    pub(crate) active_child: Option<WidgetId>,
    pub(crate) scroll: Option<ScrollState>,
    pub(crate) subs: Subscriptions,
    pub(crate) behavior: Option<Box<dyn Control>>,
}

impl Widget {
    pub(crate) fn new(name: String, bounds: Rect, flags: WidgetFlags) -> Self {
        Widget {
            name,
            tag: None,
            x: bounds.x,
            y: bounds.y,
            w: bounds.w,
            h: bounds.h,
            offset_x: 0,
            offset_y: 0,
            flags,
            is_down: false,
            hold_point: Point::default(),
            hold_phase: HoldPhase::Cancelled,
            last_tap: None,
            parent: None,
            children: SmallVec::new(),
            active_child: None,
            scroll: None,
            subs: Subscriptions::default(),
            behavior: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local bounds, relative to the parent.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn left(&self) -> i32 {
        self.x + self.offset_x
    }

    pub fn top(&self) -> i32 {
        self.y + self.offset_y
    }

    /// Absolute bounds on the screen.
    pub fn screen_bounds(&self) -> Rect {
        Rect::new(self.left(), self.top(), self.w, self.h)
    }

    pub fn hit_test(&self, p: Point) -> bool {
        self.screen_bounds().contains(p)
    }

    pub fn enabled(&self) -> bool {
        self.flags.contains(WidgetFlags::ENABLED)
    }

    pub fn visible(&self) -> bool {
        self.flags.contains(WidgetFlags::VISIBLE)
    }

    pub fn is_container(&self) -> bool {
        self.flags.contains(WidgetFlags::CONTAINER)
    }

    pub fn is_surface(&self) -> bool {
        self.flags.contains(WidgetFlags::SURFACE)
    }

    /// True while a touch that started on this widget is still down.
    pub fn touching(&self) -> bool {
        self.is_down
    }

    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    pub fn active_child(&self) -> Option<WidgetId> {
        self.active_child
    }

    /// Whether this widget's behavior is the concrete type `T`. Containers
    /// use it to reject children of the wrong kind at attach time.
    pub fn behavior_is<T: Control>(&self) -> bool {
        self.behavior
            .as_ref()
            .is_some_and(|b| b.as_any().is::<T>())
    }

    pub fn behavior_as<T: Control>(&self) -> Option<&T> {
        self.behavior.as_ref()?.as_any().downcast_ref::<T>()
    }
}

/// Per-control behavior: the overridable paint and message hooks. A hook
/// returning `true` marks the event handled; the public event is not emitted
/// and the default behavior (focus change, gesture detection) is skipped.
#[allow(unused_variables)]
pub trait Control: Any {
    fn paint(&mut self, widget: &Widget, canvas: &mut dyn Canvas, clip: Rect) {}

    fn touch_down(&mut self, ui: &mut Ui, id: WidgetId, p: Point) -> bool {
        false
    }
    fn touch_move(&mut self, ui: &mut Ui, id: WidgetId, p: Point) -> bool {
        false
    }
    fn touch_up(&mut self, ui: &mut Ui, id: WidgetId, p: Point) -> bool {
        false
    }
    fn gesture(&mut self, ui: &mut Ui, id: WidgetId, kind: GestureKind, force: i32) -> bool {
        false
    }
    fn button(&mut self, ui: &mut Ui, id: WidgetId, btn: HardButton, pressed: bool) -> bool {
        false
    }
    fn key(&mut self, ui: &mut Ui, id: WidgetId, key: Key, pressed: bool) -> bool {
        false
    }
    fn alt_key(&mut self, ui: &mut Ui, id: WidgetId, code: u16, pressed: bool) -> bool {
        false
    }

    /// Focus moved onto (`true`) or away from (`false`) this widget.
    fn focus_changed(&mut self, ui: &mut Ui, id: WidgetId, focused: bool) {}

    /// Containers may reject children of the wrong type at attach time.
    fn accepts_child(&self, child: &Widget) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Plain behavior with no visuals and no hooks; the default for containers.
pub struct Group;

impl Control for Group {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Ui {
    /// Touch pressed at `p`. Containers hit-test children in reverse paint
    /// order (topmost drawn wins) and the first hit consumes the event; with
    /// no child hit, the previous active child is blurred and the container
    /// itself becomes the touch target.
    pub fn send_touch_down(&mut self, id: WidgetId, p: Point) {
        self.depth += 1;
        self.touch_down_inner(id, p);
        self.depth -= 1;
        self.flush_pending();
    }

    pub(crate) fn touch_down_inner(&mut self, id: WidgetId, p: Point) {
        if !self.receives_input(id) {
            return;
        }
        let handled = self
            .with_behavior(id, |ui, b| b.touch_down(ui, id, p))
            .unwrap_or(true);
        if handled || !self.alive(id) {
            return;
        }

        if self.nodes[id].is_container() {
            let children = self.nodes[id].children.clone();
            for child in children.iter().rev() {
                let Some(c) = self.nodes.get(*child) else {
                    continue;
                };
                if !c.enabled() || !c.visible() {
                    continue;
                }
                if c.hit_test(p) {
                    self.set_active_child_inner(id, Some(*child));
                    self.touch_down_inner(*child, p);
                    return;
                }
            }
            self.set_active_child_inner(id, None);
            if !self.alive(id) {
                return;
            }
        }

        let deadline = self.now() + TAP_HOLD_WINDOW;
        let node = &mut self.nodes[id];
        node.is_down = true;
        node.hold_point = p;
        node.hold_phase = HoldPhase::Waiting;
        self.schedule_hold(id, deadline);
        self.emit(id, EventKind::TouchDown(p));
    }

    /// Touch moved to `p`. While the active child is touching, the move is
    /// forwarded to it without re-hit-testing, so a drag can leave the
    /// child's original bounds.
    pub fn send_touch_move(&mut self, id: WidgetId, p: Point) {
        self.depth += 1;
        self.touch_move_inner(id, p);
        self.depth -= 1;
        self.flush_pending();
    }

    pub(crate) fn touch_move_inner(&mut self, id: WidgetId, p: Point) {
        if !self.receives_input(id) {
            return;
        }
        let handled = self
            .with_behavior(id, |ui, b| b.touch_move(ui, id, p))
            .unwrap_or(true);
        if handled || !self.alive(id) {
            return;
        }

        // A move on a down widget kills its pending hold, even when the move
        // ends up forwarded to a child.
        if let Some(node) = self.nodes.get_mut(id)
            && node.is_down
            && node.hold_phase == HoldPhase::Waiting
        {
            node.hold_phase = HoldPhase::Cancelled;
            self.cancel_hold(id);
        }

        if self.nodes[id].is_container() {
            if let Some(ac) = self.nodes[id].active_child
                && self.nodes.get(ac).is_some_and(|c| c.is_down)
            {
                self.touch_move_inner(ac, p);
                return;
            }
            let children = self.nodes[id].children.clone();
            for child in children.iter().rev() {
                let Some(c) = self.nodes.get(*child) else {
                    continue;
                };
                if c.enabled() && c.visible() && c.hit_test(p) {
                    self.touch_move_inner(*child, p);
                    return;
                }
            }
        }
        self.emit(id, EventKind::TouchMove(p));
    }

    /// Touch released at `p`. Clears the down state even when the widget is
    /// disabled, hidden, or suspended, so it cannot get stuck down.
    pub fn send_touch_up(&mut self, id: WidgetId, p: Point) {
        self.depth += 1;
        self.touch_up_inner(id, p);
        self.depth -= 1;
        self.flush_pending();
    }

    pub(crate) fn touch_up_inner(&mut self, id: WidgetId, p: Point) {
        if !self.alive(id) {
            return;
        }
        // The pending hold dies here no matter how the rest plays out.
        self.cancel_hold(id);
        self.nodes[id].hold_phase = HoldPhase::Cancelled;

        if !self.receives_input(id) {
            self.nodes[id].is_down = false;
            return;
        }
        let handled = self
            .with_behavior(id, |ui, b| b.touch_up(ui, id, p))
            .unwrap_or(true);
        if !self.alive(id) {
            return;
        }
        if handled {
            self.nodes[id].is_down = false;
            return;
        }

        if self.nodes[id].is_container() {
            if let Some(ac) = self.nodes[id].active_child
                && self.nodes.get(ac).is_some_and(|c| c.is_down)
            {
                self.touch_up_inner(ac, p);
                if !self.nodes.get(id).is_some_and(|n| n.is_down) {
                    return;
                }
            } else {
                let children = self.nodes[id].children.clone();
                let mut forwarded = false;
                for child in children.iter().rev() {
                    let Some(c) = self.nodes.get(*child) else {
                        continue;
                    };
                    if c.enabled() && c.visible() && c.hit_test(p) {
                        self.touch_up_inner(*child, p);
                        forwarded = true;
                        break;
                    }
                }
                if forwarded && !self.nodes.get(id).is_some_and(|n| n.is_down) {
                    return;
                }
            }
        }

        let now = self.now();
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let was_down = node.is_down;
        node.is_down = false;
        let mut classified = None;
        if was_down && node.screen_bounds().contains(p) {
            match node.last_tap {
                Some(prev) if now.saturating_duration_since(prev) < DOUBLE_TAP_WINDOW => {
                    // Reset the window so a third tap starts a fresh single
                    // tap rather than chaining triple-taps.
                    node.last_tap = None;
                    classified = Some(EventKind::DoubleTap(p));
                }
                _ => {
                    node.last_tap = Some(now);
                    classified = Some(EventKind::Tap(p));
                }
            }
        }
        self.emit(id, EventKind::TouchUp(p));
        if let Some(kind) = classified {
            self.emit(id, kind);
        }
    }

    pub fn send_gesture(&mut self, id: WidgetId, kind: GestureKind, force: i32) {
        self.depth += 1;
        self.gesture_inner(id, kind, force);
        self.depth -= 1;
        self.flush_pending();
    }

    pub(crate) fn gesture_inner(&mut self, id: WidgetId, kind: GestureKind, force: i32) {
        if !self.receives_input(id) {
            return;
        }
        let handled = self
            .with_behavior(id, |ui, b| b.gesture(ui, id, kind, force))
            .unwrap_or(true);
        if handled || !self.alive(id) {
            return;
        }
        if self.nodes[id].is_container()
            && let Some(ac) = self.nodes[id].active_child
            && self.alive(ac)
        {
            self.gesture_inner(ac, kind, force);
            return;
        }
        self.emit(id, EventKind::Gesture { kind, force });
    }

    /// Physical button. The semantic activate button (Select) additionally
    /// synthesizes a touch at the last known pointer position, so D-pad and
    /// touch share one code path.
    pub fn send_button(&mut self, id: WidgetId, btn: HardButton, pressed: bool) {
        self.depth += 1;
        self.button_inner(id, btn, pressed);
        self.depth -= 1;
        self.flush_pending();
    }

    pub(crate) fn button_inner(&mut self, id: WidgetId, btn: HardButton, pressed: bool) {
        if !self.receives_input(id) {
            return;
        }
        let handled = self
            .with_behavior(id, |ui, b| b.button(ui, id, btn, pressed))
            .unwrap_or(true);
        if handled || !self.alive(id) {
            return;
        }
        if self.nodes[id].is_container() {
            if let Some(ac) = self.nodes[id].active_child
                && self.alive(ac)
            {
                self.button_inner(ac, btn, pressed);
                return;
            }
            // No focus holder: fall back to whatever sits under the pointer.
            let pointer = self.last_pointer;
            let children = self.nodes[id].children.clone();
            for child in children.iter().rev() {
                let Some(c) = self.nodes.get(*child) else {
                    continue;
                };
                if c.enabled() && c.visible() && c.hit_test(pointer) {
                    self.button_inner(*child, btn, pressed);
                    return;
                }
            }
        }

        let pointer = self.last_pointer;
        if pressed {
            self.emit(id, EventKind::ButtonPressed(btn));
            if btn.activates() {
                self.touch_down_inner(id, pointer);
            }
        } else {
            if btn.activates() {
                self.touch_up_inner(id, pointer);
            }
            self.emit(id, EventKind::ButtonReleased(btn));
        }
    }

    pub fn send_keyboard(&mut self, id: WidgetId, key: Key, pressed: bool) {
        self.depth += 1;
        self.keyboard_inner(id, key, pressed);
        self.depth -= 1;
        self.flush_pending();
    }

    pub(crate) fn keyboard_inner(&mut self, id: WidgetId, key: Key, pressed: bool) {
        if !self.receives_input(id) {
            return;
        }
        let handled = self
            .with_behavior(id, |ui, b| b.key(ui, id, key, pressed))
            .unwrap_or(true);
        if handled || !self.alive(id) {
            return;
        }
        if self.nodes[id].is_container()
            && let Some(ac) = self.nodes[id].active_child
            && self.alive(ac)
        {
            self.keyboard_inner(ac, key, pressed);
            return;
        }
        self.emit(id, EventKind::Key { key, pressed });
    }

    pub fn send_alt_key(&mut self, id: WidgetId, code: u16, pressed: bool) {
        self.depth += 1;
        self.alt_key_inner(id, code, pressed);
        self.depth -= 1;
        self.flush_pending();
    }

    pub(crate) fn alt_key_inner(&mut self, id: WidgetId, code: u16, pressed: bool) {
        if !self.receives_input(id) {
            return;
        }
        let handled = self
            .with_behavior(id, |ui, b| b.alt_key(ui, id, code, pressed))
            .unwrap_or(true);
        if handled || !self.alive(id) {
            return;
        }
        if self.nodes[id].is_container()
            && let Some(ac) = self.nodes[id].active_child
            && self.alive(ac)
        {
            self.alt_key_inner(ac, code, pressed);
            return;
        }
        self.emit(id, EventKind::AltKey { code, pressed });
    }
}
