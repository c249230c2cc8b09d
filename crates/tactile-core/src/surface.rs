use crate::widget::{Control, Group, Widget, WidgetFlags};
use crate::{InputSource, RawEvent, Rect, Ui, WidgetId};

impl Ui {
    /// Create a root container bound to the physical screen size. Surfaces
    /// sit at (0,0), cannot be reparented, and only the active one draws.
    /// The first surface created becomes active.
    pub fn new_surface(&mut self, name: impl Into<String>, w: i32, h: i32) -> WidgetId {
        self.new_surface_with(name, w, h, Box::new(Group))
    }

    pub fn new_surface_with(
        &mut self,
        name: impl Into<String>,
        w: i32,
        h: i32,
        behavior: Box<dyn Control>,
    ) -> WidgetId {
        let mut node = Widget::new(
            name.into(),
            Rect::new(0, 0, w, h),
            WidgetFlags::ENABLED | WidgetFlags::VISIBLE | WidgetFlags::CONTAINER | WidgetFlags::SURFACE,
        );
        node.behavior = Some(behavior);
        let id = self.nodes.insert(node);
        if self.active_surface.is_none() {
            self.active_surface = Some(id);
        }
        id
    }

    pub fn active_surface(&self) -> Option<WidgetId> {
        self.active_surface
    }

    /// Switch the screen to another surface and repaint it in full.
    pub fn set_active_surface(&mut self, id: WidgetId) {
        if self.active_surface == Some(id) {
            return;
        }
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if !node.is_surface() {
            log::warn!("set_active_surface: '{}' is not a surface", node.name);
            return;
        }
        self.active_surface = Some(id);
        self.render(id, true);
    }

    /// Translate one raw input event into the dispatch protocol against the
    /// active surface. Touch positions update the last known pointer, which
    /// button synthesis reads back.
    pub fn dispatch(&mut self, ev: RawEvent) {
        self.run_timers();
        let Some(root) = self.active_surface else {
            log::debug!("input dropped: no active surface");
            return;
        };
        match ev {
            RawEvent::TouchDown(p) => {
                self.last_pointer = p;
                self.send_touch_down(root, p);
            }
            RawEvent::TouchMove(p) => {
                self.last_pointer = p;
                self.send_touch_move(root, p);
            }
            RawEvent::TouchUp(p) => {
                self.last_pointer = p;
                self.send_touch_up(root, p);
            }
            RawEvent::Gesture { kind, force } => self.send_gesture(root, kind, force),
            RawEvent::ButtonDown(btn) => self.send_button(root, btn, true),
            RawEvent::ButtonUp(btn) => self.send_button(root, btn, false),
            RawEvent::KeyDown(key) => self.send_keyboard(root, key, true),
            RawEvent::KeyUp(key) => self.send_keyboard(root, key, false),
            RawEvent::AltKey { code, pressed } => self.send_alt_key(root, code, pressed),
        }
    }

    /// Drain an input source, firing due timers between events.
    pub fn pump(&mut self, source: &mut dyn InputSource) {
        while let Some(ev) = source.poll() {
            self.dispatch(ev);
        }
        self.run_timers();
    }
}
