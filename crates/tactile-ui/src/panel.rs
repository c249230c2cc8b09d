use tactile_core::*;

/// Scrollable container: children taller or wider than the panel can be
/// dragged into view. The panel only scrolls while it is the touch target
/// itself; touches landing on a child belong to that child.
pub struct Panel {
    pub background: Color,
}

impl Panel {
    pub fn new() -> Self {
        Panel {
            background: Color::from_hex("#202124"),
        }
    }

    pub fn with_background(background: Color) -> Self {
        Panel { background }
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}

impl Control for Panel {
    fn paint(&mut self, widget: &Widget, canvas: &mut dyn Canvas, _clip: Rect) {
        canvas.fill_rect(widget.screen_bounds(), self.background);
    }

    fn touch_down(&mut self, ui: &mut Ui, id: WidgetId, p: Point) -> bool {
        ui.scroll_begin(id, p);
        false
    }

    fn touch_move(&mut self, ui: &mut Ui, id: WidgetId, p: Point) -> bool {
        ui.scroll_drag(id, p)
    }

    fn touch_up(&mut self, ui: &mut Ui, id: WidgetId, _p: Point) -> bool {
        // Ending a drag eats the release so it never classifies as a tap.
        ui.scroll_end(id)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Create a scroll-enabled panel, detached.
pub fn panel(ui: &mut Ui, name: &str, bounds: Rect) -> WidgetId {
    let id = ui.create_container(name, bounds, Box::new(Panel::new()));
    ui.enable_scroll(id);
    id
}

/// Stepped slide-in: reposition the panel from `from_x` to `to_x` across
/// `steps` frames, flushing each one. The device's redraw latency provides
/// the pacing.
pub fn slide_in(ui: &mut Ui, id: WidgetId, from_x: i32, to_x: i32, steps: u32) {
    let Some(w) = ui.widget(id) else {
        return;
    };
    let y = w.bounds().y;
    let steps = steps.max(1) as i32;
    for i in 1..=steps {
        let x = from_x + (to_x - from_x) * i / steps;
        ui.set_position(id, x, y);
    }
}
