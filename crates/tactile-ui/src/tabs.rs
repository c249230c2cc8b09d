use tactile_core::*;

/// One page of a [`TabView`]. Scroll-enabled like a panel; the distinct type
/// is what lets the view reject foreign children at attach time.
pub struct Tab {
    pub background: Color,
}

impl Tab {
    pub fn new() -> Self {
        Tab {
            background: Color::from_hex("#1B1C1F"),
        }
    }
}

impl Default for Tab {
    fn default() -> Self {
        Self::new()
    }
}

impl Control for Tab {
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
        ui.scroll_end(id)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Container holding [`Tab`] pages, exactly one visible at a time. Anything
/// that is not a `Tab` is rejected when attached.
pub struct TabView;

impl Control for TabView {
    fn accepts_child(&self, child: &Widget) -> bool {
        child.behavior_is::<Tab>()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

pub fn tab_view(ui: &mut Ui, name: &str, bounds: Rect) -> WidgetId {
    ui.create_container(name, bounds, Box::new(TabView))
}

/// Create a tab page filling the view and attach it. The first page added
/// stays visible; later ones start hidden until selected.
pub fn add_tab(ui: &mut Ui, view: WidgetId, name: &str) -> Result<WidgetId> {
    let bounds = ui
        .widget(view)
        .map(|w| Rect::new(0, 0, w.bounds().w, w.bounds().h))
        .unwrap_or_default();
    let tab = ui.create_container(name, bounds, Box::new(Tab::new()));
    ui.enable_scroll(tab);
    ui.add_child(view, tab)?;
    if ui.child_count(view) > 1 {
        ui.set_visible(tab, false);
    } else {
        ui.set_active_child(view, Some(tab));
    }
    Ok(tab)
}

/// Show the page at `index`, hiding the others, with a single repaint.
pub fn select_tab(ui: &mut Ui, view: WidgetId, index: usize) {
    let Some(target) = ui.child_by_index(view, index) else {
        return;
    };
    // Suspend around the visibility flips so the switch costs one render.
    ui.set_suspended(view, true);
    let count = ui.child_count(view);
    for i in 0..count {
        if let Some(child) = ui.child_by_index(view, i) {
            ui.set_visible(child, i == index);
        }
    }
    ui.set_active_child(view, Some(target));
    ui.set_suspended(view, false);
}
