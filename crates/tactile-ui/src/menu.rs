use std::rc::Rc;

use tactile_core::*;

/// One row of a [`Menu`]. An item may carry nested items; while `expanded`
/// its sub-rows are laid out (indented) directly beneath it.
pub struct MenuItem {
    label: String,
    expanded: bool,
    items: Vec<MenuItem>,
}

impl MenuItem {
    pub fn new(label: impl Into<String>) -> Self {
        MenuItem {
            label: label.into(),
            expanded: false,
            items: Vec::new(),
        }
    }

    pub fn with_items(label: impl Into<String>, items: Vec<MenuItem>) -> Self {
        MenuItem {
            label: label.into(),
            expanded: false,
            items,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn expanded(&self) -> bool {
        self.expanded
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    fn collapse_recursive(&mut self) {
        self.expanded = false;
        for item in &mut self.items {
            item.collapse_recursive();
        }
    }
}

pub type SelectHandler = Rc<dyn Fn(&mut Ui, &str)>;

/// Container-like leaf managing its own expand/collapse sub-tree with the
/// same touch protocol as everything else. Expanding an item collapses its
/// siblings (never its ancestors); losing focus collapses the whole tree and
/// detaches the menu from its parent so no stale expansion survives into the
/// next show.
pub struct Menu {
    items: Vec<MenuItem>,
    row_height: i32,
    indent: i32,
    background: Color,
    row_color: Color,
    text_color: Color,
    on_select: Option<SelectHandler>,
}

impl Menu {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Menu {
            items,
            row_height: 24,
            indent: 16,
            background: Color::from_hex("#2B2D31"),
            row_color: Color::from_hex("#3A3D42"),
            text_color: Color::WHITE,
            on_select: None,
        }
    }

    pub fn on_select(mut self, f: impl Fn(&mut Ui, &str) + 'static) -> Self {
        self.on_select = Some(Rc::new(f));
        self
    }

    /// Append items to the list. Appends even when rows already exist.
    pub fn add_items(&mut self, items: Vec<MenuItem>) {
        self.items.extend(items);
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn collapse_all(&mut self) {
        for item in &mut self.items {
            item.collapse_recursive();
        }
    }

    /// Depth-first hit walk: an expanded item's sub-rows are tried before
    /// the item's own row. Rows are laid out top to bottom from `origin`,
    /// one `row_height` each, indenting per level. Returns the path of child
    /// indices down to the hit item.
    fn hit(&self, origin: Point, p: Point, width: i32) -> Option<Vec<usize>> {
        let mut y = origin.y;
        Self::hit_level(&self.items, origin.x, &mut y, width, self.row_height, self.indent, p)
    }

    fn hit_level(
        items: &[MenuItem],
        x: i32,
        y: &mut i32,
        width: i32,
        row_h: i32,
        indent: i32,
        p: Point,
    ) -> Option<Vec<usize>> {
        for (i, item) in items.iter().enumerate() {
            let row = Rect::new(x, *y, width, row_h);
            *y += row_h;
            if item.expanded
                && let Some(mut path) =
                    Self::hit_level(&item.items, x + indent, y, width - indent, row_h, indent, p)
            {
                path.insert(0, i);
                return Some(path);
            }
            if row.contains(p) {
                return Some(vec![i]);
            }
        }
        None
    }

    fn item_at_path_mut(&mut self, path: &[usize]) -> Option<&mut MenuItem> {
        let mut items = &mut self.items;
        let (last, rest) = path.split_last()?;
        for idx in rest {
            items = &mut items.get_mut(*idx)?.items;
        }
        items.get_mut(*last)
    }

    /// Expand the item at `path`, collapsing its siblings at that level.
    fn expand_exclusive(&mut self, path: &[usize]) {
        let mut items = &mut self.items;
        let (last, rest) = match path.split_last() {
            Some(x) => x,
            None => return,
        };
        for idx in rest {
            match items.get_mut(*idx) {
                Some(item) => items = &mut item.items,
                None => return,
            }
        }
        for (i, sibling) in items.iter_mut().enumerate() {
            if i != *last {
                sibling.collapse_recursive();
            }
        }
        if let Some(item) = items.get_mut(*last) {
            item.expanded = !item.expanded;
            if !item.expanded {
                item.collapse_recursive();
            }
        }
    }

    fn paint_level(
        items: &[MenuItem],
        x: i32,
        y: &mut i32,
        width: i32,
        row_h: i32,
        indent: i32,
        row_color: Color,
        text_color: Color,
        canvas: &mut dyn Canvas,
    ) {
        for item in items {
            let row = Rect::new(x, *y, width, row_h);
            *y += row_h;
            if item.expanded {
                canvas.fill_rect(row, row_color);
            }
            canvas.draw_text(&item.label, Point::new(row.x + 4, row.y + 4), text_color);
            if item.expanded {
                Self::paint_level(
                    &item.items,
                    x + indent,
                    y,
                    width - indent,
                    row_h,
                    indent,
                    row_color,
                    text_color,
                    canvas,
                );
            }
        }
    }
}

impl Control for Menu {
    fn paint(&mut self, widget: &Widget, canvas: &mut dyn Canvas, _clip: Rect) {
        let bounds = widget.screen_bounds();
        canvas.fill_rect(bounds, self.background);
        let mut y = bounds.y;
        Self::paint_level(
            &self.items,
            bounds.x,
            &mut y,
            bounds.w,
            self.row_height,
            self.indent,
            self.row_color,
            self.text_color,
            canvas,
        );
    }

    fn touch_up(&mut self, ui: &mut Ui, id: WidgetId, p: Point) -> bool {
        let Some(widget) = ui.widget(id) else {
            return true;
        };
        let bounds = widget.screen_bounds();
        let Some(path) = self.hit(Point::new(bounds.x, bounds.y), p, bounds.w) else {
            return false;
        };
        let has_children = self
            .item_at_path_mut(&path)
            .is_some_and(|item| !item.items.is_empty());
        if has_children {
            self.expand_exclusive(&path);
            ui.invalidate(id);
        } else {
            let label = match self.item_at_path_mut(&path) {
                Some(item) => item.label.clone(),
                None => return true,
            };
            self.collapse_all();
            ui.invalidate(id);
            if let Some(cb) = self.on_select.clone() {
                cb(ui, &label);
            }
        }
        true
    }

    fn focus_changed(&mut self, ui: &mut Ui, id: WidgetId, focused: bool) {
        if focused {
            return;
        }
        // Blur: drop every expansion, then leave the tree entirely.
        self.collapse_all();
        if let Some(parent) = ui.widget(id).and_then(|w| w.parent()) {
            ui.remove_child(parent, id);
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Create a menu leaf, detached.
pub fn menu(ui: &mut Ui, name: &str, bounds: Rect, items: Vec<MenuItem>) -> WidgetId {
    ui.create(name, bounds, Box::new(Menu::new(items)))
}
