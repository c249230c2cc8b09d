//! Controls built on the tactile-core dispatch protocol: scrollable panels,
//! tab views, menus, and the basic leaves the demo uses. Every control here
//! is an ordinary [`Control`] behavior; nothing is special-cased in the
//! core.

pub mod menu;
pub mod panel;
pub mod tabs;


pub use menu::{Menu, MenuItem, menu};
pub use panel::{Panel, panel, slide_in};
pub use tabs::{Tab, TabView, add_tab, select_tab, tab_view};

use tactile_core::*;

/// Push-button leaf. Visuals are deliberately plain: a fill that darkens
/// while touched, and a centered-ish label.
pub struct Button {
    pub label: String,
    pub background: Color,
    pub pressed: Color,
    pub text_color: Color,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Button {
            label: label.into(),
            background: Color::from_hex("#3B82F6"),
            pressed: Color::from_hex("#2563EB"),
            text_color: Color::WHITE,
        }
    }
}

impl Control for Button {
    fn paint(&mut self, widget: &Widget, canvas: &mut dyn Canvas, _clip: Rect) {
        let bounds = widget.screen_bounds();
        let fill = if widget.touching() {
            self.pressed
        } else {
            self.background
        };
        canvas.fill_rect(bounds, fill);
        canvas.draw_rect(bounds, self.text_color.with_alpha(64));
        canvas.draw_text(
            &self.label,
            Point::new(bounds.x + 6, bounds.y + bounds.h / 2 - 6),
            self.text_color,
        );
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

pub fn button(ui: &mut Ui, name: &str, label: &str, bounds: Rect) -> WidgetId {
    ui.create(name, bounds, Box::new(Button::new(label)))
}

/// Static text leaf.
pub struct Label {
    pub text: String,
    pub color: Color,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Label {
            text: text.into(),
            color: Color::WHITE,
        }
    }
}

impl Control for Label {
    fn paint(&mut self, widget: &Widget, canvas: &mut dyn Canvas, _clip: Rect) {
        let bounds = widget.screen_bounds();
        canvas.draw_text(&self.text, Point::new(bounds.x, bounds.y), self.color);
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

pub fn text(ui: &mut Ui, name: &str, content: &str, bounds: Rect) -> WidgetId {
    ui.create(name, bounds, Box::new(Label::new(content)))
}
