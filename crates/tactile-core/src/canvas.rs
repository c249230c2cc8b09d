use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Color, Point, Rect};

/// Drawing capability the platform provides. The toolkit never assumes a
/// pixel format, only that every operation is clipped to the last `set_clip`
/// region and that `present` pushes exactly that rectangle to the screen.
///
/// Clip state is global, mutable canvas state, so a render pass holds the
/// canvas lock from `set_clip` through `present`.
pub trait Canvas {
    fn set_clip(&mut self, rect: Rect);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn draw_rect(&mut self, rect: Rect, color: Color);
    fn draw_line(&mut self, from: Point, to: Point, color: Color);
    fn draw_text(&mut self, text: &str, origin: Point, color: Color);
    fn draw_image(&mut self, id: &str, dest: Rect);
    fn present(&mut self, rect: Rect);
}

pub type SharedCanvas = Arc<Mutex<dyn Canvas>>;

/// Recorded drawing operation; replayable, comparable in tests.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasOp {
    Clip(Rect),
    FillRect { rect: Rect, color: Color },
    Rect { rect: Rect, color: Color },
    Line { from: Point, to: Point, color: Color },
    Text { text: String, origin: Point, color: Color },
    Image { id: String, dest: Rect },
    Present(Rect),
}

/// Canvas that records commands instead of touching hardware. Tests and the
/// demo use it as the framebuffer stand-in.
#[derive(Default)]
pub struct RecordingCanvas {
    pub ops: Vec<CanvasOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Mutex<RecordingCanvas>> {
        Arc::new(Mutex::new(RecordingCanvas::new()))
    }

    /// Count of `present` flushes recorded so far.
    pub fn presents(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, CanvasOp::Present(_)))
            .count()
    }
}

impl Canvas for RecordingCanvas {
    fn set_clip(&mut self, rect: Rect) {
        self.ops.push(CanvasOp::Clip(rect));
    }
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(CanvasOp::FillRect { rect, color });
    }
    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(CanvasOp::Rect { rect, color });
    }
    fn draw_line(&mut self, from: Point, to: Point, color: Color) {
        self.ops.push(CanvasOp::Line { from, to, color });
    }
    fn draw_text(&mut self, text: &str, origin: Point, color: Color) {
        self.ops.push(CanvasOp::Text {
            text: text.to_string(),
            origin,
            color,
        });
    }
    fn draw_image(&mut self, id: &str, dest: Rect) {
        self.ops.push(CanvasOp::Image {
            id: id.to_string(),
            dest,
        });
    }
    fn present(&mut self, rect: Rect) {
        self.ops.push(CanvasOp::Present(rect));
    }
}
