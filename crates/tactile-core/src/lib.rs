//! # Retained widget tree for small touch screens
//!
//! Tactile keeps a tree of controls alive between frames and redraws only
//! the screen regions a state change actually touched. Everything hangs off
//! a [`Ui`] context:
//!
//! - widgets live in an arena and are addressed by [`WidgetId`] handles;
//!   stale handles are harmless ("this widget no longer participates"),
//! - containers own their children (paint order = z-order) and track one
//!   active child, which is what "focused" means,
//! - input enters through [`Ui::dispatch`] against the active surface and
//!   trickles down via hit-testing; widgets answer with queued events,
//! - drawing goes through a [`Canvas`] capability behind a lock, clipped to
//!   what the ancestor chain leaves visible, and `present` pushes exactly
//!   the damaged rectangle.
//!
//! ```rust
//! use tactile_core::*;
//!
//! let canvas = RecordingCanvas::shared();
//! let mut ui = Ui::new(canvas.clone());
//! let root = ui.new_surface("main", 320, 240);
//! let hello = ui.create("hello", Rect::new(10, 10, 100, 32), Box::new(Group));
//! ui.add_child(root, hello).unwrap();
//!
//! ui.on(hello, EventTag::Tap, |_ui, ev| log::info!("tapped: {:?}", ev.kind));
//! ui.dispatch(RawEvent::TouchDown(Point::new(20, 20)));
//! ui.dispatch(RawEvent::TouchUp(Point::new(20, 20)));
//! ```
//!
//! The tap-and-hold detector is a timer wheel on the context rather than a
//! thread per touch: deadlines are checked by `run_timers` (the event pump
//! drives it), entries are cancelled by move/up/dispose, and the phase flag
//! is re-checked at fire time so nothing fires on a dead or hidden widget.
//! Under a [`ManualClock`] the whole gesture machine is deterministic.

pub mod canvas;
pub mod clock;
pub mod color;
pub mod container;
pub mod context;
pub mod error;
pub mod event;
pub mod geometry;
pub mod input;
pub mod render;
pub mod scroll;
pub mod surface;
pub mod widget;

pub mod tests;

pub use canvas::*;
pub use clock::*;
pub use color::*;
pub use context::Ui;
pub use error::*;
pub use event::{Event, EventKind, EventTag, Handler};
pub use geometry::*;
pub use input::*;
pub use scroll::ScrollState;
pub use widget::{Control, Group, HoldPhase, Widget, WidgetFlags, WidgetId};
