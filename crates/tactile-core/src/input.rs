use std::collections::VecDeque;

use crate::Point;

/// Physical buttons found on the device classes tactile targets. `Select`
/// doubles as the semantic "activate" button: pressing it synthesizes a touch
/// at the last known pointer position so D-pad and touch input share one path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HardButton {
    Select,
    Back,
    Home,
    Menu,
    Up,
    Down,
    Left,
    Right,
    VolumeUp,
    VolumeDown,
}

impl HardButton {
    pub fn activates(self) -> bool {
        matches!(self, HardButton::Select)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Code(u16),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureKind {
    SwipeLeft,
    SwipeRight,
    SwipeUp,
    SwipeDown,
}

/// One event from the device input stream, as handed to the active surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawEvent {
    TouchDown(Point),
    TouchMove(Point),
    TouchUp(Point),
    Gesture { kind: GestureKind, force: i32 },
    ButtonDown(HardButton),
    ButtonUp(HardButton),
    KeyDown(Key),
    KeyUp(Key),
    AltKey { code: u16, pressed: bool },
}

/// Capability the platform layer implements to feed events into a tree.
pub trait InputSource {
    fn poll(&mut self) -> Option<RawEvent>;
}

/// Queue-backed source, used by tests and the demo to script input.
#[derive(Default)]
pub struct ScriptedInput {
    queue: VecDeque<RawEvent>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ev: RawEvent) {
        self.queue.push_back(ev);
    }

    pub fn extend(&mut self, evs: impl IntoIterator<Item = RawEvent>) {
        self.queue.extend(evs);
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Option<RawEvent> {
        self.queue.pop_front()
    }
}
