use std::rc::Rc;

use crate::{GestureKind, HardButton, Key, Point, Ui, WidgetId};

/// Something a widget told the outside world. Events are queued during
/// dispatch and delivered once the dispatch that produced them has fully
/// unwound, so handlers are free to mutate the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub source: WidgetId,
    pub kind: EventKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EventKind {
    TouchDown(Point),
    TouchMove(Point),
    TouchUp(Point),
    Gesture { kind: GestureKind, force: i32 },
    Tap(Point),
    DoubleTap(Point),
    TapHold(Point),
    GotFocus,
    LostFocus,
    ButtonPressed(HardButton),
    ButtonReleased(HardButton),
    Key { key: Key, pressed: bool },
    AltKey { code: u16, pressed: bool },
}

/// Subscription selector, one per `EventKind` variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventTag {
    TouchDown,
    TouchMove,
    TouchUp,
    Gesture,
    Tap,
    DoubleTap,
    TapHold,
    GotFocus,
    LostFocus,
    ButtonPressed,
    ButtonReleased,
    Key,
    AltKey,
}

impl EventKind {
    pub fn tag(&self) -> EventTag {
        match self {
            EventKind::TouchDown(_) => EventTag::TouchDown,
            EventKind::TouchMove(_) => EventTag::TouchMove,
            EventKind::TouchUp(_) => EventTag::TouchUp,
            EventKind::Gesture { .. } => EventTag::Gesture,
            EventKind::Tap(_) => EventTag::Tap,
            EventKind::DoubleTap(_) => EventTag::DoubleTap,
            EventKind::TapHold(_) => EventTag::TapHold,
            EventKind::GotFocus => EventTag::GotFocus,
            EventKind::LostFocus => EventTag::LostFocus,
            EventKind::ButtonPressed(_) => EventTag::ButtonPressed,
            EventKind::ButtonReleased(_) => EventTag::ButtonReleased,
            EventKind::Key { .. } => EventTag::Key,
            EventKind::AltKey { .. } => EventTag::AltKey,
        }
    }
}

pub type Handler = Rc<dyn Fn(&mut Ui, &Event)>;

#[derive(Default)]
pub(crate) struct Subscriptions {
    entries: Vec<(EventTag, Handler)>,
}

impl Subscriptions {
    pub(crate) fn add(&mut self, tag: EventTag, handler: Handler) {
        self.entries.push((tag, handler));
    }

    pub(crate) fn matching(&self, tag: EventTag) -> Vec<Handler> {
        self.entries
            .iter()
            .filter(|(t, _)| *t == tag)
            .map(|(_, h)| h.clone())
            .collect()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
