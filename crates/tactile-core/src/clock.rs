use std::cell::Cell;
use std::rc::Rc;

use web_time::{Duration, Instant};

/// Time source for the tap-hold and double-tap windows. Each `Ui` owns its
/// clock, so independent trees (and tests) never share one.
pub trait Clock {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock tests drive by hand.
pub struct ManualClock {
    t: Cell<Instant>,
}

impl ManualClock {
    pub fn new() -> Rc<Self> {
        Rc::new(ManualClock {
            t: Cell::new(Instant::now()),
        })
    }

    pub fn advance(&self, by: Duration) {
        self.t.set(self.t.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.t.get()
    }
}

/// Tap-and-hold fires after this much time without a move or release.
pub const TAP_HOLD_WINDOW: Duration = Duration::from_millis(500);

/// Two in-bounds releases inside this window classify as a double tap.
pub const DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(500);
