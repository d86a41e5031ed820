//! Pedestrian crossing request latch.
//!
//! The only state shared between the push-button interrupt and the coarse
//! tick. The interrupt side calls [`PedestrianLatch::raise`]; the controller
//! consumes with [`PedestrianLatch::take`].
//!
//! Read-and-clear runs inside a critical section rather than on an atomic
//! swap so the latch also works on cores without atomic read-modify-write
//! (e.g. Cortex-M0+).

use core::cell::Cell;
use critical_section::Mutex;

/// Single-slot, set-from-anywhere flag with atomic read-and-clear.
///
/// `new` is `const`, so the latch can live in a `static` next to the
/// interrupt handler that raises it.
pub struct PedestrianLatch {
    pending: Mutex<Cell<bool>>,
}

impl PedestrianLatch {
    /// Creates a latch with no request pending.
    pub const fn new() -> Self {
        Self {
            pending: Mutex::new(Cell::new(false)),
        }
    }

    /// Records a crossing request. Repeated raises before the next
    /// [`take`](Self::take) collapse into one.
    pub fn raise(&self) {
        critical_section::with(|cs| self.pending.borrow(cs).set(true));
    }

    /// Returns whether a request was pending and clears it, in one step.
    pub fn take(&self) -> bool {
        critical_section::with(|cs| self.pending.borrow(cs).replace(false))
    }

    /// Returns whether a request is pending without consuming it.
    pub fn is_pending(&self) -> bool {
        critical_section::with(|cs| self.pending.borrow(cs).get())
    }
}

impl Default for PedestrianLatch {
    fn default() -> Self {
        Self::new()
    }
}
