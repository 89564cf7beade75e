//! The millisecond tick counter.
//!
//! A single `u32` that the timer overflow interrupt bumps once per tick and
//! everything else only reads. Cortex-M0+ has no atomic read-modify-write, so
//! the writer does a plain load followed by a store. That is sound only
//! because the interrupt handler is the sole writer and cannot preempt itself.

use core::sync::atomic::{AtomicU32, Ordering};

/// One tick is one timer overflow, i.e. one millisecond at the default rate.
pub type Ticks = u32;

/// Anything that can report the current tick count.
pub trait TickSource {
    /// Current value of the counter
    fn now(&self) -> Ticks;

    /// Ticks elapsed since `start`, correct across counter wrap-around
    ///
    /// Make sure `start` isn't older than one full counter period.
    fn ticks_since(&self, start: Ticks) -> Ticks {
        self.now().wrapping_sub(start)
    }
}

impl<T: TickSource + ?Sized> TickSource for &T {
    fn now(&self) -> Ticks {
        (**self).now()
    }
}

/// Pending-overflow condition of a hardware timer.
pub trait OverflowFlag {
    /// Is an overflow waiting to be serviced?
    fn is_pending(&self) -> bool;

    /// Clear the overflow condition so the interrupt doesn't fire again
    fn acknowledge(&self);
}

pub struct TickCounter {
    ticks: AtomicU32,
}

/// The counter driven by the TC3 overflow interrupt.
pub static TICKS: TickCounter = TickCounter::new();

impl TickCounter {
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// A counter that begins at an arbitrary value, handy for exercising the
    /// wrap-around.
    pub const fn starting_at(ticks: Ticks) -> Self {
        TickCounter {
            ticks: AtomicU32::new(ticks),
        }
    }

    /// Advance the counter by one tick.
    ///
    /// Must only be called from the single context that owns the counter
    /// (the overflow interrupt in firmware).
    pub fn increment(&self) {
        let ticks = self.ticks.load(Ordering::Relaxed);
        self.ticks.store(ticks.wrapping_add(1), Ordering::Relaxed);
    }

    /// Service an overflow interrupt.
    ///
    /// Counts the tick first and only then clears the flag. Returns `false`
    /// without touching the counter if no overflow is pending.
    pub fn on_overflow<F: OverflowFlag + ?Sized>(&self, flag: &F) -> bool {
        if !flag.is_pending() {
            return false;
        }

        self.increment();
        flag.acknowledge();
        true
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for TickCounter {
    fn now(&self) -> Ticks {
        self.ticks.load(Ordering::Relaxed)
    }
}
