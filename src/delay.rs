//! Blocking delays on top of the tick counter.
//!
//! `Delay::sleep(n)` samples the counter on entry and spins until `n` ticks
//! have gone by. It never returns early and, with a working timer, returns
//! within one tick of the deadline. There is no way to cancel it.

use core::hint::spin_loop;

use embedded_hal::delay::DelayNs;

use crate::tick::{TickSource, Ticks};
use crate::timer::TICK_HZ;

const MILLIS_PER_TICK: u32 = 1_000 / TICK_HZ;
const MICROS_PER_TICK: u32 = 1_000_000 / TICK_HZ;
const NANOS_PER_TICK: u32 = 1_000_000_000 / TICK_HZ;

/// A point `duration` ticks after `start`.
///
/// Non-blocking form of [`Delay::sleep`]: poll `is_expired` from a loop that
/// has other work to do, or call `wait` to spin on it.
pub struct Deadline<S> {
    source: S,
    start: Ticks,
    duration: Ticks,
}

impl<S: TickSource> Deadline<S> {
    pub fn after(source: S, duration: Ticks) -> Self {
        let start = source.now();
        Deadline {
            source,
            start,
            duration,
        }
    }

    pub fn start(&self) -> Ticks {
        self.start
    }

    pub fn is_expired(&self) -> bool {
        self.source.ticks_since(self.start) >= self.duration
    }

    /// Ticks left until expiry, 0 once expired
    pub fn remaining(&self) -> Ticks {
        self.duration.saturating_sub(self.source.ticks_since(self.start))
    }

    /// Spin until the deadline passes
    pub fn wait(&self) {
        while !self.is_expired() {
            spin_loop();
        }
    }
}

pub struct Delay<S> {
    source: S,
}

impl<S: TickSource> Delay<S> {
    pub const fn new(source: S) -> Self {
        Delay { source }
    }

    /// Current tick count
    pub fn now(&self) -> Ticks {
        self.source.now()
    }

    pub fn ticks_since(&self, start: Ticks) -> Ticks {
        self.source.ticks_since(start)
    }

    /// Whole milliseconds since `start`
    pub fn millis_since(&self, start: Ticks) -> u32 {
        let millis = u64::from(self.ticks_since(start)) * 1_000 / u64::from(TICK_HZ);
        millis.min(u64::from(u32::MAX)) as u32
    }

    pub fn has_elapsed(&self, start: Ticks, duration: Ticks) -> bool {
        self.ticks_since(start) >= duration
    }

    pub fn deadline(&self, duration: Ticks) -> Deadline<&S> {
        Deadline::after(&self.source, duration)
    }

    /// Busy-wait for `duration` ticks.
    pub fn sleep(&self, duration: Ticks) {
        self.deadline(duration).wait();
    }

    pub fn free(self) -> S {
        self.source
    }
}

/* Round a request up to whole ticks, plus one: the first tick edge after
 * sampling may be arbitrarily close, so n tick edges only guarantee n - 1
 * full ticks of wall-clock time. */
fn ticks_for(amount: u32, per_tick: u32) -> Ticks {
    if amount == 0 {
        return 0;
    }
    amount.div_ceil(per_tick).saturating_add(1)
}

impl<S: TickSource> DelayNs for Delay<S> {
    fn delay_ns(&mut self, ns: u32) {
        self.sleep(ticks_for(ns, NANOS_PER_TICK));
    }

    fn delay_us(&mut self, us: u32) {
        self.sleep(ticks_for(us, MICROS_PER_TICK));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.sleep(ticks_for(ms, MILLIS_PER_TICK));
    }
}
