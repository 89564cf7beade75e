//! Millisecond tick service and blocking delay for the ATSAMD21.
//!
//! TC3 overflows once per millisecond and its interrupt bumps [`TICKS`];
//! [`Delay`] reads that counter to tell the time and to spin for a number of
//! ticks. The counter, delay and report formatting are plain `no_std` code
//! that runs on the host; the register-level bring-up needs the `rt` feature.

#![cfg_attr(not(test), no_std)]

pub mod clock;
#[cfg(feature = "rt")]
mod common;
pub mod delay;
mod error;
pub mod report;
pub mod tick;
pub mod timer;

#[cfg(feature = "rt")]
pub use atsamd21g as pac;
pub use clock::{BAUD_RATE, CPU_HZ};
#[cfg(feature = "rt")]
pub use common::*;
pub use delay::{Deadline, Delay};
pub use error::ConfigError;
pub use report::{Report, Sink};
pub use tick::{OverflowFlag, TickCounter, TickSource, Ticks, TICKS};
pub use timer::{Prescaler, TimerConfig, TC3_MILLIS, TICK_HZ};
