//! The periodic status line.
//!
//! Formats `"Task Running at <n> s\r\n"` into a fixed-capacity buffer and
//! hands it to a byte sink. `<n>` counts whole report intervals since the tick
//! timer started: the divisor is the same 20 ticks the loop sleeps between
//! lines, so despite the "s" the number is intervals, not seconds.

use heapless::Vec;
use numtoa::NumToA;

use crate::delay::Delay;
use crate::tick::{TickSource, Ticks};

/// Written once after bring-up
pub const STARTUP_BANNER: &[u8] = b"System Initialized.\r\n";

/// Pause between two status lines, and the divisor of the stamp
pub const REPORT_INTERVAL_TICKS: Ticks = 20;

pub const MESSAGE_CAPACITY: usize = 50;

const PREFIX: &[u8] = b"Task Running at ";
const SUFFIX: &[u8] = b" s\r\n";

/* u32::MAX has 10 digits */
const _: () = assert!(PREFIX.len() + 10 + SUFFIX.len() <= MESSAGE_CAPACITY);

/// Blocking byte output, e.g. a UART transmitter.
///
/// `write_all` returns once the whole buffer has been accepted, either sent
/// or queued for transmission.
pub trait Sink {
    type Error;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Whole report intervals covered by `ticks`
pub const fn elapsed_intervals(ticks: Ticks) -> u32 {
    ticks / REPORT_INTERVAL_TICKS
}

pub struct Report {
    message: Vec<u8, MESSAGE_CAPACITY>,
}

impl Report {
    pub fn new(stamp: u32) -> Self {
        let mut message = Vec::new();

        /* numtoa wants some headroom over the 10 digits */
        let mut digits = [0u8; 20];
        let _ = message.extend_from_slice(PREFIX);
        let _ = message.extend_from_slice(stamp.numtoa(10, &mut digits));
        let _ = message.extend_from_slice(SUFFIX);

        Report { message }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.message
    }

    pub fn write_to<W: Sink + ?Sized>(&self, sink: &mut W) -> Result<(), W::Error> {
        sink.write_all(self.as_bytes())
    }
}

/// Stamp the current time and write one status line.
pub fn emit<S, W>(delay: &Delay<S>, sink: &mut W) -> Result<(), W::Error>
where
    S: TickSource,
    W: Sink + ?Sized,
{
    Report::new(elapsed_intervals(delay.now())).write_to(sink)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tick::TickCounter;

    #[derive(Default)]
    struct Capture {
        bytes: std::vec::Vec<u8>,
        writes: usize,
    }

    impl Sink for Capture {
        type Error = ();

        fn write_all(&mut self, bytes: &[u8]) -> Result<(), ()> {
            self.bytes.extend_from_slice(bytes);
            self.writes += 1;
            Ok(())
        }
    }

    struct Broken;

    impl Sink for Broken {
        type Error = &'static str;

        fn write_all(&mut self, _bytes: &[u8]) -> Result<(), Self::Error> {
            Err("line down")
        }
    }

    #[test]
    fn message_format() {
        assert_eq!(Report::new(0).as_bytes(), b"Task Running at 0 s\r\n");
        assert_eq!(Report::new(20).as_bytes(), b"Task Running at 20 s\r\n");
        assert_eq!(
            Report::new(u32::MAX).as_bytes(),
            b"Task Running at 4294967295 s\r\n"
        );
    }

    #[test]
    fn stamp_counts_intervals() {
        assert_eq!(REPORT_INTERVAL_TICKS, 20);
        assert_eq!(elapsed_intervals(0), 0);
        assert_eq!(elapsed_intervals(19), 0);
        assert_eq!(elapsed_intervals(20), 1);
        assert_eq!(elapsed_intervals(REPORT_INTERVAL_TICKS * 3), 3);
        assert_eq!(elapsed_intervals(u32::MAX), u32::MAX / 20);
    }

    #[test]
    fn emit_writes_one_line() {
        /* Two 20 tick sleeps since start */
        let counter = TickCounter::starting_at(40);
        let delay = Delay::new(&counter);
        let mut sink = Capture::default();

        emit(&delay, &mut sink).unwrap();
        assert_eq!(sink.writes, 1);
        assert_eq!(sink.bytes, b"Task Running at 2 s\r\n");
    }

    #[test]
    fn sink_errors_propagate() {
        let delay = Delay::new(TickCounter::new());
        assert_eq!(emit(&delay, &mut Broken), Err("line down"));
    }

    #[test]
    fn banner() {
        let mut sink = Capture::default();
        sink.write_all(STARTUP_BANNER).unwrap();
        assert_eq!(sink.bytes, b"System Initialized.\r\n");
    }
}
