//! The tick counter and delay driven the way the firmware drives them, with
//! a thread standing in for the overflow interrupt.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use samd21_ticker::report::{self, Sink};
use samd21_ticker::{Deadline, Delay, OverflowFlag, TickCounter, TickSource};

/* Overflow flag that is always set, like a timer that fired */
struct Fired;

impl OverflowFlag for Fired {
    fn is_pending(&self) -> bool {
        true
    }

    fn acknowledge(&self) {}
}

/* Fire `counter` once per millisecond until `stop` is set */
fn spawn_ticker(counter: &'static TickCounter, stop: &'static AtomicBool) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while !stop.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(1));
            counter.on_overflow(&Fired);
        }
    })
}

#[test]
fn sleep_for_twenty_ticks() {
    static COUNTER: TickCounter = TickCounter::new();
    static STOP: AtomicBool = AtomicBool::new(false);
    let ticker = spawn_ticker(&COUNTER, &STOP);

    let delay = Delay::new(&COUNTER);
    let start = delay.now();
    let wall = Instant::now();
    delay.sleep(20);
    let elapsed = delay.ticks_since(start);

    STOP.store(true, Ordering::SeqCst);
    ticker.join().unwrap();

    assert!(elapsed >= 20);
    /* Each tick is at least a millisecond of sleeping on the ticker thread */
    assert!(wall.elapsed() >= Duration::from_millis(19));
}

#[test]
fn sleep_through_wrap() {
    static COUNTER: TickCounter = TickCounter::starting_at(u32::MAX - 1);
    static STOP: AtomicBool = AtomicBool::new(false);

    /* Sample before the ticker runs so the wait starts right below the wrap */
    let delay = Delay::new(&COUNTER);
    let deadline = delay.deadline(3);
    assert_eq!(deadline.start(), u32::MAX - 1);

    let ticker = spawn_ticker(&COUNTER, &STOP);
    deadline.wait();
    let end = delay.now();

    STOP.store(true, Ordering::SeqCst);
    ticker.join().unwrap();

    /* MAX - 1 + 3 lands on 1 */
    assert!(delay.ticks_since(deadline.start()) >= 3);
    assert!(end >= 1 && end < u32::MAX - 1);
}

#[test]
fn deadline_polled_from_a_loop() {
    static COUNTER: TickCounter = TickCounter::new();
    static STOP: AtomicBool = AtomicBool::new(false);
    let ticker = spawn_ticker(&COUNTER, &STOP);

    let deadline = Deadline::after(&COUNTER, 5);
    let mut polls = 0u64;
    while !deadline.is_expired() {
        polls += 1;
        thread::yield_now();
    }

    STOP.store(true, Ordering::SeqCst);
    ticker.join().unwrap();

    assert!(polls > 0);
    assert_eq!(deadline.remaining(), 0);
    assert!(COUNTER.ticks_since(deadline.start()) >= 5);
}

#[test]
fn monotonic_while_ticking() {
    static COUNTER: TickCounter = TickCounter::new();
    static STOP: AtomicBool = AtomicBool::new(false);
    let ticker = spawn_ticker(&COUNTER, &STOP);

    let first = COUNTER.now();
    let mut last = first;
    while COUNTER.ticks_since(first) < 10 {
        let now = COUNTER.now();
        assert!(now.wrapping_sub(first) >= last.wrapping_sub(first));
        last = now;
    }

    STOP.store(true, Ordering::SeqCst);
    ticker.join().unwrap();
}

#[derive(Default)]
struct Console(Vec<u8>);

impl Sink for Console {
    type Error = ();

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), ()> {
        self.0.extend_from_slice(bytes);
        Ok(())
    }
}

#[test]
fn report_loop() {
    static COUNTER: TickCounter = TickCounter::starting_at(39);
    let delay = Delay::new(&COUNTER);
    let mut console = Console::default();

    console.write_all(report::STARTUP_BANNER).unwrap();
    report::emit(&delay, &mut console).unwrap();
    COUNTER.increment();
    report::emit(&delay, &mut console).unwrap();

    assert_eq!(
        String::from_utf8(console.0).unwrap(),
        "System Initialized.\r\nTask Running at 1 s\r\nTask Running at 2 s\r\n"
    );
}
