#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_halt as _;

use cortex_m_rt::entry;
use samd21_ticker::pac::{interrupt, Peripherals};
use samd21_ticker::report::{self, REPORT_INTERVAL_TICKS, STARTUP_BANNER};
use samd21_ticker::{
    init_48_mhz_clock, init_tick_timer, on_tc3_overflow, Delay, SerialPort, Sink, TickSource,
    BAUD_RATE, TC3_MILLIS, TICKS,
};

defmt::timestamp!("{=u32}", TICKS.now());

#[entry]
fn main() -> ! {
    let Some(mut dp) = Peripherals::take() else {
        panic!("peripherals already taken");
    };

    /* Initialise clock, has its own critical section */
    init_48_mhz_clock(&dp.GCLK, &dp.SYSCTRL, &mut dp.NVMCTRL);

    /* Start the millisecond tick */
    init_tick_timer(&mut dp.PM, &dp.GCLK, dp.TC3, &TC3_MILLIS);

    let mut serial = SerialPort::new(&mut dp.PM, &dp.GCLK, &dp.PORT, dp.SERCOM3, BAUD_RATE);
    serial.write_all(STARTUP_BANNER).unwrap_or_else(|e| match e {});

    let delay = Delay::new(&TICKS);
    defmt::info!("reporting every {=u32} ticks", REPORT_INTERVAL_TICKS);

    loop {
        report::emit(&delay, &mut serial).unwrap_or_else(|e| match e {});
        delay.sleep(REPORT_INTERVAL_TICKS);
    }
}

/* Timer overflow, once per millisecond */
#[interrupt]
fn TC3() {
    on_tc3_overflow();
}
