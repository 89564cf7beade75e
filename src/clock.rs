//! Clock tree constants.
//!
//! Everything here assumes `init_48_mhz_clock` has run, i.e. GCLK0 (and
//! with it the CPU, TC3 and SERCOM3) is fed from the DFLL at 48 MHz.

/// GCLK0 / CPU frequency after clock bring-up
pub const CPU_HZ: u32 = 48_000_000;

/// Serial console baud rate
pub const BAUD_RATE: u32 = 115_200;

/// BAUD register value for the SERCOM USART arithmetic baud generator with
/// 16x oversampling: `65536 * (1 - 16 * baud / ref_hz)`.
pub const fn arithmetic_baud(ref_hz: u32, baud: u32) -> u16 {
    let ratio = (65_536 * 16 * baud as u64) / ref_hz as u64;
    (65_536 - ratio) as u16
}
