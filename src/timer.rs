//! TC3 tick timer settings.

use crate::clock::CPU_HZ;
use crate::error::ConfigError;

/// Tick rate of the counter, one tick per millisecond
pub const TICK_HZ: u32 = 1_000;

/* Largest period of a 16-bit counter running 0..=0xFFFF */
const MAX_RELOAD: u32 = 0x1_0000;

/// TC clock prescaler settings (CTRLA.PRESCALER)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prescaler {
    Div1,
    Div2,
    Div4,
    Div8,
    Div16,
    Div64,
    Div256,
    Div1024,
}

impl Prescaler {
    pub const fn divisor(self) -> u32 {
        match self {
            Prescaler::Div1 => 1,
            Prescaler::Div2 => 2,
            Prescaler::Div4 => 4,
            Prescaler::Div8 => 8,
            Prescaler::Div16 => 16,
            Prescaler::Div64 => 64,
            Prescaler::Div256 => 256,
            Prescaler::Div1024 => 1024,
        }
    }
}

/// Hardware parameters giving one overflow per tick.
///
/// `reload` is the number of timer counts per tick:
/// `reload = (input_clock_hz / prescaler) / tick_hz`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerConfig {
    input_clock_hz: u32,
    prescaler: Prescaler,
    tick_hz: u32,
    reload: u32,
}

impl TimerConfig {
    pub const fn new(
        input_clock_hz: u32,
        prescaler: Prescaler,
        tick_hz: u32,
    ) -> Result<Self, ConfigError> {
        if tick_hz == 0 {
            return Err(ConfigError::ZeroTickRate);
        }

        let counter_hz = input_clock_hz / prescaler.divisor();
        if input_clock_hz % prescaler.divisor() != 0 || counter_hz % tick_hz != 0 {
            return Err(ConfigError::InexactTickRate {
                counter_hz,
                tick_hz,
            });
        }

        let reload = counter_hz / tick_hz;
        if reload < 2 {
            return Err(ConfigError::ReloadTooSmall { reload });
        }
        if reload > MAX_RELOAD {
            return Err(ConfigError::ReloadTooLarge { reload });
        }

        Ok(TimerConfig {
            input_clock_hz,
            prescaler,
            tick_hz,
            reload,
        })
    }

    pub const fn input_clock_hz(&self) -> u32 {
        self.input_clock_hz
    }

    pub const fn prescaler(&self) -> Prescaler {
        self.prescaler
    }

    pub const fn tick_hz(&self) -> u32 {
        self.tick_hz
    }

    /// Timer counts per tick
    pub const fn reload(&self) -> u32 {
        self.reload
    }

    /// Value for CC0 in match-frequency mode.
    ///
    /// The counter runs from 0 up to and including CC0, so one period is
    /// `CC0 + 1` counts.
    pub const fn top(&self) -> u16 {
        (self.reload - 1) as u16
    }
}

/// GCLK0 at 48 MHz, divided by 64, gives 750 counts per millisecond.
pub const TC3_MILLIS: TimerConfig = match TimerConfig::new(CPU_HZ, Prescaler::Div64, TICK_HZ) {
    Ok(config) => config,
    Err(_) => panic!("TC3 cannot derive a 1 kHz tick from GCLK0"),
};
