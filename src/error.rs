//! Configuration errors.
//!
//! Nothing in the tick path can fail at runtime. The only errors are timer
//! settings that can't produce the requested tick rate, and those are caught
//! when the configuration is built (at compile time for `const` configs).

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Requested tick rate is 0 Hz
    ZeroTickRate,

    /// Fewer than two timer counts per tick
    ReloadTooSmall {
        /// Counts per tick that the settings would give
        reload: u32,
    },

    /// More counts per tick than the 16-bit counter holds
    ReloadTooLarge {
        /// Counts per tick that the settings would give
        reload: u32,
    },

    /// Clock doesn't divide evenly into the tick rate, so every tick would drift
    InexactTickRate {
        /// Timer frequency after the prescaler
        counter_hz: u32,
        /// Requested tick rate
        tick_hz: u32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroTickRate => write!(f, "tick rate must be non-zero"),
            ConfigError::ReloadTooSmall { reload } => {
                write!(f, "{} counts per tick is too few", reload)
            }
            ConfigError::ReloadTooLarge { reload } => {
                write!(f, "{} counts per tick exceeds the 16-bit counter", reload)
            }
            ConfigError::InexactTickRate { counter_hz, tick_hz } => write!(
                f,
                "{} Hz timer clock is not a multiple of the {} Hz tick",
                counter_hz, tick_hz
            ),
        }
    }
}
