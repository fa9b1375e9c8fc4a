//! Timing configuration of the key state machine.
//!
//! Every value here is expressed in ticks. The defaults assume a 10ms tick; if the
//! sampling period changes, all of them must be rescaled together.
use core::fmt;

use keytick_types::key_mask::KeyMask;

/// Number of consecutive pressed samples needed before a key is trusted as pressed.
#[cfg(not(feature = "simulation"))]
pub const DEFAULT_FILTER_DEPTH: u8 = 4;
/// Simulator builds have no contact bounce, a single sample is enough.
#[cfg(feature = "simulation")]
pub const DEFAULT_FILTER_DEPTH: u8 = 1;

/// Deepest debounce filter supported by the history register
pub const MAX_FILTER_DEPTH: u8 = 8;

/// Config for the debounce filter and the event timings of every key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeysConfig {
    /// Debounce filter depth, in samples (1..=8)
    pub filter_depth: u8,
    /// Held ticks after the first event before a long press is reported
    pub long_delay: u16,
    /// Held ticks after the first event before auto-repeat starts
    pub repeat_delay: u16,
    /// Ticks spent at one repeat rate before the rate doubles
    pub repeat_trigger: u16,
    /// Dwell of a paused key before repeats resume
    pub pause_delay: u16,
    /// Keys that never auto-repeat, e.g. shift
    pub non_repeating: KeyMask,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl KeysConfig {
    pub const fn new() -> Self {
        Self {
            filter_depth: DEFAULT_FILTER_DEPTH,
            long_delay: 32,
            repeat_delay: 40,
            repeat_trigger: 48,
            pause_delay: 64,
            non_repeating: KeyMask::EMPTY,
        }
    }

    pub const fn with_filter_depth(mut self, filter_depth: u8) -> Self {
        self.filter_depth = filter_depth;
        self
    }

    pub const fn with_long_delay(mut self, long_delay: u16) -> Self {
        self.long_delay = long_delay;
        self
    }

    pub const fn with_repeat_delay(mut self, repeat_delay: u16) -> Self {
        self.repeat_delay = repeat_delay;
        self
    }

    pub const fn with_repeat_trigger(mut self, repeat_trigger: u16) -> Self {
        self.repeat_trigger = repeat_trigger;
        self
    }

    pub const fn with_pause_delay(mut self, pause_delay: u16) -> Self {
        self.pause_delay = pause_delay;
        self
    }

    pub const fn with_non_repeating(mut self, non_repeating: KeyMask) -> Self {
        self.non_repeating = non_repeating;
        self
    }

    /// Check that the timings can produce every kind of event.
    ///
    /// A long delay equal to the repeat delay is accepted: both fire on the same tick.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.filter_depth == 0 || self.filter_depth > MAX_FILTER_DEPTH {
            return Err(ConfigError::FilterDepthOutOfRange(self.filter_depth));
        }
        if self.long_delay == 0 {
            return Err(ConfigError::ZeroLongDelay);
        }
        if self.repeat_delay == 0 {
            return Err(ConfigError::ZeroRepeatDelay);
        }
        if self.long_delay > self.repeat_delay {
            return Err(ConfigError::LongDelayAfterRepeat {
                long: self.long_delay,
                repeat: self.repeat_delay,
            });
        }
        if self.repeat_trigger == 0 {
            return Err(ConfigError::ZeroRepeatTrigger);
        }
        Ok(())
    }
}

/// Rejected [`KeysConfig`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    FilterDepthOutOfRange(u8),
    /// The key would start repeating before a long press could be seen
    LongDelayAfterRepeat { long: u16, repeat: u16 },
    /// Delays are counted from the tick after the first press, zero is never reached
    ZeroLongDelay,
    ZeroRepeatDelay,
    ZeroRepeatTrigger,
    /// More keys than a [`KeyMask`] can mark
    TooManyKeys { keys: usize, capacity: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FilterDepthOutOfRange(depth) => {
                write!(f, "filter depth {} is outside 1..={}", depth, MAX_FILTER_DEPTH)
            }
            ConfigError::LongDelayAfterRepeat { long, repeat } => {
                write!(f, "long delay {} is after repeat delay {}", long, repeat)
            }
            ConfigError::ZeroLongDelay => write!(f, "long delay must be non-zero"),
            ConfigError::ZeroRepeatDelay => write!(f, "repeat delay must be non-zero"),
            ConfigError::ZeroRepeatTrigger => write!(f, "repeat trigger must be non-zero"),
            ConfigError::TooManyKeys { keys, capacity } => {
                write!(f, "{} keys exceed the key mask capacity of {}", keys, capacity)
            }
        }
    }
}

impl core::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = KeysConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.long_delay, 32);
        assert_eq!(config.repeat_delay, 40);
        assert_eq!(config.repeat_trigger, 48);
        assert_eq!(config.pause_delay, 64);
    }

    #[test]
    fn test_filter_depth_bounds() {
        assert_eq!(
            KeysConfig::new().with_filter_depth(0).validate(),
            Err(ConfigError::FilterDepthOutOfRange(0))
        );
        assert_eq!(
            KeysConfig::new().with_filter_depth(9).validate(),
            Err(ConfigError::FilterDepthOutOfRange(9))
        );
        assert!(KeysConfig::new().with_filter_depth(8).validate().is_ok());
        assert!(KeysConfig::new().with_filter_depth(1).validate().is_ok());
    }

    #[test]
    fn test_long_delay_must_not_pass_repeat_delay() {
        let config = KeysConfig::new().with_long_delay(41);
        assert_eq!(
            config.validate(),
            Err(ConfigError::LongDelayAfterRepeat { long: 41, repeat: 40 })
        );
        // Equal delays are kept: long press and repeat start share a tick
        assert!(KeysConfig::new().with_long_delay(40).validate().is_ok());
    }

    #[test]
    fn test_zero_repeat_trigger() {
        assert_eq!(
            KeysConfig::new().with_repeat_trigger(0).validate(),
            Err(ConfigError::ZeroRepeatTrigger)
        );
    }

    #[test]
    fn test_zero_delays_are_rejected() {
        assert_eq!(
            KeysConfig::new().with_long_delay(0).validate(),
            Err(ConfigError::ZeroLongDelay)
        );
        assert_eq!(
            KeysConfig::new().with_repeat_delay(0).with_long_delay(0).validate(),
            Err(ConfigError::ZeroLongDelay)
        );
        assert_eq!(
            KeysConfig::new().with_long_delay(1).with_repeat_delay(0).validate(),
            Err(ConfigError::ZeroRepeatDelay)
        );
        assert!(KeysConfig::new().with_long_delay(1).with_repeat_delay(1).validate().is_ok());
    }
}
