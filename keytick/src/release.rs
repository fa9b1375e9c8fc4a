//! Blocking wait for every key to be released.
//!
//! The wait spins on the raw samples, so it keeps feeding the watchdog to avoid being
//! taken for a hang. Both the clock and the watchdog are passed in by the caller.
use core::fmt;

use embassy_time::{Duration, Instant};

use crate::sampler::KeySampler;

/// Default bound of the release wait: 3s at a 10ms tick
pub const RELEASE_TIMEOUT_TICKS: u32 = 300;

/// Monotonic counter advancing once per sampling period
pub trait TickClock {
    fn now(&self) -> u32;
}

/// Liveness signal serviced while waiting
pub trait Watchdog {
    fn feed(&mut self);
}

impl<F: FnMut()> Watchdog for F {
    fn feed(&mut self) {
        self()
    }
}

/// For contexts without a watchdog
pub struct NoWatchdog;

impl Watchdog for NoWatchdog {
    fn feed(&mut self) {}
}

/// [`TickClock`] counting periods of the embassy time driver.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EmbassyTickClock {
    period: Duration,
}

impl Default for EmbassyTickClock {
    fn default() -> Self {
        Self::from_millis(10)
    }
}

impl EmbassyTickClock {
    pub const fn new(period: Duration) -> Self {
        Self { period }
    }

    pub const fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl TickClock for EmbassyTickClock {
    fn now(&self) -> u32 {
        let period = self.period.as_ticks().max(1);
        (Instant::now().as_ticks() / period) as u32
    }
}

/// At least one key was still pressed when the release wait timed out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReleaseTimeout {
    /// First key found pressed on the last sample
    pub key: usize,
    /// Ticks waited
    pub waited: u32,
}

impl fmt::Display for ReleaseTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key {} still pressed after {} ticks", self.key, self.waited)
    }
}

impl core::error::Error for ReleaseTimeout {}

/// Spin until none of the first `num_keys` keys reads pressed.
///
/// `timeout` is in ticks of `clock`; `None` waits for as long as it takes.
pub(crate) fn wait_all_released<K, C, W>(
    sampler: &mut K,
    num_keys: usize,
    clock: &C,
    watchdog: &mut W,
    timeout: Option<u32>,
) -> Result<(), ReleaseTimeout>
where
    K: KeySampler + ?Sized,
    C: TickClock + ?Sized,
    W: Watchdog + ?Sized,
{
    let start = clock.now();
    loop {
        watchdog.feed();
        let Some(key) = sampler.any_pressed(num_keys) else {
            return Ok(());
        };
        if let Some(timeout) = timeout {
            let waited = clock.now().wrapping_sub(start);
            if waited >= timeout {
                warn!("Key {} still pressed after {} ticks, giving up", key, waited);
                return Err(ReleaseTimeout { key, waited });
            }
        }
    }
}
