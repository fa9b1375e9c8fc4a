use core::sync::atomic::{AtomicU16, Ordering};

/// Ticks since the last key was pressed.
///
/// The key state machine resets it on every first press; the idle and power logic
/// advances it and reads it. Only plain loads and stores are used, so it also works on
/// targets without atomic read-modify-write.
pub struct InactivityCounter {
    ticks: AtomicU16,
}

impl Default for InactivityCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl InactivityCounter {
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU16::new(0),
        }
    }

    pub fn get(&self) -> u16 {
        self.ticks.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.ticks.store(0, Ordering::Release);
    }

    /// Advance by one tick, saturating
    pub fn tick(&self) {
        let ticks = self.ticks.load(Ordering::Acquire);
        self.ticks.store(ticks.saturating_add(1), Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_and_reset() {
        let counter = InactivityCounter::new();
        for _ in 0..5 {
            counter.tick();
        }
        assert_eq!(counter.get(), 5);
        counter.reset();
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_tick_saturates() {
        let counter = InactivityCounter::new();
        counter.ticks.store(u16::MAX, Ordering::Relaxed);
        counter.tick();
        assert_eq!(counter.get(), u16::MAX);
    }
}
