#![allow(dead_code)]

use core::cell::Cell;

use heapless::{Deque, Vec};
use keytick::{InactivityCounter, KeyEvent, KeyEventKind, Keypad, KeysConfig, TickClock};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub type TestQueue = Deque<KeyEvent, 64>;
pub type TestKeypad<'a, const N: usize> = Keypad<'a, TestQueue, N>;

/// An event together with the tick it was produced on, ticks counted from 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapeEntry {
    pub tick: u32,
    pub event: KeyEvent,
}

pub const fn at(tick: u32, kind: KeyEventKind, key: u8) -> TapeEntry {
    TapeEntry {
        tick,
        event: KeyEvent::new(kind, key),
    }
}

/// Config used by most tests: 4 sample filter, 32/40/48/64 tick delays
pub fn test_config() -> KeysConfig {
    KeysConfig::new().with_filter_depth(4)
}

pub fn new_keypad<const N: usize>(config: KeysConfig, inactivity: &InactivityCounter) -> TestKeypad<'_, N> {
    Keypad::new(config, Deque::new(), inactivity).unwrap()
}

/// Run `ticks` ticks, sampling key `k` at tick `t` with `pressed(t, k)`.
/// Events are recorded with the tick (offset by `start`) they were produced on.
pub fn run_ticks<const N: usize, const M: usize>(
    keypad: &mut TestKeypad<'_, N>,
    start: u32,
    ticks: u32,
    mut pressed: impl FnMut(u32, usize) -> bool,
    tape: &mut Vec<TapeEntry, M>,
) {
    for t in start..start + ticks {
        let mut samples = [false; N];
        for (k, s) in samples.iter_mut().enumerate() {
            *s = pressed(t, k);
        }
        keypad.tick(&samples);
        while let Some(event) = keypad.sink_mut().pop_front() {
            tape.push(TapeEntry { tick: t, event }).expect("tape overflow");
        }
    }
}

/// Drain the sink of the keypad
pub fn drain<const N: usize>(keypad: &mut TestKeypad<'_, N>) -> Vec<KeyEvent, 64> {
    let mut events = Vec::new();
    while let Some(event) = keypad.sink_mut().pop_front() {
        let _ = events.push(event);
    }
    events
}

/// Press key `key` from idle until its first event has been produced
pub fn press_until_first<const N: usize>(keypad: &mut TestKeypad<'_, N>, key: usize) {
    let mut samples = [false; N];
    samples[key] = true;
    for _ in 0..=keypad.config().filter_depth {
        keypad.tick(&samples);
    }
    assert_eq!(
        drain(keypad).as_slice(),
        &[KeyEvent::new(KeyEventKind::First, key as u8)]
    );
}

/// Clock advancing by `step` ticks on every read
pub struct SteppingClock {
    now: Cell<u32>,
    step: u32,
}

impl SteppingClock {
    pub fn new(step: u32) -> Self {
        Self { now: Cell::new(0), step }
    }

    pub fn reads(&self) -> u32 {
        self.now.get() / self.step.max(1)
    }
}

impl TickClock for SteppingClock {
    fn now(&self) -> u32 {
        let now = self.now.get();
        self.now.set(now.wrapping_add(self.step));
        now
    }
}
