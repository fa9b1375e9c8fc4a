//! Per-key debounce and event state machine.
//!
//! A [`Key`] consumes one raw sample per tick and classifies the sample stream into
//! [`KeyEvent`]s:
//!
//! ```text
//! Idle --debounced--> Debounced --First--> RepeatDelay --+--> Repeating(16) -> (8) -> (4) -> (2) -> (1)
//!                                                         `-- Long (once, state unchanged)
//! pause():  any --> Paused --pause delay--> Repeating(8)
//! kill():   any --> Killed
//! release:  any non-idle --Break (unless Killed)--> Idle
//! ```
use heapless::Vec;
use keytick_types::event::{KeyEvent, KeyEventKind};

use crate::config::KeysConfig;
use crate::debounce::DebounceFilter;

/// Events produced by a single tick of a key
pub type KeyEvents = Vec<KeyEvent, 2>;

/// Repeat rate of a held key.
///
/// A repeat fires whenever the key's tick count is a multiple of the divisor, so halving
/// the divisor doubles the repeat rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RepeatDivisor {
    By16,
    By8,
    By4,
    By2,
    By1,
}

impl RepeatDivisor {
    pub const fn value(self) -> u16 {
        match self {
            RepeatDivisor::By16 => 16,
            RepeatDivisor::By8 => 8,
            RepeatDivisor::By4 => 4,
            RepeatDivisor::By2 => 2,
            RepeatDivisor::By1 => 1,
        }
    }

    /// Next faster rate, `None` at the fastest one
    pub const fn halve(self) -> Option<Self> {
        match self {
            RepeatDivisor::By16 => Some(RepeatDivisor::By8),
            RepeatDivisor::By8 => Some(RepeatDivisor::By4),
            RepeatDivisor::By4 => Some(RepeatDivisor::By2),
            RepeatDivisor::By2 => Some(RepeatDivisor::By1),
            RepeatDivisor::By1 => None,
        }
    }

    fn fires_at(self, count: u16) -> bool {
        count & (self.value() - 1) == 0
    }
}

/// State of a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyState {
    /// Released, or pressed but not debounced yet
    #[default]
    Idle,
    /// Debounce just passed, the first event fires on the next tick
    Debounced,
    /// First event sent, waiting for the long press and the repeat delay
    RepeatDelay,
    /// Auto-repeating
    Repeating(RepeatDivisor),
    /// Repeats held back for the pause delay
    Paused,
    /// No events until the key is released
    Killed,
}

/// One physical key.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Key {
    index: u8,
    filter: DebounceFilter,
    state: KeyState,
    /// Ticks spent in the current state
    count: u16,
}

impl Key {
    pub const fn new(index: u8, filter_depth: u8) -> Self {
        Self {
            index,
            filter: DebounceFilter::new(filter_depth),
            state: KeyState::Idle,
            count: 0,
        }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn state(&self) -> KeyState {
        self.state
    }

    pub fn count(&self) -> u16 {
        self.count
    }

    pub fn history(&self) -> u8 {
        self.filter.history()
    }

    /// Feed the raw sample of the current tick, returning the events it produces.
    ///
    /// Must be called exactly once per tick: every delay in `config` counts calls. At most
    /// two events come out of one tick, a Long followed by a Repeat when the long delay
    /// equals the repeat delay.
    pub fn input(&mut self, pressed: bool, config: &KeysConfig) -> KeyEvents {
        let mut events = KeyEvents::new();
        self.filter.shift(pressed);
        self.count = self.count.wrapping_add(1);

        if self.state != KeyState::Idle && self.filter.is_released() {
            let killed = self.state == KeyState::Killed;
            self.enter(KeyState::Idle);
            if !killed {
                self.emit(&mut events, KeyEventKind::Break);
            }
            return events;
        }

        match self.state {
            KeyState::Idle => {
                if self.filter.is_settled() {
                    self.enter(KeyState::Debounced);
                }
            }
            KeyState::Debounced => {
                self.enter(KeyState::RepeatDelay);
                self.emit(&mut events, KeyEventKind::First);
            }
            KeyState::RepeatDelay => {
                if self.count == config.long_delay {
                    self.emit(&mut events, KeyEventKind::Long);
                }
                if self.count == config.repeat_delay {
                    // The first repeat fires on entry
                    self.enter(KeyState::Repeating(RepeatDivisor::By16));
                    self.repeat(&mut events, config);
                }
            }
            KeyState::Repeating(mut divisor) => {
                if self.count >= config.repeat_trigger {
                    if let Some(faster) = divisor.halve() {
                        divisor = faster;
                        self.enter(KeyState::Repeating(divisor));
                    }
                }
                if divisor.fires_at(self.count) {
                    self.repeat(&mut events, config);
                }
            }
            KeyState::Paused => {
                if self.count >= config.pause_delay {
                    self.enter(KeyState::Repeating(RepeatDivisor::By8));
                }
            }
            KeyState::Killed => {}
        }
        events
    }

    /// Hold back repeats for the configured pause delay, then resume at mid speed
    pub fn pause(&mut self) {
        self.enter(KeyState::Paused);
    }

    /// Drop every event of this key until it is released
    pub fn kill(&mut self) {
        self.enter(KeyState::Killed);
    }

    /// Back to the power-on baseline, history included
    pub fn reset(&mut self) {
        self.filter.reset();
        self.state = KeyState::Idle;
        self.count = 0;
    }

    fn enter(&mut self, state: KeyState) {
        trace!("Key {} state {:?} -> {:?}", self.index, self.state, state);
        self.state = state;
        self.count = 0;
    }

    fn repeat(&self, events: &mut KeyEvents, config: &KeysConfig) {
        if !config.non_repeating.contains(self.index as usize) {
            self.emit(events, KeyEventKind::Repeat);
        }
    }

    fn emit(&self, events: &mut KeyEvents, kind: KeyEventKind) {
        let event = KeyEvent::new(kind, self.index);
        if events.push(event).is_err() {
            error!("Key {} produced too many events in one tick, dropping {:?}", self.index, event);
        }
    }
}
