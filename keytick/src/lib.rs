//! # keytick
//!
//! Turns raw, bouncing key samples taken at a fixed tick rate into discrete key events:
//! first press, long press, accelerating auto-repeat and release.
//!
//! - [`key::Key`] is the per-key debounce filter and event state machine
//! - [`keypad::Keypad`] owns the keys of a device, routes their events to an
//!   [`event::EventSink`] and implements the kill/pause overrides and the blocking
//!   release wait
//! - [`sampler`], [`event`] and [`release`] hold the collaborator traits: raw sampling,
//!   event delivery, tick clock and watchdog

#![no_std]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod config;
pub mod debounce;
pub mod event;
pub mod key;
pub mod keypad;
pub mod release;
pub mod sampler;
pub mod state;

pub use config::{ConfigError, KeysConfig};
pub use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex as RawMutex;
pub use event::{EventSink, EventSlot};
pub use key::{Key, KeyEvents, KeyState, RepeatDivisor};
pub use keypad::Keypad;
pub use keytick_types::event::{EventCode, KeyEvent, KeyEventKind};
pub use keytick_types::key_mask::KeyMask;
pub use release::{EmbassyTickClock, NoWatchdog, RELEASE_TIMEOUT_TICKS, ReleaseTimeout, TickClock, Watchdog};
pub use sampler::{KeySampler, PinSampler};
pub use state::InactivityCounter;
