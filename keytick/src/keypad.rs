//! The set of keys of a device, and the controls acting on all of them.
use core::array;

use keytick_types::event::KeyEvent;
use keytick_types::key_mask::KeyMask;

use crate::config::{ConfigError, KeysConfig};
use crate::event::EventSink;
use crate::key::Key;
use crate::release::{ReleaseTimeout, TickClock, Watchdog, wait_all_released};
use crate::sampler::KeySampler;
use crate::state::InactivityCounter;

/// Owner of the key table.
///
/// A `Keypad` drives the per-key state machines once per tick, forwards the resulting
/// events to its sink and resets the shared inactivity counter on every first press.
/// It is meant to be driven from a single execution context: overrides such as
/// [`Keypad::kill`] are applied between two ticks.
pub struct Keypad<'a, S: EventSink, const N: usize> {
    keys: [Key; N],
    config: KeysConfig,
    sink: S,
    inactivity: &'a InactivityCounter,
}

impl<'a, S: EventSink, const N: usize> Keypad<'a, S, N> {
    pub fn new(config: KeysConfig, sink: S, inactivity: &'a InactivityCounter) -> Result<Self, ConfigError> {
        if N > KeyMask::CAPACITY {
            return Err(ConfigError::TooManyKeys { keys: N, capacity: KeyMask::CAPACITY });
        }
        config.validate()?;
        Ok(Self {
            keys: array::from_fn(|i| Key::new(i as u8, config.filter_depth)),
            config,
            sink,
            inactivity,
        })
    }

    /// Sample every key once and run its state machine, in index order.
    pub fn scan<K: KeySampler + ?Sized>(&mut self, sampler: &mut K) {
        for i in 0..N {
            let pressed = sampler.is_pressed(i);
            self.input(i, pressed);
        }
    }

    /// Same as [`Keypad::scan`] with samples already read
    pub fn tick(&mut self, samples: &[bool; N]) {
        for (i, &pressed) in samples.iter().enumerate() {
            self.input(i, pressed);
        }
    }

    fn input(&mut self, index: usize, pressed: bool) {
        for event in self.keys[index].input(pressed, &self.config) {
            if event.is_press() {
                self.inactivity.reset();
            }
            debug!("Key {} {}", event.key, event.kind.name());
            self.sink.push(event);
        }
    }

    /// Hold back the repeats of `key` for the pause delay. Out of range keys are ignored.
    pub fn pause(&mut self, key: usize) {
        match self.keys.get_mut(key) {
            Some(k) => {
                debug!("Pausing key {}", key);
                k.pause();
            }
            None => debug!("Ignoring pause of unknown key {}", key),
        }
    }

    /// Suppress every event of `key` until it is released. Out of range keys are ignored.
    pub fn kill(&mut self, key: usize) {
        match self.keys.get_mut(key) {
            Some(k) => {
                debug!("Killing key {}", key);
                k.kill();
            }
            None => debug!("Ignoring kill of unknown key {}", key),
        }
    }

    pub fn kill_all(&mut self) {
        debug!("Killing all keys");
        self.keys.iter_mut().for_each(Key::kill);
    }

    /// Pause the key an event was produced for
    pub fn pause_event(&mut self, event: &KeyEvent) {
        self.pause(event.key as usize);
    }

    /// Kill the key an event was produced for
    pub fn kill_event(&mut self, event: &KeyEvent) {
        self.kill(event.key as usize);
    }

    /// Block until every key reads released, feeding `watchdog` while spinning.
    ///
    /// `timeout` is in ticks of `clock`, `None` waits without bound. On success every key
    /// is reset to its power-on state and pending events are flushed from the sink. On
    /// timeout nothing is touched, the caller decides what a stuck key means.
    pub fn wait_released<K, C, W>(
        &mut self,
        sampler: &mut K,
        clock: &C,
        watchdog: &mut W,
        timeout: Option<u32>,
    ) -> Result<(), ReleaseTimeout>
    where
        K: KeySampler + ?Sized,
        C: TickClock + ?Sized,
        W: Watchdog + ?Sized,
    {
        wait_all_released(sampler, N, clock, watchdog, timeout)?;
        self.keys.iter_mut().for_each(Key::reset);
        self.sink.flush();
        info!("All keys released");
        Ok(())
    }

    pub fn key(&self, index: usize) -> Option<&Key> {
        self.keys.get(index)
    }

    pub fn keys(&self) -> &[Key; N] {
        &self.keys
    }

    pub fn config(&self) -> &KeysConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
