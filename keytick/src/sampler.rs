//! Raw key samplers.
use embedded_hal::digital::InputPin;

/// Source of raw key readings, one per key per tick.
pub trait KeySampler {
    /// Read whether key `key` is physically pressed right now, without any filtering
    fn is_pressed(&mut self, key: usize) -> bool;

    /// Index of the first of `num_keys` keys reading pressed, if any
    fn any_pressed(&mut self, num_keys: usize) -> Option<usize> {
        (0..num_keys).find(|&key| self.is_pressed(key))
    }
}

impl<F: FnMut(usize) -> bool> KeySampler for F {
    fn is_pressed(&mut self, key: usize) -> bool {
        self(key)
    }
}

/// Sampler reading one GPIO input per key.
pub struct PinSampler<P: InputPin, const N: usize> {
    pins: [P; N],
    /// A pressed key pulls its pin low
    active_low: bool,
}

impl<P: InputPin, const N: usize> PinSampler<P, N> {
    pub fn new(pins: [P; N], active_low: bool) -> Self {
        Self { pins, active_low }
    }

    /// Give the pins back
    pub fn into_pins(self) -> [P; N] {
        self.pins
    }
}

impl<P: InputPin, const N: usize> KeySampler for PinSampler<P, N> {
    fn is_pressed(&mut self, key: usize) -> bool {
        let Some(pin) = self.pins.get_mut(key) else {
            return false;
        };
        match pin.is_low() {
            Ok(low) => low == self.active_low,
            Err(_) => {
                // A key that cannot be read is treated as released
                error!("Failed to read pin of key {}", key);
                false
            }
        }
    }
}
