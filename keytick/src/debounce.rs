//! Shift register debounce filter.
//!
//! Every tick the newest raw sample is shifted into bit 0 of a history register that is
//! `depth` bits wide. The key is trusted as pressed once the whole register is ones, and
//! as released as soon as the whole register is zeros.

use crate::config::MAX_FILTER_DEPTH;

/// History of the last `depth` raw samples of one key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceFilter {
    history: u8,
    /// All-ones pattern of the filter width
    mask: u8,
}

impl DebounceFilter {
    /// Create a filter keeping `depth` samples, clamped to `1..=MAX_FILTER_DEPTH`
    pub const fn new(depth: u8) -> Self {
        let depth = if depth == 0 {
            1
        } else if depth > MAX_FILTER_DEPTH {
            MAX_FILTER_DEPTH
        } else {
            depth
        };
        Self {
            history: 0,
            mask: (((1u16 << depth) - 1) & 0xFF) as u8,
        }
    }

    /// Push one raw sample into the history
    pub fn shift(&mut self, pressed: bool) {
        self.history = ((self.history << 1) | pressed as u8) & self.mask;
    }

    /// The last `depth` samples were all pressed
    pub fn is_settled(&self) -> bool {
        self.history == self.mask
    }

    /// None of the last `depth` samples was pressed
    pub fn is_released(&self) -> bool {
        self.history == 0
    }

    pub fn history(&self) -> u8 {
        self.history
    }

    pub fn depth(&self) -> u8 {
        self.mask.count_ones() as u8
    }

    pub fn reset(&mut self) {
        self.history = 0;
    }
}
