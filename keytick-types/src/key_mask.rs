//! Sets of key indices.
use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

use postcard::experimental::max_size::MaxSize;
use serde::{Deserialize, Serialize};

/// A set of up to [`KeyMask::CAPACITY`] key indices, one bit per key.
///
/// Used to mark keys that need special handling, e.g. modifier keys that never
/// auto-repeat, or trim keys whose events are consumed separately.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, MaxSize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyMask(u64);

impl KeyMask {
    /// Highest number of keys a mask can hold
    pub const CAPACITY: usize = u64::BITS as usize;

    pub const EMPTY: Self = Self(0);

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn into_bits(self) -> u64 {
        self.0
    }

    /// Build a mask from a list of key indices. Indices beyond the capacity are skipped.
    pub const fn from_keys(keys: &[usize]) -> Self {
        let mut mask = Self::EMPTY;
        let mut i = 0;
        while i < keys.len() {
            mask = mask.with(keys[i]);
            i += 1;
        }
        mask
    }

    /// Return a copy of the mask with `key` added
    pub const fn with(self, key: usize) -> Self {
        if key < Self::CAPACITY {
            Self(self.0 | (1 << key))
        } else {
            self
        }
    }

    pub const fn contains(&self, key: usize) -> bool {
        key < Self::CAPACITY && self.0 & (1 << key) != 0
    }

    pub fn insert(&mut self, key: usize) {
        *self = self.with(key);
    }

    pub fn remove(&mut self, key: usize) {
        if key < Self::CAPACITY {
            self.0 &= !(1 << key);
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }
}

impl BitOr for KeyMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}
impl BitAnd for KeyMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}
impl Not for KeyMask {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}
impl BitAndAssign for KeyMask {
    fn bitand_assign(&mut self, rhs: Self) {
        *self = *self & rhs;
    }
}
impl BitOrAssign for KeyMask {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_membership() {
        let mut mask = KeyMask::from_keys(&[0, 3, 63]);
        assert!(mask.contains(0));
        assert!(mask.contains(3));
        assert!(mask.contains(63));
        assert!(!mask.contains(1));
        assert_eq!(mask.len(), 3);

        mask.remove(3);
        assert!(!mask.contains(3));
        mask.insert(1);
        assert!(mask.contains(1));
    }

    #[test]
    fn test_out_of_range_keys_are_ignored() {
        let mask = KeyMask::EMPTY.with(64).with(200);
        assert!(mask.is_empty());
        assert!(!mask.contains(64));
    }

    #[test]
    fn test_mask_ops() {
        let a = KeyMask::from_keys(&[1, 2]);
        let b = KeyMask::from_keys(&[2, 5]);
        assert_eq!(a | b, KeyMask::from_keys(&[1, 2, 5]));
        assert_eq!(a & b, KeyMask::from_keys(&[2]));
        assert!(!(!a).contains(1));
        assert!((!a).contains(0));
    }
}
