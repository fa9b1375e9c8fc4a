//! Classified key events.
//!
//! A [`KeyEvent`] is what the debounce state machine hands to an event sink: the kind of
//! transition and the index of the key it belongs to. [`EventCode`] packs the same
//! information into a single `u16` tag, with `0` reserved for "no event".

use bitfield_struct::bitfield;
use postcard::experimental::max_size::MaxSize;
use serde::{Deserialize, Serialize};
use strum::{EnumCount, FromRepr, IntoStaticStr};

/// Kind of a classified key event.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, MaxSize, EnumCount, FromRepr, IntoStaticStr,
)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum KeyEventKind {
    /// The key has just been recognized as pressed
    First = 1,
    /// The key has been held for the long press delay
    Long = 2,
    /// Auto-repeat while the key is held
    Repeat = 3,
    /// The key has been released
    Break = 4,
}

impl KeyEventKind {
    /// Static name of the kind, used in logs and displays
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// A classified event for one key.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, MaxSize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    /// Zero-based index of the key
    pub key: u8,
}

impl KeyEvent {
    pub const fn new(kind: KeyEventKind, key: u8) -> Self {
        Self { kind, key }
    }

    pub fn is_press(&self) -> bool {
        matches!(self.kind, KeyEventKind::First)
    }

    pub fn is_release(&self) -> bool {
        matches!(self.kind, KeyEventKind::Break)
    }
}

/// Packed form of a [`KeyEvent`].
///
/// Bits 0..8 hold the key index, bits 8..12 hold the [`KeyEventKind`] discriminant.
/// An all-zero code means "no event".
#[bitfield(u16, defmt = cfg(feature = "defmt"))]
#[derive(Eq, PartialEq, Serialize, Deserialize)]
pub struct EventCode {
    #[bits(8)]
    pub key: u8,
    #[bits(4)]
    pub kind: u8,
    #[bits(4)]
    _reserved: u8,
}

impl EventCode {
    /// The "no event" code
    pub const EMPTY: Self = Self::new();

    pub fn is_empty(&self) -> bool {
        self.into_bits() == 0
    }
}

impl From<KeyEvent> for EventCode {
    fn from(event: KeyEvent) -> Self {
        EventCode::new().with_key(event.key).with_kind(event.kind as u8)
    }
}

impl TryFrom<EventCode> for KeyEvent {
    type Error = EventCode;

    /// Fails for [`EventCode::EMPTY`] and for codes carrying an unknown kind
    fn try_from(code: EventCode) -> Result<Self, Self::Error> {
        KeyEventKind::from_repr(code.kind())
            .map(|kind| KeyEvent::new(kind, code.key()))
            .ok_or(code)
    }
}
