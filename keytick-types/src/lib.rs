//! # keytick types
//!
//! Type definitions shared between the keytick core and the code consuming its events.
//!
//! ## Modules
//!
//! - [`event`] - Classified key events and their packed integer form
//! - [`key_mask`] - Sets of key indices, used for modifier and trim keys
//!
//! The crate is `no_std` and has no runtime state; everything here is plain data.

#![no_std]

pub mod event;
pub mod key_mask;
