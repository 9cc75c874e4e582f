//! # Widgets Module
//!
//! Custom canvas widgets used by the UI panels.

pub mod piano_keyboard;
