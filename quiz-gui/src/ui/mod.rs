//! # UI Module
//!
//! This module contains the panel layout for the note quiz.

pub mod main_display;
