// quiz-core/src/lib.rs

//! The core logic for the piano note quiz.
//! This crate is responsible for the quiz engine, the note model, tone
//! synthesis and audio playback. It is completely headless
//! and contains no GUI code.

pub mod audio;
pub mod config;
pub mod error;
pub mod event_log;
pub mod note;
pub mod quiz;
pub mod synth;

pub use audio::{NotePlayer, SilentPlayer, ToneOutput};
pub use config::QuizConfig;
pub use error::QuizError;
pub use event_log::{Event, EventLog, EventSink};
pub use note::{Note, PitchClass};
pub use quiz::{QuizEngine, QuizPhase};
