use thiserror::Error;

/// Errors raised by the quiz engine.
///
/// `InvalidRange` is a user-input error and leaves the quiz untouched.
/// `NoActiveQuestion` means the caller asked about a question that is not
/// pending.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("Invalid submission: note must be between A0 and C8 (got {name} {octave})")]
    InvalidRange { name: String, octave: u8 },

    #[error("No question is currently active")]
    NoActiveQuestion,
}
