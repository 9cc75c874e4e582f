//! # Quiz Engine Module
//!
//! Holds the pool of unasked keys, the active question and the running
//! score. The engine is driven by a front end: it starts a session, asks for
//! questions, checks and records answers, and reads the score back.
//!
//! ## Session lifecycle
//! `NotStarted -> InProgress -> Finished`. [`QuizEngine::start`] enters
//! `InProgress` from either end state; the session finishes once every key
//! has been asked and graded.

use crate::audio::NotePlayer;
use crate::config::QuizConfig;
use crate::error::QuizError;
use crate::event_log::{EventLog, EventSink};
use crate::note::{Note, PitchClass};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::SystemTime;

/// Where a quiz session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizPhase {
    #[default]
    NotStarted,
    InProgress,
    Finished,
}

/// The quiz engine.
///
/// `R` is the random source used to pick questions and `S` receives session
/// events. Both are injectable so sessions can be replayed in tests.
#[derive(Debug)]
pub struct QuizEngine<R = StdRng, S = EventLog> {
    /// Keys not yet asked. The current note stays here until the engine
    /// moves past it.
    remaining: Vec<Note>,
    current: Option<Note>,
    /// Whether a result was recorded for `current`.
    graded: bool,
    correct_count: u32,
    answered_count: u32,
    phase: QuizPhase,
    rng: R,
    events: S,
}

impl QuizEngine {
    /// Engine seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_parts(StdRng::from_entropy(), EventLog::new())
    }

    /// Engine with a fixed seed; the same seed yields the same question order.
    pub fn seeded(seed: u64) -> Self {
        Self::with_parts(StdRng::seed_from_u64(seed), EventLog::new())
    }

    pub fn from_config(config: &QuizConfig) -> Self {
        match config.seed {
            Some(seed) => {
                info!("Using fixed question seed {}", seed);
                Self::seeded(seed)
            }
            None => Self::new(),
        }
    }
}

impl Default for QuizEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> QuizEngine<R, EventLog> {
    pub fn with_rng(rng: R) -> Self {
        Self::with_parts(rng, EventLog::new())
    }
}

impl<R: Rng, S: EventSink> QuizEngine<R, S> {
    pub fn with_parts(rng: R, events: S) -> Self {
        Self {
            remaining: Vec::new(),
            current: None,
            graded: false,
            correct_count: 0,
            answered_count: 0,
            phase: QuizPhase::NotStarted,
            rng,
            events,
        }
    }

    /// Starts a fresh session with all 88 keys unasked and zeroed counts.
    ///
    /// Works from any phase; an unfinished session is discarded.
    pub fn start(&mut self) {
        if self.phase == QuizPhase::InProgress {
            warn!(
                "Restarting an unfinished quiz ({} of {} correct)",
                self.correct_count, self.answered_count
            );
        }
        self.remaining = Note::all().collect();
        self.current = None;
        self.graded = false;
        self.correct_count = 0;
        self.answered_count = 0;
        self.phase = QuizPhase::InProgress;
        self.record_event("Quiz started");
    }

    /// Moves to the next question.
    ///
    /// The current note, if any, is removed from the pool first. Returns the
    /// newly drawn note, or `None` once the pool is exhausted, at which point
    /// the session is finished. Outside an active session this does nothing.
    pub fn next_question(&mut self) -> Option<Note> {
        if self.phase != QuizPhase::InProgress {
            debug!("next_question ignored in phase {:?}", self.phase);
            return None;
        }

        if let Some(previous) = self.current.take() {
            if !self.graded {
                warn!("Moving past key {} without a recorded result", previous.key_number());
            }
            self.remaining.retain(|&note| note != previous);
        }
        self.graded = false;

        if self.remaining.is_empty() {
            self.phase = QuizPhase::Finished;
            let summary = format!(
                "Quiz finished: {} of {} correct",
                self.correct_count, self.answered_count
            );
            self.record_event(&summary);
            return None;
        }

        let index = self.rng.gen_range(0..self.remaining.len());
        let note = self.remaining[index];
        self.current = Some(note);
        debug!(
            "Issued key {} ({} keys left in pool)",
            note.key_number(),
            self.remaining.len()
        );
        let description = format!("Question issued: key {}", note.key_number());
        self.record_event(&description);
        Some(note)
    }

    /// The note being asked, or [`QuizError::NoActiveQuestion`].
    pub fn current_note(&self) -> Result<Note, QuizError> {
        self.current.ok_or(QuizError::NoActiveQuestion)
    }

    /// Checks a typed-in answer against the current note.
    ///
    /// `name` is parsed leniently ("C#", "db", "C#/Db"). A name that is not
    /// a pitch class, or a pair outside A0..=C8, is an
    /// [`QuizError::InvalidRange`]. Never changes the session.
    pub fn check_answer(&self, name: &str, octave: u8) -> Result<bool, QuizError> {
        let pitch = name
            .parse::<PitchClass>()
            .map_err(|_| QuizError::InvalidRange {
                name: name.to_string(),
                octave,
            })?;
        self.check_pitch(pitch, octave)
    }

    /// Same as [`check_answer`](Self::check_answer) for an already parsed
    /// pitch class.
    pub fn check_pitch(&self, name: PitchClass, octave: u8) -> Result<bool, QuizError> {
        let answer =
            Note::from_name_and_octave(name, octave).ok_or_else(|| QuizError::InvalidRange {
                name: name.to_string(),
                octave,
            })?;
        let current = self.current_note()?;
        Ok(answer == current)
    }

    /// Records the outcome for the current question.
    ///
    /// Only the first call per question counts; later calls are logged and
    /// ignored so the score can never exceed the answered count.
    pub fn record_result(&mut self, correct: bool) -> Result<(), QuizError> {
        let note = self.current_note()?;
        if self.graded {
            warn!("Result for key {} already recorded, ignoring", note.key_number());
            return Ok(());
        }
        self.graded = true;
        self.answered_count += 1;
        if correct {
            self.correct_count += 1;
        }
        let description = format!(
            "Answer for key {} recorded: {}",
            note.key_number(),
            if correct { "correct" } else { "incorrect" }
        );
        self.record_event(&description);
        Ok(())
    }

    /// Asks `player` to sound the current note.
    pub fn play_current(&mut self, player: &dyn NotePlayer) -> Result<Note, QuizError> {
        let note = self.current_note()?;
        player.play(note);
        self.record_event("Note played");
        Ok(note)
    }

    /// True once every key has been asked and the session has ended.
    pub fn is_finished(&self) -> bool {
        self.phase == QuizPhase::Finished
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.correct_count
    }

    pub fn answered(&self) -> u32 {
        self.answered_count
    }

    /// Number of keys still in the pool, including a pending current note.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Whether a result has been recorded for the current question.
    pub fn is_graded(&self) -> bool {
        self.graded
    }

    pub fn events(&self) -> &S {
        &self.events
    }

    fn record_event(&mut self, description: &str) {
        self.events.record(description, SystemTime::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_stays_in_pool_until_advanced() {
        let mut quiz = QuizEngine::seeded(7);
        quiz.start();
        assert_eq!(quiz.remaining(), 88);

        let first = quiz.next_question().unwrap();
        assert_eq!(quiz.remaining(), 88);
        assert!(quiz.remaining.contains(&first));

        quiz.record_result(true).unwrap();
        quiz.next_question();
        assert_eq!(quiz.remaining(), 87);
        assert!(!quiz.remaining.contains(&first));
    }

    #[test]
    fn graded_flag_resets_per_question() {
        let mut quiz = QuizEngine::seeded(1);
        quiz.start();
        quiz.next_question();
        assert!(!quiz.is_graded());
        quiz.record_result(false).unwrap();
        assert!(quiz.is_graded());
        quiz.next_question();
        assert!(!quiz.is_graded());
    }
}
