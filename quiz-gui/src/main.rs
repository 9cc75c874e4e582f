//! # MIDI Note Quiz - Piano Note Identification GUI
//!
//! This module contains the main GUI application for the note quiz.
//! It lets the user start a quiz, hear the current note, enter a note name
//! and octave (or click a key), and follow their score.
//!
//! ## Architecture
//! - **Main Thread**: Iced GUI application with dark theme
//! - **Audio Thread**: Owned by `ToneOutput` in the core crate
//! - **State**: The quiz phase decides which panels are rendered

mod ui;
mod widgets;

use iced::{Element, Subscription, Task, Theme, window};
use log::{error, info, warn};
use quiz_core::config::DEFAULT_CONFIG_PATH;
use quiz_core::{
    Note, NotePlayer, PitchClass, QuizConfig, QuizEngine, QuizError, QuizPhase, SilentPlayer,
    ToneOutput,
};
use std::io::{self, Write};
use ui::main_display::create_main_view;

const INVALID_SUBMISSION: &str = "Invalid submission: note must be between A0 and C8.";
const CONFIRM_EXIT: &str = "Are you sure you want to end the quiz and exit?";

/// Main entry point for the note quiz.
pub fn main() -> iced::Result {
    init_logging();
    info!("Starting MIDI Note Quiz...");
    let result = iced::application("MIDI Note Quiz", QuizApp::update, QuizApp::view)
        .theme(QuizApp::theme)
        .subscription(QuizApp::subscription)
        .exit_on_close_request(false)
        .window_size((900.0, 480.0))
        .run();
    info!("Application finished with result: {:?}", result);
    result
}

/// Logs at info level unless `RUST_LOG` says otherwise.
fn init_logging() {
    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(filters) => builder.parse_filters(&filters),
        Err(_) => builder.filter_level(log::LevelFilter::Info),
    };
    builder.init();
}

/// Application message types for the Iced GUI framework.
#[derive(Debug, Clone)]
pub enum Message {
    StartQuiz,
    PlayNote,
    NameSelected(PitchClass),
    OctaveSelected(u8),
    KeySelected(u8), // Key number (1-88) clicked on the keyboard
    SubmitAnswer,
    ExitRequested,
    ExitConfirmed,
    ExitCancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackKind {
    Info,
    Correct,
    Incorrect,
    Error,
}

/// Message shown under the quiz after an action.
#[derive(Debug, Clone)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub text: String,
}

impl Feedback {
    fn new(kind: FeedbackKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// UI-specific data needed for rendering the interface.
///
/// This struct contains only the data that the UI components need
#[derive(Debug, Clone, Default)]
pub struct AppDisplayData {
    pub phase: QuizPhase,
    pub score: u32,
    pub answered: u32,
    pub remaining: usize,

    // Answer being composed
    pub selected_name: Option<PitchClass>,
    pub selected_octave: Option<u8>,

    pub last_graded: Option<(Note, bool)>,
    pub feedback: Option<Feedback>,
    pub confirm_exit: bool,
    pub audio_available: bool,
}

/// Main application state for the note quiz.
struct QuizApp {
    engine: QuizEngine,
    player: Box<dyn NotePlayer>,

    // Single source of truth for all display data
    display_data: AppDisplayData,
}

impl Default for QuizApp {
    /// Loads the config, builds the engine and opens the audio output.
    ///
    /// A missing audio device is not fatal; the quiz runs without sound.
    fn default() -> Self {
        let config = QuizConfig::load_or_default(DEFAULT_CONFIG_PATH);
        let engine = QuizEngine::from_config(&config);

        let (player, audio_available): (Box<dyn NotePlayer>, bool) =
            match ToneOutput::start(config) {
                Ok(output) => (Box::new(output), true),
                Err(e) => {
                    error!("Audio output unavailable, continuing without sound: {:#}", e);
                    (Box::new(SilentPlayer), false)
                }
            };

        let mut app = Self {
            engine,
            player,
            display_data: AppDisplayData {
                audio_available,
                ..AppDisplayData::default()
            },
        };
        app.refresh_display();
        app
    }
}

impl QuizApp {
    /// Handles application state updates based on incoming messages.
    fn update(&mut self, message: Message) -> Task<Message> {
        log::debug!("Received message: {:?}", message);

        // Any other action dismisses a pending exit question.
        if !matches!(message, Message::ExitRequested | Message::ExitConfirmed) {
            self.display_data.confirm_exit = false;
        }

        match message {
            Message::StartQuiz => self.start_quiz(),
            Message::PlayNote => {
                if let Err(e) = self.engine.play_current(self.player.as_ref()) {
                    self.report_contract_violation(e);
                }
            }
            Message::NameSelected(name) => self.display_data.selected_name = Some(name),
            Message::OctaveSelected(octave) => self.display_data.selected_octave = Some(octave),
            Message::KeySelected(key_number) => {
                if let Some(note) = Note::from_key_number(key_number) {
                    self.display_data.selected_name = Some(note.name());
                    self.display_data.selected_octave = Some(note.octave());
                }
            }
            Message::SubmitAnswer => self.submit_answer(),
            Message::ExitRequested => {
                self.display_data.confirm_exit = true;
                self.display_data.feedback = Some(Feedback::new(FeedbackKind::Info, CONFIRM_EXIT));
            }
            Message::ExitCancelled => self.display_data.feedback = None,
            Message::ExitConfirmed => {
                info!("Exiting, printing event log");
                if let Err(e) = self.write_event_log(&mut io::stdout().lock()) {
                    error!("Failed to print event log: {}", e);
                }
                return iced::exit();
            }
        }

        self.refresh_display();
        Task::none()
    }

    fn start_quiz(&mut self) {
        if self.engine.phase() == QuizPhase::InProgress {
            self.display_data.feedback =
                Some(Feedback::new(FeedbackKind::Error, "Quiz already started."));
            return;
        }

        self.engine.start();
        self.engine.next_question();
        self.display_data.selected_name = None;
        self.display_data.selected_octave = None;
        self.display_data.last_graded = None;
        self.display_data.feedback = Some(Feedback::new(
            FeedbackKind::Info,
            "You have successfully started the quiz.",
        ));
    }

    /// Grades the composed answer, records it and moves on.
    fn submit_answer(&mut self) {
        let (Some(name), Some(octave)) =
            (self.display_data.selected_name, self.display_data.selected_octave)
        else {
            self.display_data.feedback = Some(Feedback::new(
                FeedbackKind::Error,
                "Pick a note name and an octave first.",
            ));
            return;
        };

        let correct = match self.engine.check_pitch(name, octave) {
            Ok(correct) => correct,
            Err(e @ QuizError::InvalidRange { .. }) => {
                warn!("{}", e);
                self.display_data.feedback =
                    Some(Feedback::new(FeedbackKind::Error, INVALID_SUBMISSION));
                return;
            }
            Err(e) => return self.report_contract_violation(e),
        };

        let answer = match self.engine.current_note() {
            Ok(note) => note,
            Err(e) => return self.report_contract_violation(e),
        };
        if let Err(e) = self.engine.record_result(correct) {
            return self.report_contract_violation(e);
        }
        self.engine.next_question();

        let next_step = if self.engine.is_finished() {
            "The quiz is now complete."
        } else {
            "Moving on to the next question..."
        };
        self.display_data.feedback = Some(if correct {
            Feedback::new(FeedbackKind::Correct, format!("Correct! {}", next_step))
        } else {
            Feedback::new(
                FeedbackKind::Incorrect,
                format!(
                    "Incorrect! The correct answer was {} {}. {}",
                    answer.name(),
                    answer.octave(),
                    next_step
                ),
            )
        });
        self.display_data.last_graded = Some((answer, correct));
    }

    /// Surfaces an engine contract violation instead of crashing the UI.
    fn report_contract_violation(&mut self, e: QuizError) {
        error!("Quiz engine rejected request: {}", e);
        self.display_data.feedback = Some(Feedback::new(FeedbackKind::Error, e.to_string()));
    }

    /// Writes every recorded session event, one per paragraph.
    fn write_event_log(&self, out: &mut impl Write) -> io::Result<()> {
        for event in self.engine.events() {
            writeln!(out, "\n{}", event)?;
        }
        out.flush()
    }

    /// Copies engine state into the display data.
    fn refresh_display(&mut self) {
        self.display_data.phase = self.engine.phase();
        self.display_data.score = self.engine.score();
        self.display_data.answered = self.engine.answered();
        self.display_data.remaining = self.engine.remaining();
    }

    /// Renders the main application interface.
    ///
    /// Delegates all UI rendering to the main_display module.
    fn view(&self) -> Element<'_, Message> {
        create_main_view(&self.display_data)
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Closing the window goes through the same exit path as the button,
    /// minus the question.
    fn subscription(&self) -> Subscription<Message> {
        window::close_requests().map(|_| Message::ExitConfirmed)
    }
}
