//! # Main Display Module
//!
//! This module contains the main display components and layout logic
//! for the note quiz. What is shown depends only on the quiz phase held
//! in [`crate::AppDisplayData`].

use iced::widget::{Space, button, column, container, pick_list, row, text};
use iced::{Alignment, Color, Element, Length};
use quiz_core::{Note, PitchClass, QuizPhase};

use crate::widgets::piano_keyboard;
use crate::{AppDisplayData, FeedbackKind, Message};

/// Choices for the note name picker.
static PITCH_CLASSES: [PitchClass; 12] = PitchClass::ALL;

/// Choices for the octave picker.
static OCTAVES: [u8; 9] = [0, 1, 2, 3, 4, 5, 6, 7, 8];

/// Configuration for a single button in the home sidebar
#[derive(Debug, Clone)]
struct ButtonConfig {
    label: &'static str,
    message: Message,
    button_type: ButtonType,
}

/// Different types of buttons with their styling requirements
#[derive(Debug, Clone, PartialEq)]
enum ButtonType {
    /// Standard button with no special styling
    Standard,
    /// Only clickable while no quiz is running
    StartQuiz,
}

const HOME_BUTTONS: &[ButtonConfig] = &[
    ButtonConfig { label: "Start Quiz", message: Message::StartQuiz, button_type: ButtonType::StartQuiz },
    ButtonConfig { label: "End Quiz and Exit", message: Message::ExitRequested, button_type: ButtonType::Standard },
];

/// Creates the complete main application view
pub fn create_main_view(data: &AppDisplayData) -> Element<'static, Message> {
    log::trace!("Rendering view in phase {:?}", data.phase);

    let title = text("MIDI Note Quiz").size(28);

    let body: Element<'static, Message> = match data.phase {
        QuizPhase::NotStarted => container(text("Press Start Quiz to begin.").size(18))
            .padding(15)
            .into(),
        QuizPhase::InProgress => column![
            row![create_quiz_panel(data), Space::with_width(10), create_score_panel(data)]
                .align_y(Alignment::Start),
            create_keyboard_panel(data),
        ]
        .spacing(10)
        .into(),
        QuizPhase::Finished => column![
            row![create_summary_panel(data), Space::with_width(10), create_score_panel(data)]
                .align_y(Alignment::Start),
            create_keyboard_panel(data),
        ]
        .spacing(10)
        .into(),
    };

    let main_content = row![
        column![
            title,
            Space::with_height(20),
            body,
            Space::with_height(10),
            create_feedback_line(data),
        ]
        .width(Length::Fill)
        .spacing(10),
        Space::with_width(10),
        create_sidebar(data.phase),
    ]
    .align_y(Alignment::Start)
    .padding(20);

    container(main_content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Creates the answer entry panel: play button, pickers and submit.
fn create_quiz_panel(data: &AppDisplayData) -> Element<'static, Message> {
    let play_button = if data.audio_available {
        button(text("Play Note").size(14)).on_press(Message::PlayNote)
    } else {
        button(text("Play Note (no audio)").size(14))
    };

    let name_picker = pick_list(&PITCH_CLASSES[..], data.selected_name, Message::NameSelected)
        .placeholder("Note")
        .width(Length::Fixed(110.0));
    let octave_picker = pick_list(&OCTAVES[..], data.selected_octave, Message::OctaveSelected)
        .placeholder("Octave")
        .width(Length::Fixed(90.0));

    let submit_button = button(text("Submit Answer").size(14)).on_press(Message::SubmitAnswer);

    let controls = row![play_button, name_picker, octave_picker, submit_button]
        .spacing(10)
        .align_y(Alignment::Center);

    container(
        column![text("Quiz").size(18), Space::with_height(10), controls]
            .spacing(5)
            .padding(15),
    )
    .width(Length::Fill)
    .into()
}

/// Creates the end-of-quiz summary panel
fn create_summary_panel(data: &AppDisplayData) -> Element<'static, Message> {
    container(
        column![
            text("Quiz complete!").size(18),
            Space::with_height(10),
            text(format!(
                "You scored {} out of {}.",
                data.score, data.answered
            ))
            .size(16),
        ]
        .spacing(5)
        .padding(15),
    )
    .width(Length::Fill)
    .into()
}

/// Creates the score panel
fn create_score_panel(data: &AppDisplayData) -> Element<'static, Message> {
    container(
        column![
            text("Score").size(18),
            Space::with_height(10),
            text(format!("Total correct: {}", data.score)).size(14),
            text(format!("Total answered: {}", data.answered)).size(14),
            text(format!("Keys left: {}", data.remaining)).size(14),
        ]
        .spacing(5)
        .padding(15),
    )
    .width(Length::Fixed(180.0))
    .into()
}

/// Creates the piano keyboard panel
fn create_keyboard_panel(data: &AppDisplayData) -> Element<'static, Message> {
    let selected_key = data
        .selected_name
        .zip(data.selected_octave)
        .and_then(|(name, octave)| Note::from_name_and_octave(name, octave))
        .map(Note::key_number);
    let graded = data
        .last_graded
        .map(|(note, correct)| (note.key_number(), correct));

    let keyboard = piano_keyboard::PianoKeyboard::new(selected_key, graded);

    container(
        column![
            text("Keyboard").size(18),
            Space::with_height(10),
            keyboard.view()
        ]
        .spacing(5)
        .padding(15),
    )
    .width(Length::Fill)
    .height(Length::Fixed(200.0))
    .into()
}

/// Creates the line that replaces the old message dialogs. While an exit
/// is pending it carries the Yes/No answer buttons.
fn create_feedback_line(data: &AppDisplayData) -> Element<'static, Message> {
    let Some(feedback) = &data.feedback else {
        return Space::with_height(20).into();
    };

    let color = match feedback.kind {
        FeedbackKind::Info => Color::WHITE,
        FeedbackKind::Correct => Color::from_rgb(0.2, 0.8, 0.2),
        FeedbackKind::Incorrect => Color::from_rgb(1.0, 0.65, 0.0),
        FeedbackKind::Error => Color::from_rgb(1.0, 0.3, 0.3),
    };

    let line = text(feedback.text.clone()).size(16).color(color);
    if !data.confirm_exit {
        return line.into();
    }

    row![
        line,
        button(text("Yes").size(14)).on_press(Message::ExitConfirmed),
        button(text("No").size(14)).on_press(Message::ExitCancelled),
    ]
    .spacing(10)
    .align_y(Alignment::Center)
    .into()
}

/// Creates the home sidebar with the start and exit buttons.
fn create_sidebar(phase: QuizPhase) -> Element<'static, Message> {
    let quiz_running = phase == QuizPhase::InProgress;

    let buttons = HOME_BUTTONS.iter().fold(column![].spacing(8), |col, config| {
        col.push(make_button(config, quiz_running))
    });

    container(
        column![text("Home").size(18), Space::with_height(10), buttons]
            .spacing(5)
            .padding(15),
    )
    .width(Length::Fixed(200.0))
    .height(Length::Fill)
    .into()
}

/// Creates a button based on configuration and application state.
///
/// The start button is grayed out and inert while a quiz is running.
fn make_button(config: &ButtonConfig, quiz_running: bool) -> Element<'static, Message> {
    let button = button(text(config.label).size(14).width(Length::Fill)).padding([6, 10]);

    if config.button_type == ButtonType::StartQuiz && quiz_running {
        return button
            .style(|_theme, _status| {
                use iced::widget::button;
                button::Style {
                    background: Some(iced::Background::Color(Color::from_rgb(0.3, 0.3, 0.3))),
                    text_color: Color::from_rgb(0.6, 0.6, 0.6),
                    ..button::Style::default()
                }
            })
            .into();
    }

    button.on_press(config.message.clone()).into()
}
