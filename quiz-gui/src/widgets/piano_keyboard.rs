//! # Piano Keyboard Widget
//!
//! This module provides an interactive 88-key piano keyboard widget
//! for the note quiz. Clicking a key fills in the answer; after a
//! submission the graded key is highlighted.
//!
//! ## Features
//! - 88-key piano keyboard visualization
//! - Click-to-select answer entry
//! - Visual feedback for the last graded note (green correct, red wrong)

use iced::widget::canvas::{self, Event, Fill, Geometry, Path, Stroke, event};
use iced::widget::container;
use iced::{Color, Element, Point, Rectangle, Renderer, Size, Theme, mouse};
use quiz_core::Note;

/// Number of white keys on an 88-key piano.
const WHITE_KEY_COUNT: usize = 52;

/// Black keys are this fraction of a white key's width and height.
const BLACK_KEY_SCALE: f32 = 0.6;

const SELECTED_COLOR: Color = Color::from_rgb(1.0, 0.84, 0.0); // Gold
const CORRECT_COLOR: Color = Color::from_rgb(0.2, 0.86, 0.6); // Green
const WRONG_COLOR: Color = Color::from_rgb(1.0, 0.2, 0.2); // Red

/// Interactive piano keyboard for answer entry and feedback.
#[derive(Debug, Clone)]
pub struct PianoKeyboard {
    /// Key matching the answer currently picked by the user
    selected_key: Option<u8>,
    /// Last graded key and whether it was answered correctly
    graded: Option<(u8, bool)>,
}

impl PianoKeyboard {
    pub fn new(selected_key: Option<u8>, graded: Option<(u8, bool)>) -> Self {
        Self {
            selected_key,
            graded,
        }
    }

    pub fn view(self) -> Element<'static, crate::Message> {
        container(
            canvas::Canvas::new(self)
                .width(iced::Length::Fill)
                .height(iced::Length::Fixed(120.0)),
        )
        .into()
    }

    fn key_color(&self, key_number: u8, default: Color) -> Color {
        match self.graded {
            Some((graded_key, true)) if graded_key == key_number => CORRECT_COLOR,
            Some((graded_key, false)) if graded_key == key_number => WRONG_COLOR,
            _ if self.selected_key == Some(key_number) => SELECTED_COLOR,
            _ => default,
        }
    }

    /// Black keys paired with their left edge, in white-key widths.
    fn black_keys() -> impl Iterator<Item = (Note, f32)> {
        let mut white_keys_before = 0.0_f32;
        Note::all().filter_map(move |note| {
            if note.name().is_black() {
                // Centered on the boundary between the neighbouring white keys.
                Some((note, white_keys_before - BLACK_KEY_SCALE / 2.0))
            } else {
                white_keys_before += 1.0;
                None
            }
        })
    }

    fn white_keys() -> impl Iterator<Item = Note> {
        Note::all().filter(|note| !note.name().is_black())
    }

    fn key_from_pos(&self, bounds: Size, pos: Point) -> Option<u8> {
        let white_key_width = bounds.width / WHITE_KEY_COUNT as f32;
        let black_key_height = bounds.height * BLACK_KEY_SCALE;

        // Check black keys first (they are on top)
        for (note, left) in Self::black_keys() {
            let black_key_rect = Rectangle {
                x: left * white_key_width,
                y: 0.0,
                width: white_key_width * BLACK_KEY_SCALE,
                height: black_key_height,
            };
            if black_key_rect.contains(pos) {
                return Some(note.key_number());
            }
        }

        let clicked_white_key = (pos.x / white_key_width).floor() as usize;
        Self::white_keys()
            .nth(clicked_white_key)
            .map(Note::key_number)
    }
}

impl<Message> canvas::Program<Message> for PianoKeyboard
where
    Message: From<crate::Message>,
{
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (event::Status, Option<Message>) {
        if let Some(position) = cursor.position_in(bounds) {
            if let Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) = event {
                if let Some(key_number) = self.key_from_pos(bounds.size(), position) {
                    return (
                        event::Status::Captured,
                        Some(crate::Message::KeySelected(key_number).into()),
                    );
                }
            }
        }
        (event::Status::Ignored, None)
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let white_key_width = bounds.width / WHITE_KEY_COUNT as f32;
        let black_key_size = Size::new(
            white_key_width * BLACK_KEY_SCALE,
            bounds.height * BLACK_KEY_SCALE,
        );

        for (i, note) in Self::white_keys().enumerate() {
            let origin = Point::new(i as f32 * white_key_width, 0.0);
            let size = Size::new(white_key_width, bounds.height);
            let color = self.key_color(note.key_number(), Color::WHITE);

            frame.fill_rectangle(origin, size, Fill::from(color));
            frame.stroke(
                &Path::rectangle(origin, size),
                Stroke::default().with_color(Color::BLACK),
            );
        }

        for (note, left) in Self::black_keys() {
            let color = self.key_color(note.key_number(), Color::BLACK);
            frame.fill_rectangle(
                Point::new(left * white_key_width, 0.0),
                black_key_size,
                Fill::from(color),
            );
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_layout_counts() {
        assert_eq!(PianoKeyboard::white_keys().count(), WHITE_KEY_COUNT);
        assert_eq!(PianoKeyboard::black_keys().count(), 36);
    }

    #[test]
    fn clicks_map_to_keys() {
        let keyboard = PianoKeyboard::new(None, None);
        let bounds = Size::new(520.0, 120.0);

        // Bottom of the first white key is A0.
        assert_eq!(keyboard.key_from_pos(bounds, Point::new(5.0, 110.0)), Some(1));
        // Top of the boundary between A0 and B0 is A#0.
        assert_eq!(keyboard.key_from_pos(bounds, Point::new(10.0, 10.0)), Some(2));
        // Last white key is C8.
        assert_eq!(keyboard.key_from_pos(bounds, Point::new(515.0, 110.0)), Some(88));
    }

    #[test]
    fn graded_key_outranks_selection() {
        let keyboard = PianoKeyboard::new(Some(40), Some((40, false)));
        assert_eq!(keyboard.key_color(40, Color::WHITE), WRONG_COLOR);

        let keyboard = PianoKeyboard::new(Some(41), Some((40, true)));
        assert_eq!(keyboard.key_color(40, Color::WHITE), CORRECT_COLOR);
        assert_eq!(keyboard.key_color(41, Color::BLACK), SELECTED_COLOR);
        assert_eq!(keyboard.key_color(42, Color::WHITE), Color::WHITE);
    }
}
