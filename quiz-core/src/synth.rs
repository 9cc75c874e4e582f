//! # Tone Synthesis Module
//!
//! Renders a short piano-like tone for a note. Each partial n sits at
//! `n * f0 * sqrt(1 + B * n^2)`, the stretched series of a stiff string,
//! and falls off as 1/n.

use crate::config::QuizConfig;
use crate::note::Note;
use std::f32::consts::TAU;

/// Length of the linear fade-in, in seconds.
const ATTACK_SECONDS: f32 = 0.005;
/// Length of the linear fade-out at the end of the buffer, in seconds.
const RELEASE_SECONDS: f32 = 0.02;
/// The envelope decays to about e^-4 by the end of the note.
const DECAY_OVER_DURATION: f32 = 4.0;

/// Frequency of partial `number` (1 = fundamental) for inharmonicity `b`.
pub fn partial_frequency(fundamental: f32, number: u32, b: f32) -> f32 {
    let n = number as f32;
    n * fundamental * (1.0 + b * n * n).sqrt()
}

/// Renders a mono tone for `note` at `sample_rate`.
///
/// Partials at or above the Nyquist frequency are skipped. The result is
/// normalised so its peak equals `config.volume`. The length never exceeds
/// `MAX_NOTE_DURATION_MS`, whatever the config holds.
pub fn render_tone(note: Note, config: &QuizConfig, sample_rate: u32) -> Vec<f32> {
    let rate = sample_rate as f32;
    let len = (u128::from(sample_rate) * config.note_duration().as_millis() / 1000) as usize;
    if len == 0 {
        return Vec::new();
    }

    let fundamental = note.frequency(config.a4_frequency);
    let nyquist = rate / 2.0;
    let partials: Vec<(f32, f32)> = (1..=config.partials)
        .map(|n| {
            (
                partial_frequency(fundamental, n, config.inharmonicity),
                1.0 / n as f32,
            )
        })
        .filter(|&(freq, _)| freq < nyquist)
        .collect();

    let duration = len as f32 / rate;
    let decay_rate = DECAY_OVER_DURATION / duration;
    let attack_len = (ATTACK_SECONDS * rate) as usize;
    let release_len = ((RELEASE_SECONDS * rate) as usize).min(len);

    let mut samples: Vec<f32> = (0..len)
        .map(|i| {
            let t = i as f32 / rate;
            let tone: f32 = partials
                .iter()
                .map(|&(freq, amp)| amp * (TAU * freq * t).sin())
                .sum();

            let mut envelope = (-decay_rate * t).exp();
            if i < attack_len {
                envelope *= i as f32 / attack_len as f32;
            }
            let from_end = len - i;
            if from_end < release_len {
                envelope *= from_end as f32 / release_len as f32;
            }
            tone * envelope
        })
        .collect();

    let peak = samples.iter().fold(0.0_f32, |max, s| max.max(s.abs()));
    if peak > 0.0 {
        let gain = config.volume / peak;
        for sample in samples.iter_mut() {
            *sample *= gain;
        }
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(key: u8) -> Note {
        Note::from_key_number(key).unwrap()
    }

    #[test]
    fn length_follows_duration() {
        let config = QuizConfig {
            note_duration_ms: 500,
            ..QuizConfig::default()
        };
        assert_eq!(render_tone(note(49), &config, 48_000).len(), 24_000);
    }

    #[test]
    fn huge_duration_is_capped() {
        let config = QuizConfig {
            note_duration_ms: u64::MAX / 1000,
            partials: 1,
            ..QuizConfig::default()
        };
        let tone = render_tone(note(49), &config, 8_000);
        assert_eq!(tone.len(), 80_000);
    }

    #[test]
    fn peak_matches_volume() {
        let config = QuizConfig::default();
        let tone = render_tone(note(40), &config, 44_100);
        let peak = tone.iter().fold(0.0_f32, |max, s| max.max(s.abs()));
        assert!((peak - config.volume).abs() < 1e-4);
    }

    #[test]
    fn starts_and_ends_silent() {
        let tone = render_tone(note(1), &QuizConfig::default(), 44_100);
        assert_eq!(tone[0], 0.0);
        assert!(tone.last().unwrap().abs() < 1e-3);
    }

    #[test]
    fn stiff_string_stretches_partials() {
        assert_eq!(partial_frequency(100.0, 3, 0.0), 300.0);
        assert!(partial_frequency(100.0, 3, 0.001) > 300.0);
    }

    #[test]
    fn top_key_renders_below_nyquist() {
        let config = QuizConfig {
            partials: 16,
            ..QuizConfig::default()
        };
        let tone = render_tone(note(88), &config, 8_000);
        assert!(tone.iter().all(|s| s.is_finite()));
    }
}
