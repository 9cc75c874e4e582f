//! # Configuration Module
//!
//! Quiz settings loaded from a JSON file. Every field has a default, so a
//! partial file only overrides what it names.

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::time::Duration;

/// File the GUI looks for in its working directory.
pub const DEFAULT_CONFIG_PATH: &str = "quiz_config.json";

/// Upper bound on synthesized partials.
pub const MAX_PARTIALS: u32 = 16;

/// Longest note the synthesizer will render.
pub const MAX_NOTE_DURATION_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Fixed seed for question order. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Tuning reference in Hz.
    pub a4_frequency: f32,
    /// Peak output level (0.0 to 1.0).
    pub volume: f32,
    /// Length of a played note in milliseconds.
    pub note_duration_ms: u64,
    /// Number of partials in the synthesized tone.
    pub partials: u32,
    /// String stiffness coefficient B.
    pub inharmonicity: f32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            seed: None,
            a4_frequency: 440.0,
            volume: 0.25,
            note_duration_ms: 1500,
            partials: 6,
            inharmonicity: 0.0004,
        }
    }
}

impl QuizConfig {
    /// Reads and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: QuizConfig = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the config, falling back to defaults if the file is missing or
    /// unusable.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) if is_not_found(&e) => {
                log::info!("No config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{:#}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Writes the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json_string = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create config {}", path.display()))?;
        file.write_all(json_string.as_bytes())?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.a4_frequency.is_finite() && self.a4_frequency > 0.0,
            "a4_frequency must be positive, got {}",
            self.a4_frequency
        );
        ensure!(
            (0.0..=1.0).contains(&self.volume),
            "volume must be between 0 and 1, got {}",
            self.volume
        );
        ensure!(
            (1..=MAX_NOTE_DURATION_MS).contains(&self.note_duration_ms),
            "note_duration_ms must be between 1 and {}, got {}",
            MAX_NOTE_DURATION_MS,
            self.note_duration_ms
        );
        ensure!(
            (1..=MAX_PARTIALS).contains(&self.partials),
            "partials must be between 1 and {}, got {}",
            MAX_PARTIALS,
            self.partials
        );
        ensure!(
            self.inharmonicity.is_finite() && self.inharmonicity >= 0.0,
            "inharmonicity must not be negative, got {}",
            self.inharmonicity
        );
        Ok(())
    }

    /// Played note length, capped at [`MAX_NOTE_DURATION_MS`] for configs
    /// built in code without going through `validate`.
    pub fn note_duration(&self) -> Duration {
        Duration::from_millis(self.note_duration_ms.min(MAX_NOTE_DURATION_MS))
    }
}

fn is_not_found(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<std::io::Error>()
        .is_some_and(|e| e.kind() == ErrorKind::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(QuizConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let loud = QuizConfig {
            volume: 1.5,
            ..QuizConfig::default()
        };
        assert!(loud.validate().is_err());

        let no_partials = QuizConfig {
            partials: 0,
            ..QuizConfig::default()
        };
        assert!(no_partials.validate().is_err());

        let negative_b = QuizConfig {
            inharmonicity: -0.1,
            ..QuizConfig::default()
        };
        assert!(negative_b.validate().is_err());
    }

    #[test]
    fn rejects_overlong_notes() {
        let longest = QuizConfig {
            note_duration_ms: MAX_NOTE_DURATION_MS,
            ..QuizConfig::default()
        };
        assert!(longest.validate().is_ok());

        let too_long = QuizConfig {
            note_duration_ms: MAX_NOTE_DURATION_MS + 1,
            ..QuizConfig::default()
        };
        assert!(too_long.validate().is_err());

        let absurd = QuizConfig {
            note_duration_ms: u64::MAX / 1000,
            ..QuizConfig::default()
        };
        assert!(absurd.validate().is_err());
        assert_eq!(absurd.note_duration(), Duration::from_millis(MAX_NOTE_DURATION_MS));
    }
}
