//! # Audio Playback Module
//!
//! This module plays quiz notes through CPAL (Cross-Platform Audio Library).
//! The output stream lives on a dedicated thread; tones are rendered by the
//! caller and handed over through a crossbeam channel.
//!
//! ## Features
//! - [`NotePlayer`] trait the quiz engine calls into
//! - Default output device selection with f32 samples
//! - Newest tone replaces whatever is still sounding
//! - [`SilentPlayer`] fallback when no device is available

use crate::config::QuizConfig;
use crate::note::Note;
use crate::synth;
use anyhow::{Result, anyhow};
use cpal::SupportedStreamConfigRange;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use log::{debug, error, info, warn};
use std::thread::{self, JoinHandle};

/// Preferred output sample rate.
pub const TARGET_SAMPLE_RATE: u32 = 44100;

/// How many rendered tones may wait for the audio callback.
const TONE_QUEUE_DEPTH: usize = 4;

/// Something that can sound a note. Fire-and-forget.
pub trait NotePlayer {
    fn play(&self, note: Note);
}

/// Player that only logs. Used when no audio device is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPlayer;

impl NotePlayer for SilentPlayer {
    fn play(&self, note: Note) {
        debug!("Silent playback of key {}", note.key_number());
    }
}

/// Samples of the tone currently being played by the output callback.
#[derive(Debug, Default)]
pub struct Voice {
    samples: Vec<f32>,
    position: usize,
}

impl Voice {
    /// Replaces the current tone and restarts from its first sample.
    pub fn start(&mut self, samples: Vec<f32>) {
        self.samples = samples;
        self.position = 0;
    }

    /// Next sample, or silence once the tone has run out.
    pub fn next_sample(&mut self) -> f32 {
        match self.samples.get(self.position) {
            Some(&sample) => {
                self.position += 1;
                sample
            }
            None => 0.0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.position < self.samples.len()
    }
}

/// Audio output running on its own thread.
///
/// Dropping the handle stops the stream and joins the thread.
#[derive(Debug)]
pub struct ToneOutput {
    tone_tx: Sender<Vec<f32>>,
    shutdown_tx: Sender<()>,
    thread_handle: Option<JoinHandle<()>>,
    sample_rate: u32,
    config: QuizConfig,
}

impl ToneOutput {
    /// Opens the default output device and starts the audio thread.
    ///
    /// Blocks until the thread reports that the stream is playing, so a
    /// missing or unusable device is reported here rather than on the first
    /// `play`.
    pub fn start(config: QuizConfig) -> Result<Self> {
        let (tone_tx, tone_rx) = crossbeam_channel::bounded::<Vec<f32>>(TONE_QUEUE_DEPTH);
        let (ready_tx, ready_rx) = crossbeam_channel::bounded::<Result<u32, String>>(1);
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded::<()>(1);

        let thread_handle = thread::Builder::new()
            .name("tone-output".to_string())
            .spawn(move || {
                debug!("Audio thread starting");
                let (stream, sample_rate) = match start_output_stream(tone_rx) {
                    Ok(tuple) => tuple,
                    Err(e) => {
                        let _ = ready_tx.send(Err(format!("{:#}", e)));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(sample_rate));

                // Either an explicit shutdown or the handle being dropped ends the wait.
                let _ = shutdown_rx.recv();

                debug!("Audio thread stopping stream");
                if let Err(e) = stream.pause() {
                    warn!("Error pausing output stream: {}", e);
                }
                drop(stream);
                debug!("Audio thread finished");
            })?;

        let sample_rate = ready_rx
            .recv()
            .map_err(|_| anyhow!("Audio thread exited before opening a stream"))?
            .map_err(|e| anyhow!(e))?;

        info!("Audio output ready at {} Hz", sample_rate);
        Ok(Self {
            tone_tx,
            shutdown_tx,
            thread_handle: Some(thread_handle),
            sample_rate,
            config,
        })
    }

    /// Stops the stream and waits for the audio thread to exit.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.thread_handle.take() {
            let _ = self.shutdown_tx.try_send(());
            if handle.join().is_err() {
                error!("Audio thread panicked");
            }
        }
    }
}

impl NotePlayer for ToneOutput {
    fn play(&self, note: Note) {
        let tone = synth::render_tone(note, &self.config, self.sample_rate);
        match self.tone_tx.try_send(tone) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => warn!("Tone queue full, dropping playback request"),
            Err(TrySendError::Disconnected(_)) => error!("Audio thread is gone"),
        }
    }
}

impl Drop for ToneOutput {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Builds and starts an output stream on the default device.
///
/// The callback drains `tone_rx`, keeping only the newest tone, and writes
/// the same sample to every channel of each frame.
fn start_output_stream(tone_rx: Receiver<Vec<f32>>) -> Result<(cpal::Stream, u32)> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow!("No output device available"))?;

    info!("Using audio output device: {}", device.name()?);

    let configs = device.supported_output_configs()?.collect::<Vec<_>>();
    let supported_config = find_supported_config(configs, TARGET_SAMPLE_RATE)
        .ok_or_else(|| anyhow!("No suitable f32 output format found"))?;

    let sample_rate = TARGET_SAMPLE_RATE.clamp(
        supported_config.min_sample_rate().0,
        supported_config.max_sample_rate().0,
    );
    let config: cpal::StreamConfig = supported_config
        .with_sample_rate(cpal::SampleRate(sample_rate))
        .into();
    let channels = config.channels as usize;

    debug!("Selected {} channel(s) at {} Hz", channels, sample_rate);

    let err_fn = |err| error!("An error occurred on the output stream: {}", err);

    let mut voice = Voice::default();
    let stream = device.build_output_stream(
        &config,
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            while let Ok(tone) = tone_rx.try_recv() {
                voice.start(tone);
            }
            for frame in data.chunks_mut(channels) {
                let sample = voice.next_sample();
                frame.fill(sample);
            }
        },
        err_fn,
        None,
    )?;

    stream.play()?;

    Ok((stream, sample_rate))
}

/// Finds the f32 output configuration closest to the target sample rate,
/// preferring fewer channels.
fn find_supported_config(
    configs: Vec<SupportedStreamConfigRange>,
    target_rate: u32,
) -> Option<SupportedStreamConfigRange> {
    configs
        .into_iter()
        .filter(|c| c.sample_format() == cpal::SampleFormat::F32)
        .min_by_key(|c| {
            let min = c.min_sample_rate().0;
            let max = c.max_sample_rate().0;
            let rate_diff = if (min..=max).contains(&target_rate) {
                0
            } else {
                (min as i64 - target_rate as i64)
                    .abs()
                    .min((max as i64 - target_rate as i64).abs())
            };
            (rate_diff, c.channels())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_plays_then_falls_silent() {
        let mut voice = Voice::default();
        assert!(!voice.is_playing());
        assert_eq!(voice.next_sample(), 0.0);

        voice.start(vec![0.5, -0.5]);
        assert!(voice.is_playing());
        assert_eq!(voice.next_sample(), 0.5);
        assert_eq!(voice.next_sample(), -0.5);
        assert_eq!(voice.next_sample(), 0.0);
        assert!(!voice.is_playing());
    }

    #[test]
    fn new_tone_restarts_voice() {
        let mut voice = Voice::default();
        voice.start(vec![0.1, 0.2, 0.3]);
        voice.next_sample();
        voice.start(vec![0.9]);
        assert_eq!(voice.next_sample(), 0.9);
    }

    fn config_range(
        channels: u16,
        min_rate: u32,
        max_rate: u32,
        format: cpal::SampleFormat,
    ) -> SupportedStreamConfigRange {
        SupportedStreamConfigRange::new(
            channels,
            cpal::SampleRate(min_rate),
            cpal::SampleRate(max_rate),
            cpal::SupportedBufferSize::Unknown,
            format,
        )
    }

    #[test]
    fn picks_f32_config_covering_target_with_fewest_channels() {
        let configs = vec![
            config_range(1, 44100, 44100, cpal::SampleFormat::I16),
            config_range(2, 44100, 48000, cpal::SampleFormat::F32),
            config_range(1, 8000, 8000, cpal::SampleFormat::F32),
            config_range(1, 22050, 96000, cpal::SampleFormat::F32),
        ];

        let chosen = find_supported_config(configs, TARGET_SAMPLE_RATE).unwrap();
        assert_eq!(chosen.sample_format(), cpal::SampleFormat::F32);
        assert_eq!(chosen.channels(), 1);
        assert_eq!(chosen.min_sample_rate().0, 22050);
    }

    #[test]
    fn falls_back_to_closest_rate() {
        let configs = vec![
            config_range(1, 96000, 96000, cpal::SampleFormat::F32),
            config_range(2, 48000, 48000, cpal::SampleFormat::F32),
        ];

        let chosen = find_supported_config(configs, TARGET_SAMPLE_RATE).unwrap();
        assert_eq!(chosen.min_sample_rate().0, 48000);
        assert_eq!(chosen.channels(), 2);
    }

    #[test]
    fn no_f32_config_is_none() {
        let configs = vec![config_range(2, 44100, 44100, cpal::SampleFormat::I16)];
        assert!(find_supported_config(configs, TARGET_SAMPLE_RATE).is_none());
    }
}
