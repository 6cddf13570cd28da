//! Analyser emulator: windowed transform, temporal smoothing, decibel scaling
//!
//! Reproduces the platform analyser's byte-frequency-data contract: on each
//! poll the current sample window is extracted at the playback position,
//! Blackman-windowed, transformed, magnitude-normalized, exponentially
//! smoothed against the previous poll, mapped to decibels, and quantized to
//! bytes.
//!
//! A single instance is not safe for concurrent use: every poll reads and
//! writes the smoothed-magnitude buffer in place. Source handles are `Rc`,
//! which keeps a connected emulator `!Send`.

use std::rc::Rc;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use super::source::SignalSource;
use super::Analyser;
use crate::spectrum::transform::TransformStrategy;
use crate::spectrum::windowing::blackman_inplace;

/// Smallest accepted transform size
pub const MIN_FFT_SIZE: usize = 32;
/// Largest accepted transform size
pub const MAX_FFT_SIZE: usize = 32768;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("fft size must be a power of two: 32, 64, 128, ... 32768 (got {0})")]
    FftSize(usize),

    #[error("smoothing time constant must be in [0, 1) (got {0})")]
    Smoothing(f64),

    #[error("min decibels must lie below max decibels (got min {min}, max {max})")]
    DecibelRange { min: f64, max: f64 },
}

/// Analyser configuration
///
/// Deserializable with per-field defaults so a UI or CLI layer can read it
/// straight from TOML/JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyserConfig {
    /// Transform size (power of two)
    pub fft_size: usize,

    /// Blend weight toward the previous smoothed value, in [0, 1)
    pub smoothing_time_constant: f64,

    /// Decibel value mapped to byte 0
    pub min_decibels: f64,

    /// Decibel value mapped to byte 255
    pub max_decibels: f64,

    /// Clear the smoothed spectrum when a new source is connected.
    /// The emulated platform carries smoothing across reconnects; off by
    /// default to match it.
    pub reset_on_connect: bool,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 512,
            smoothing_time_constant: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
            reset_on_connect: false,
        }
    }
}

impl AnalyserConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fft_size.is_power_of_two()
            || !(MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&self.fft_size)
        {
            return Err(ConfigError::FftSize(self.fft_size));
        }
        if !(0.0..1.0).contains(&self.smoothing_time_constant) {
            return Err(ConfigError::Smoothing(self.smoothing_time_constant));
        }
        // Non-finite bounds would poison the decibel clamp
        if !self.min_decibels.is_finite()
            || !self.max_decibels.is_finite()
            || self.min_decibels >= self.max_decibels
        {
            return Err(ConfigError::DecibelRange {
                min: self.min_decibels,
                max: self.max_decibels,
            });
        }
        Ok(())
    }
}

struct Connection {
    source: Rc<dyn SignalSource>,
    start_time: f64,
    duration: f64,
}

/// Stateful frequency-domain analyser
///
/// Owns the smoothed-magnitude buffer that carries state across polls;
/// independent instances never interfere, so one can run per transform
/// strategy side by side.
pub struct AnalyserEmulator {
    config: AnalyserConfig,
    transform: Box<dyn TransformStrategy>,
    /// Scratch window, length `fft_size`, zeroed at the start of every poll
    window: Vec<f64>,
    /// Smoothed magnitude per bin, length `fft_size / 2`, persisted across polls
    smoothed: Vec<f64>,
    connection: Option<Connection>,
}

impl AnalyserEmulator {
    /// Create an analyser with the default configuration
    pub fn new(transform: Box<dyn TransformStrategy>) -> Self {
        let config = AnalyserConfig::default();
        let window = vec![0.0; config.fft_size];
        let smoothed = vec![0.0; config.fft_size / 2];
        Self {
            config,
            transform,
            window,
            smoothed,
            connection: None,
        }
    }

    /// Create an analyser with a validated configuration
    pub fn with_config(
        transform: Box<dyn TransformStrategy>,
        config: AnalyserConfig,
    ) -> Result<Self, ConfigError> {
        let mut analyser = Self::new(transform);
        analyser.configure(config)?;
        Ok(analyser)
    }

    /// Replace the configuration
    ///
    /// On success the scratch window is reallocated and the smoothed
    /// spectrum reset to zeros. On failure the previous configuration and
    /// all state are left untouched.
    pub fn configure(&mut self, config: AnalyserConfig) -> Result<(), ConfigError> {
        config.validate()?;
        debug!(
            "reconfigure {}: fft_size {} -> {}",
            self.transform.name(),
            self.config.fft_size,
            config.fft_size
        );
        self.window = vec![0.0; config.fft_size];
        self.smoothed = vec![0.0; config.fft_size / 2];
        self.config = config;
        Ok(())
    }

    /// Set the transform size; reallocates and resets analysis state
    pub fn set_fft_size(&mut self, fft_size: usize) -> Result<(), ConfigError> {
        let mut config = self.config.clone();
        config.fft_size = fft_size;
        self.configure(config)
    }

    /// Set the smoothing time constant without resetting analysis state
    pub fn set_smoothing_time_constant(&mut self, smoothing: f64) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&smoothing) {
            return Err(ConfigError::Smoothing(smoothing));
        }
        self.config.smoothing_time_constant = smoothing;
        Ok(())
    }

    /// Set the decibel mapping range without resetting analysis state
    pub fn set_decibel_range(
        &mut self,
        min_decibels: f64,
        max_decibels: f64,
    ) -> Result<(), ConfigError> {
        if !min_decibels.is_finite() || !max_decibels.is_finite() || min_decibels >= max_decibels {
            return Err(ConfigError::DecibelRange {
                min: min_decibels,
                max: max_decibels,
            });
        }
        self.config.min_decibels = min_decibels;
        self.config.max_decibels = max_decibels;
        Ok(())
    }

    pub fn config(&self) -> &AnalyserConfig {
        &self.config
    }

    pub fn fft_size(&self) -> usize {
        self.config.fft_size
    }

    /// Number of frequency bins, half the transform size
    pub fn frequency_bin_count(&self) -> usize {
        self.config.fft_size / 2
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Attach a signal source and record the playback reference instant
    ///
    /// The smoothed spectrum is carried across reconnects unless
    /// `reset_on_connect` is set.
    pub fn connect(&mut self, source: Rc<dyn SignalSource>) {
        if self.config.reset_on_connect {
            self.smoothed.fill(0.0);
        }
        let start_time = source.current_time();
        let duration = source.duration();
        debug!(
            "connect {}: {} samples, {:.3}s",
            self.transform.name(),
            source.samples().len(),
            duration
        );
        self.connection = Some(Connection {
            source,
            start_time,
            duration,
        });
    }

    /// Detach the current source; subsequent polls are no-ops
    pub fn disconnect(&mut self) {
        debug!("disconnect {}", self.transform.name());
        self.connection = None;
    }

    /// Poll the current byte-quantized magnitude spectrum into `out`
    ///
    /// A no-op while disconnected. All `fft_size / 2` smoothed bins are
    /// updated each poll; bytes are written for the first
    /// `min(out.len(), fft_size / 2)` bins.
    pub fn get_byte_frequency_data(&mut self, out: &mut [u8]) {
        let (source, start_time, duration) = match &self.connection {
            Some(conn) => (Rc::clone(&conn.source), conn.start_time, conn.duration),
            None => return,
        };

        let data = source.samples();
        let elapsed = source.current_time() - start_time;
        let progress = if duration > 0.0 {
            (1.0 - (duration - elapsed) / duration).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let offset = (data.len() as f64 * progress).floor() as usize;
        let available = data.len().saturating_sub(offset).min(self.config.fft_size);

        self.window.fill(0.0);
        self.window[..available].copy_from_slice(&data[offset..offset + available]);
        blackman_inplace(&mut self.window);

        let spectrum = self.transform.transform(&self.window);

        let scale = 1.0 / self.config.fft_size as f64;
        let t = self.config.smoothing_time_constant;
        let min_db = self.config.min_decibels;
        let max_db = self.config.max_decibels;
        let db_span = max_db - min_db;

        for (k, slot) in self.smoothed.iter_mut().enumerate() {
            let normalized = spectrum[k].norm() * scale;
            let smoothed = lerp(normalized, *slot, t);
            *slot = smoothed;

            if let Some(byte) = out.get_mut(k) {
                // log10(0) is -inf and clamps to min_db
                let db = (20.0 * smoothed.log10()).clamp(min_db, max_db);
                *byte = (((db - min_db) / db_span) * 255.0).round() as u8;
            }
        }
    }
}

impl Analyser for AnalyserEmulator {
    fn frequency_bin_count(&self) -> usize {
        self.frequency_bin_count()
    }

    fn get_byte_frequency_data(&mut self, buffer: &mut [u8]) {
        self.get_byte_frequency_data(buffer);
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}
