//! Signal sources feeding the analyser
//!
//! A source exposes the full time-domain sample sequence of the playing
//! clip, its total duration, and a monotonic clock shared with the analyser.

use std::cell::Cell;
use std::time::Instant;

/// Playback collaborator consumed by the analyser
///
/// The analyser holds a shared, non-exclusive handle to the source while
/// connected; the source itself is owned elsewhere.
pub trait SignalSource {
    /// Full time-domain sample sequence of the current clip
    fn samples(&self) -> &[f64];

    /// Total duration of the clip in seconds
    fn duration(&self) -> f64;

    /// Monotonic clock reading in seconds
    fn current_time(&self) -> f64;
}

/// In-memory clip with a restartable wall clock
///
/// Stands in for the platform's buffer-source node: owns its samples and
/// reports playback time relative to the last `start`.
pub struct BufferSource {
    samples: Vec<f64>,
    sample_rate: f64,
    started: Cell<Instant>,
}

impl BufferSource {
    /// Create a source from samples at the given rate (Hz, must be positive)
    pub fn new(samples: Vec<f64>, sample_rate: f64) -> Self {
        Self {
            samples,
            sample_rate,
            started: Cell::new(Instant::now()),
        }
    }

    /// Restart the playback clock
    pub fn start(&self) {
        self.started.set(Instant::now());
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}

impl SignalSource for BufferSource {
    fn samples(&self) -> &[f64] {
        &self.samples
    }

    fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate
    }

    fn current_time(&self) -> f64 {
        self.started.get().elapsed().as_secs_f64()
    }
}
