//! Analyser Emu - Frequency-Domain Analyser Emulation Core
//!
//! Reproduces the byte-frequency-data contract of a platform audio analyser
//! node: windowed transform, temporal smoothing, and decibel scaling.

pub mod analyser;
pub mod spectrum;

pub use analyser::{Analyser, AnalyserConfig, AnalyserEmulator, ConfigError, SignalSource};
pub use spectrum::{DirectTransform, FastTransform, TransformStrategy};
