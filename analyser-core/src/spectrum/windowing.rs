//! Blackman window applied to a sample window before transform
//!
//! Tapers the rectangular truncation of the sample window to suppress
//! spectral leakage. Periodic form (2π/n), matching the emulated platform.

use std::f64::consts::PI;

const ALPHA: f64 = 0.16;

/// Apply the Blackman window in place
///
/// Multiplies `buffer[i]` by `a0 - a1·cos(2π·i/n) + a2·cos(4π·i/n)` with
/// a0 = (1−α)/2, a1 = 0.5, a2 = α/2. Allocation-free.
pub fn blackman_inplace(buffer: &mut [f64]) {
    let a0 = (1.0 - ALPHA) / 2.0;
    let a1 = 0.5;
    let a2 = ALPHA / 2.0;
    let coeff = 2.0 * PI / buffer.len() as f64;

    for (i, sample) in buffer.iter_mut().enumerate() {
        let w = a0 - a1 * (coeff * i as f64).cos() + a2 * (2.0 * coeff * i as f64).cos();
        *sample *= w;
    }
}
