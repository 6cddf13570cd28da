//! Discrete Fourier transforms over real-valued sample windows
//!
//! Two interchangeable strategies: a direct quadratic-time transform and a
//! recursive fast transform. Both produce the full complex spectrum (same
//! length as the input); for real input only the first half is non-mirrored.

use std::f64::consts::PI;

use super::complex::{unit_exponential, Complex64};

/// Pluggable transform, selected at analyser construction
pub trait TransformStrategy {
    /// Short label used in logs and bench output
    fn name(&self) -> &'static str;

    /// Transform a real sample window into its complex spectrum
    fn transform(&self, signal: &[f64]) -> Vec<Complex64>;
}

/// Direct quadratic-time transform (reference semantics)
pub struct DirectTransform;

impl TransformStrategy for DirectTransform {
    fn name(&self) -> &'static str {
        "dft"
    }

    fn transform(&self, signal: &[f64]) -> Vec<Complex64> {
        dft(signal)
    }
}

/// Recursive divide-and-conquer fast transform
pub struct FastTransform;

impl TransformStrategy for FastTransform {
    fn name(&self) -> &'static str {
        "fft"
    }

    fn transform(&self, signal: &[f64]) -> Vec<Complex64> {
        fft(signal)
    }
}

/// Direct discrete Fourier transform
///
/// Bin k is the sum over j of `signal[j] * e^{-2πi·k·j/n}`. O(n²) time;
/// also serves as the fast transform's base case.
pub fn dft(signal: &[f64]) -> Vec<Complex64> {
    let n = signal.len();
    let coeff = -2.0 * PI / n as f64;

    (0..n)
        .map(|k| {
            let mut bin = Complex64::new(0.0, 0.0);
            for (j, &sample) in signal.iter().enumerate() {
                bin += unit_exponential(coeff * (k * j) as f64).scale(sample);
            }
            bin
        })
        .collect()
}

/// Fast Fourier transform via even/odd decomposition
///
/// Requires a power-of-two length for the recursion to bottom out; callers
/// guarantee this through configuration validation. Recursion depth is
/// log2(n), at most 16 for any supported size.
pub fn fft(signal: &[f64]) -> Vec<Complex64> {
    let n = signal.len();
    if n <= 2 {
        return dft(signal);
    }

    let half = n / 2;
    let mut even = Vec::with_capacity(half);
    let mut odd = Vec::with_capacity(half);
    for pair in signal.chunks_exact(2) {
        even.push(pair[0]);
        odd.push(pair[1]);
    }

    let even_spectrum = fft(&even);
    let odd_spectrum = fft(&odd);

    let coeff = -2.0 * PI / n as f64;
    (0..n)
        .map(|k| even_spectrum[k % half] + odd_spectrum[k % half] * unit_exponential(coeff * k as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic pseudo-random samples in [-1, 1]
    fn noise(n: usize, mut seed: u64) -> Vec<f64> {
        (0..n)
            .map(|_| {
                seed = seed
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                (seed >> 33) as f64 / (1u64 << 30) as f64 - 1.0
            })
            .collect()
    }

    #[test]
    fn test_dft_dc_signal() {
        let signal = vec![1.0; 16];
        let spectrum = dft(&signal);

        // All energy in the DC bin
        assert!((spectrum[0].norm() - 16.0).abs() < 1e-9);
        for bin in &spectrum[1..] {
            assert!(bin.norm() < 1e-9);
        }
    }

    #[test]
    fn test_dft_sine_peak_bin() {
        let n = 64;
        let k = 5;
        let signal: Vec<f64> = (0..n)
            .map(|j| (2.0 * PI * k as f64 * j as f64 / n as f64).sin())
            .collect();

        let spectrum = dft(&signal);

        // A pure sinusoid at bin k concentrates in bins k and n-k (n/2 each)
        assert!((spectrum[k].norm() - n as f64 / 2.0).abs() < 1e-9);
        assert!((spectrum[n - k].norm() - n as f64 / 2.0).abs() < 1e-9);
        for (i, bin) in spectrum.iter().enumerate() {
            if i != k && i != n - k {
                assert!(bin.norm() < 1e-9, "unexpected energy at bin {i}");
            }
        }
    }

    #[test]
    fn test_fast_matches_direct() {
        for exp in 1..=11 {
            let n = 1 << exp;
            let signal = noise(n, 0x5eed + exp as u64);

            let direct = dft(&signal);
            let fast = fft(&signal);

            assert_eq!(direct.len(), fast.len());
            for (k, (d, f)) in direct.iter().zip(fast.iter()).enumerate() {
                let tolerance = 1e-6 * d.norm().max(1.0);
                assert!(
                    (d - f).norm() <= tolerance,
                    "n={n} bin {k}: direct {d}, fast {f}"
                );
            }
        }
    }

    #[test]
    fn test_fast_matches_rustfft_oracle() {
        use rustfft::FftPlanner;

        for &n in &[8usize, 64, 512] {
            let signal = noise(n, 0xfeed);

            let mut planner = FftPlanner::<f64>::new();
            let plan = planner.plan_fft_forward(n);
            let mut oracle: Vec<rustfft::num_complex::Complex<f64>> = signal
                .iter()
                .map(|&s| rustfft::num_complex::Complex::new(s, 0.0))
                .collect();
            plan.process(&mut oracle);

            let ours = fft(&signal);
            for (k, (o, f)) in oracle.iter().zip(ours.iter()).enumerate() {
                assert!((o.re - f.re).abs() < 1e-8, "n={n} bin {k} re");
                assert!((o.im - f.im).abs() < 1e-8, "n={n} bin {k} im");
            }
        }
    }

    #[test]
    fn test_transforms_are_pure() {
        let signal = noise(128, 7);

        let direct_a = dft(&signal);
        let direct_b = dft(&signal);
        let fast_a = fft(&signal);
        let fast_b = fft(&signal);

        // Bit-identical on repeated application: no hidden state
        assert_eq!(direct_a, direct_b);
        assert_eq!(fast_a, fast_b);
    }

    #[test]
    fn test_strategy_dispatch() {
        let signal = noise(32, 42);

        let strategies: Vec<Box<dyn TransformStrategy>> =
            vec![Box::new(DirectTransform), Box::new(FastTransform)];
        let names: Vec<&str> = strategies.iter().map(|s| s.name()).collect();
        assert_eq!(names, ["dft", "fft"]);

        let spectra: Vec<_> = strategies.iter().map(|s| s.transform(&signal)).collect();
        for (a, b) in spectra[0].iter().zip(spectra[1].iter()) {
            assert!((a - b).norm() < 1e-9);
        }
    }
}
