//! Complex value helpers shared by both transform strategies

pub use num_complex::Complex64;

/// Unit-circle exponential e^{ix} = (cos x, sin x)
pub fn unit_exponential(x: f64) -> Complex64 {
    Complex64::cis(x)
}
