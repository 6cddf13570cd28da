//! Spectral math: complex helpers, discrete transforms, windowing

pub mod complex;
pub mod transform;
pub mod windowing;

pub use complex::unit_exponential;
pub use transform::{dft, fft, DirectTransform, FastTransform, TransformStrategy};
pub use windowing::blackman_inplace;
