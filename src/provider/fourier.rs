//! Spectral transform backed by `rustfft`.

use num_complex::Complex64;
use rustfft::FftPlanner;

use crate::errors::OracleError;
use crate::provider::FourierTransform;

/// Forward DFT over `f64` complex buffers.
///
/// The transform is unnormalized (no `1/n` scaling), matching the forward
/// convention of the numeric references the bundles are compared against.
/// Plans are cached per size, so repeated calls at the same length reuse
/// the planned algorithm.
pub struct RustFftTransform {
    planner: FftPlanner<f64>,
}

impl RustFftTransform {
    /// Create a transform with an empty plan cache.
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }
}

impl Default for RustFftTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl FourierTransform for RustFftTransform {
    fn forward(&mut self, input: &[Complex64]) -> Result<Vec<Complex64>, OracleError> {
        let mut buffer = input.to_vec();
        let fft = self.planner.plan_fft_forward(buffer.len());
        fft.process(&mut buffer);
        Ok(buffer)
    }
}
