//! Spectral oracle generation over a fixed size schedule.
//!
//! Independent of the subject registry: cases are synthesized from a seeded
//! random stream and keyed by size and domain. Unlike the text paths, any
//! failure here is fatal. The inputs are fully controlled, so a failure
//! means the transform backend is broken, not that a subject is absent.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use num_complex::Complex64;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::spectral::{CASE_KEY_PREFIX, DOMAIN_COMPLEX, DOMAIN_REAL, PROGRESSIONS};
use crate::errors::OracleError;
use crate::provider::FourierTransform;
use crate::types::CaseKey;

/// Small deterministic RNG used for reproducible spectral input synthesis.
#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64_internal(&mut self) -> u64 {
        let mut z = self.state.wrapping_add(0x9E3779B97F4A7C15);
        self.state = z;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }
}

impl rand::RngCore for DeterministicRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64_internal() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_u64_internal()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut offset = 0;
        while offset < dest.len() {
            let value = self.next_u64_internal();
            let bytes = value.to_le_bytes();
            let remaining = dest.len() - offset;
            let copy_len = remaining.min(bytes.len());
            dest[offset..offset + copy_len].copy_from_slice(&bytes[..copy_len]);
            offset += copy_len;
        }
    }
}

fn standard_normal(rng: &mut DeterministicRng, count: usize) -> Vec<f64> {
    (0..count).map(|_| rng.sample(StandardNormal)).collect()
}

fn interleave(values: &[Complex64]) -> Vec<f64> {
    let mut flat = Vec::with_capacity(values.len() * 2);
    for value in values {
        flat.push(value.re);
        flat.push(value.im);
    }
    flat
}

/// Deduplicated ascending union of four geometric progressions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SizeSchedule {
    sizes: Vec<usize>,
}

impl SizeSchedule {
    /// The standard schedule: powers of 2, 3, 5, and 7 up to fixed exponents.
    pub fn standard() -> Self {
        let mut sizes = BTreeSet::new();
        for &(base, max_exponent) in PROGRESSIONS {
            let mut value = 1usize;
            for _ in 0..max_exponent {
                value *= base;
                sizes.insert(value);
            }
        }
        Self {
            sizes: sizes.into_iter().collect(),
        }
    }

    /// Case sizes in ascending order.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Number of sizes in the schedule.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Returns `true` when the schedule has no sizes.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

/// One spectral case: the synthesized input and its forward transform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpectralOracleRecord {
    /// Whether the input is complex-valued.
    pub complex: bool,
    /// Input sequence; one value per sample for real cases, interleaved
    /// real/imaginary pairs for complex cases.
    pub input: Vec<f64>,
    /// Output spectrum, always interleaved real/imaginary pairs.
    pub output: Vec<f64>,
}

/// Generates the spectral reference set from a seeded random stream.
///
/// The seed is fixed at construction and the stream is restarted on every
/// [`generate`](Self::generate) call, so one generator value produces the
/// same bundle no matter how often it runs.
#[derive(Clone, Debug)]
pub struct SpectralOracleGenerator {
    schedule: SizeSchedule,
    rng: DeterministicRng,
}

impl SpectralOracleGenerator {
    /// Create a generator over `schedule`, seeded with `seed`.
    pub fn new(schedule: SizeSchedule, seed: u64) -> Self {
        Self {
            schedule,
            rng: DeterministicRng::new(seed),
        }
    }

    /// Generate every case, driving `transform` once per size and domain.
    ///
    /// Real-domain cases come first, then complex, each in ascending size
    /// order; the random stream runs continuously across all cases.
    pub fn generate(
        &self,
        transform: &mut dyn FourierTransform,
    ) -> Result<IndexMap<CaseKey, SpectralOracleRecord>, OracleError> {
        let mut rng = self.rng.clone();
        let mut cases = IndexMap::new();
        for complex in [false, true] {
            let domain = if complex { DOMAIN_COMPLEX } else { DOMAIN_REAL };
            for &size in self.schedule.sizes() {
                let record = Self::generate_case(&mut rng, transform, size, complex)?;
                debug!(size, complex, "spectral case generated");
                cases.insert(format!("{CASE_KEY_PREFIX}_{size}_{domain}"), record);
            }
        }
        Ok(cases)
    }

    fn generate_case(
        rng: &mut DeterministicRng,
        transform: &mut dyn FourierTransform,
        size: usize,
        complex: bool,
    ) -> Result<SpectralOracleRecord, OracleError> {
        let (buffer, input) = if complex {
            let re = standard_normal(rng, size);
            let im = standard_normal(rng, size);
            let buffer: Vec<Complex64> = re
                .iter()
                .zip(&im)
                .map(|(&re, &im)| Complex64::new(re, im))
                .collect();
            let input = interleave(&buffer);
            (buffer, input)
        } else {
            let samples = standard_normal(rng, size);
            let buffer = samples.iter().map(|&re| Complex64::new(re, 0.0)).collect();
            (buffer, samples)
        };

        let spectrum = transform.forward(&buffer)?;
        if spectrum.len() != size {
            return Err(OracleError::Transform {
                size,
                reason: format!("output length {} does not match input length", spectrum.len()),
            });
        }

        Ok(SpectralOracleRecord {
            complex,
            input,
            output: interleave(&spectrum),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::fourier::RustFftTransform;

    #[test]
    fn standard_schedule_is_the_sorted_union_of_the_progressions() {
        let schedule = SizeSchedule::standard();
        let sizes = schedule.sizes();

        assert_eq!(sizes.len(), 24);
        assert_eq!(sizes.first(), Some(&2));
        assert_eq!(sizes.last(), Some(&3125));
        assert!(sizes.windows(2).all(|pair| pair[0] < pair[1]));
        for expected in [512, 2187, 625, 343] {
            assert!(sizes.contains(&expected), "missing size {expected}");
        }
        assert!(!sizes.contains(&1));
        assert!(!sizes.contains(&6));
    }

    #[test]
    fn schedule_generation_is_stable_across_calls() {
        assert_eq!(SizeSchedule::standard(), SizeSchedule::standard());
    }

    #[test]
    fn generator_reproduces_identical_cases_across_calls() {
        let generator = SpectralOracleGenerator::new(SizeSchedule::standard(), 0);
        let mut transform = RustFftTransform::new();
        let first = generator.generate(&mut transform).unwrap();
        let second = generator.generate(&mut transform).unwrap();

        assert_eq!(first, second);
        let first_keys: Vec<_> = first.keys().collect();
        let second_keys: Vec<_> = second.keys().collect();
        assert_eq!(first_keys, second_keys);
    }

    #[test]
    fn real_and_complex_cases_carry_the_declared_lengths() {
        let generator = SpectralOracleGenerator::new(SizeSchedule { sizes: vec![8] }, 0);
        let cases = generator.generate(&mut RustFftTransform::new()).unwrap();

        let real = &cases["fft_8_real"];
        assert!(!real.complex);
        assert_eq!(real.input.len(), 8);
        assert_eq!(real.output.len(), 16);

        let complex = &cases["fft_8_complex"];
        assert!(complex.complex);
        assert_eq!(complex.input.len(), 16);
        assert_eq!(complex.output.len(), 16);
    }

    #[test]
    fn complex_inputs_draw_the_real_block_before_the_imaginary_block() {
        let generator = SpectralOracleGenerator::new(SizeSchedule { sizes: vec![2] }, 0);
        let cases = generator.generate(&mut RustFftTransform::new()).unwrap();

        let mut rng = DeterministicRng::new(0);
        let draws = standard_normal(&mut rng, 6);

        assert_eq!(cases["fft_2_real"].input, &draws[0..2]);
        assert_eq!(
            cases["fft_2_complex"].input,
            vec![draws[2], draws[4], draws[3], draws[5]]
        );
    }

    #[test]
    fn a_short_transform_output_is_fatal() {
        struct TruncatingTransform;

        impl FourierTransform for TruncatingTransform {
            fn forward(&mut self, input: &[Complex64]) -> Result<Vec<Complex64>, OracleError> {
                Ok(input[..input.len() - 1].to_vec())
            }
        }

        let generator = SpectralOracleGenerator::new(SizeSchedule { sizes: vec![2] }, 0);
        let err = generator.generate(&mut TruncatingTransform).unwrap_err();
        assert!(matches!(err, OracleError::Transform { size: 2, .. }));
    }
}
