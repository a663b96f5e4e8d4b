//! Random Fourier Feature mapping for the Gaussian (RBF) kernel.
//!
//! Each output coordinate is `cos(w_j . x + b_j)` with `w_j ~ N(0, I / stddev^2)`
//! and `b_j ~ U[0, 2*pi)`. Averaged over the offsets,
//! `E[cos(w.x + b) cos(w.y + b)] = exp(-||x - y||^2 / (2 stddev^2)) / 2`,
//! so `(2 / D) * <map(x), map(y)>` is an unbiased estimate of the kernel.

use super::{KernelMapper, map_rows, validate_stddev};
use crate::error::{KernelError, Result};
use num_traits::{Float, FloatConst};
use rand::distributions::uniform::SampleUniform;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Normal, StandardNormal};
use tracing::{debug, warn};

/// Below this output dimension `approximate_kernel` is too noisy to trust.
const NOISY_OUTPUT_DIM: usize = 100;

/// Construction parameters for [`RandomFourierFeatures`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RffConfig<F> {
    /// Length of the raw feature vectors (784 for MNIST pixels).
    pub input_dim: usize,
    /// Number of random features. Cost of a mapping is linear in this.
    pub output_dim: usize,
    /// Kernel bandwidth. Too small and every pair looks dissimilar, too large and
    /// every pair looks the same.
    pub stddev: F,
    /// Seed for the parameter draws. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl<F: Float> RffConfig<F> {
    pub fn new(input_dim: usize, output_dim: usize, stddev: F) -> Self {
        RffConfig {
            input_dim,
            output_dim,
            stddev,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that both dimensions are positive and the bandwidth is a positive finite number.
    pub fn validate(&self) -> Result<()> {
        if self.input_dim == 0 {
            return Err(KernelError::InvalidDimension {
                name: "input_dim",
                value: self.input_dim,
            });
        }
        if self.output_dim == 0 {
            return Err(KernelError::InvalidDimension {
                name: "output_dim",
                value: self.output_dim,
            });
        }
        validate_stddev(self.stddev)
    }
}

/// Random Fourier Feature mapper.
///
/// The projection matrix and offsets are sampled once in the constructor and
/// never change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomFourierFeatures<F> {
    input_dim: usize,
    output_dim: usize,
    stddev: F,
    /// `output_dim x input_dim`, row-major. Row `j` is `w_j`.
    projection: Vec<F>,
    /// One phase offset per output coordinate, in `[0, 2*pi)`.
    offsets: Vec<F>,
}

impl<F> RandomFourierFeatures<F>
where
    F: Float + FloatConst + SampleUniform,
    StandardNormal: Distribution<F>,
{
    /// Builds a mapper from a config, seeding a `StdRng` from `config.seed`
    /// (or from OS entropy when no seed is set).
    pub fn new(config: &RffConfig<F>) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        debug!(
            input_dim = config.input_dim,
            output_dim = config.output_dim,
            stddev = config.stddev.to_f64(),
            seeded = config.seed.is_some(),
            "sampling random Fourier features"
        );
        Self::sample(config.input_dim, config.output_dim, config.stddev, &mut rng)
    }

    /// Builds a mapper drawing its parameters from a caller-supplied random source.
    pub fn from_rng<R: Rng + ?Sized>(
        input_dim: usize,
        output_dim: usize,
        stddev: F,
        rng: &mut R,
    ) -> Result<Self> {
        RffConfig::new(input_dim, output_dim, stddev).validate()?;
        debug!(
            input_dim,
            output_dim,
            stddev = stddev.to_f64(),
            "sampling random Fourier features from caller rng"
        );
        Self::sample(input_dim, output_dim, stddev, rng)
    }

    fn sample<R: Rng + ?Sized>(
        input_dim: usize,
        output_dim: usize,
        stddev: F,
        rng: &mut R,
    ) -> Result<Self> {
        let normal = Normal::new(F::zero(), F::one() / stddev).map_err(|_| KernelError::InvalidStddev {
            value: stddev.to_f64().unwrap_or(f64::NAN),
        })?;
        let phase = Uniform::new(F::zero(), F::PI() + F::PI());

        // All of the projection first, then the offsets: the draw order is part of
        // what makes a seed reproducible.
        let projection: Vec<F> = (0..output_dim * input_dim).map(|_| normal.sample(rng)).collect();
        let offsets: Vec<F> = (0..output_dim).map(|_| phase.sample(rng)).collect();

        Ok(RandomFourierFeatures {
            input_dim,
            output_dim,
            stddev,
            projection,
            offsets,
        })
    }
}

impl<F: Float> RandomFourierFeatures<F> {
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn output_dim(&self) -> usize {
        self.output_dim
    }

    pub fn stddev(&self) -> F {
        self.stddev
    }

    /// The projection matrix, row-major with `output_dim` rows of `input_dim` entries.
    pub fn projection(&self) -> &[F] {
        &self.projection
    }

    pub fn offsets(&self) -> &[F] {
        &self.offsets
    }

    /// Computes `cos(W x + b)`.
    pub fn map(&self, features: &[F]) -> Result<Vec<F>> {
        if features.len() != self.input_dim {
            return Err(KernelError::DimensionMismatch {
                expected: self.input_dim,
                actual: features.len(),
            });
        }
        let mapped = self
            .projection
            .chunks_exact(self.input_dim)
            .zip(self.offsets.iter())
            .map(|(omega, &offset)| {
                let phase = omega
                    .iter()
                    .zip(features.iter())
                    .fold(offset, |acc, (&w, &x)| acc + w * x);
                phase.cos()
            })
            .collect();
        Ok(mapped)
    }

    pub fn map_batch(&self, rows: &[Vec<F>]) -> Result<Vec<Vec<F>>> {
        map_rows(self, rows)
    }

    /// Estimates `rbf_kernel(x, y, stddev)` as `(2 / D) * <map(x), map(y)>`.
    pub fn approximate_kernel(&self, x: &[F], y: &[F]) -> Result<F> {
        if self.output_dim < NOISY_OUTPUT_DIM {
            warn!(
                output_dim = self.output_dim,
                "kernel estimate from fewer than {} random features is noisy",
                NOISY_OUTPUT_DIM
            );
        }
        let mapped_x = self.map(x)?;
        let mapped_y = self.map(y)?;
        let dot = mapped_x
            .iter()
            .zip(mapped_y.iter())
            .fold(F::zero(), |acc, (&a, &b)| acc + a * b);
        let two = F::one() + F::one();
        // output_dim > 0 is checked at construction
        let output_dim = F::from(self.output_dim).unwrap_or_else(F::one);
        Ok(two * dot / output_dim)
    }
}

impl<F: Float> KernelMapper<F> for RandomFourierFeatures<F> {
    fn name(&self) -> &str {
        "RandomFourierFeatures"
    }

    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn output_dim(&self) -> usize {
        self.output_dim
    }

    fn map(&self, features: &[F]) -> Result<Vec<F>> {
        RandomFourierFeatures::map(self, features)
    }
}
