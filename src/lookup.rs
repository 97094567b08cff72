//! Sampled lookup table of named activation functions.
//!
//! Evaluators that prefer a texture fetch over evaluating a formula can sample
//! a table row instead. Each [`NamedActivation`] is evaluated at `resolution`
//! evenly spaced points over `[-1, 1)`; rows are ordered by *density* (mean of
//! the first half minus mean of the second half) so that functions with
//! similar overall slope sit next to each other, then quantised to 8-bit UNORM.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Named activation functions available to the lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedActivation {
    /// f(x) = x
    Identity,
    /// f(x) = -x
    Inverse,
    /// f(x) = |x|
    Absolute,
    /// f(x) = x²
    Square,
    /// f(x) = 1 / (1 + e^(-x))
    Sigmoid,
    /// f(x) = tanh(x)
    Tanh,
    /// f(x) = max(0, x)
    ReLU,
    /// f(x) = ln(1 + e^x)
    Softplus,
    /// f(x) = x / (1 + |x|)
    Softsign,
    /// f(x) = x · sigmoid(x)
    Swish,
    /// f(x) = x · tanh(softplus(x))
    Mish,
    /// f(x) = (√(x² + 1) − 1) / 2 + x
    BentIdentity,
    /// f(x) = sin(x) / x, 1 at 0
    Sinc,
    /// f(x) = e^(-x²)
    Gaussian,
    /// softplus for x > 0, mirrored for x ≤ 0
    SoftExponential,
    /// x clamped to [-1, 1]
    SoftClip,
    /// x − x³/3 inside [-1, 1], clamped outside
    CubicSoftClip,
    /// f(x) = sin(πx)
    Sinusoid,
    /// f(x) = sin(πx) / (πx), 1 at 0
    NormalizedSinc,
    /// f(x) = e^(-x²) − e^(-1)
    BipolarGaussian,
    /// f(x) = sigmoid(x) − 0.5
    BipolarSigmoid,
    /// -1 below -0.5, x + 0.5 in between, 1 from 0.5
    StepwiseLinear,
    /// f(x) = sin(100x)
    HighFrequency,
    /// f(x) = |sin(100x)|
    HighFrequencyAbs,
}

impl NamedActivation {
    /// All named activations.
    pub const ALL: [Self; 24] = [
        Self::Identity,
        Self::Inverse,
        Self::Absolute,
        Self::Square,
        Self::Sigmoid,
        Self::Tanh,
        Self::ReLU,
        Self::Softplus,
        Self::Softsign,
        Self::Swish,
        Self::Mish,
        Self::BentIdentity,
        Self::Sinc,
        Self::Gaussian,
        Self::SoftExponential,
        Self::SoftClip,
        Self::CubicSoftClip,
        Self::Sinusoid,
        Self::NormalizedSinc,
        Self::BipolarGaussian,
        Self::BipolarSigmoid,
        Self::StepwiseLinear,
        Self::HighFrequency,
        Self::HighFrequencyAbs,
    ];

    /// Apply this activation to an input value.
    #[inline]
    #[must_use]
    pub fn apply(self, x: f32) -> f32 {
        let sigmoid = |v: f32| 1.0 / (1.0 + (-v).exp());
        let softplus = |v: f32| v.exp().ln_1p();

        match self {
            Self::Identity => x,
            Self::Inverse => -x,
            Self::Absolute => x.abs(),
            Self::Square => x * x,
            Self::Sigmoid => sigmoid(x),
            Self::Tanh => x.tanh(),
            Self::ReLU => x.max(0.0),
            Self::Softplus => softplus(x),
            Self::Softsign => x / (1.0 + x.abs()),
            Self::Swish => x * sigmoid(x),
            Self::Mish => x * softplus(x).tanh(),
            Self::BentIdentity => ((x * x + 1.0).sqrt() - 1.0) / 2.0 + x,
            Self::Sinc => {
                if x == 0.0 {
                    1.0
                } else {
                    x.sin() / x
                }
            }
            Self::Gaussian => (-x * x).exp(),
            Self::SoftExponential => {
                if x > 0.0 {
                    softplus(x)
                } else {
                    -softplus(-x)
                }
            }
            Self::SoftClip => x.clamp(-1.0, 1.0),
            Self::CubicSoftClip => {
                if x > 1.0 {
                    1.0
                } else if x < -1.0 {
                    -1.0
                } else {
                    x - x * x * x / 3.0
                }
            }
            Self::Sinusoid => (x * PI).sin(),
            Self::NormalizedSinc => {
                if x == 0.0 {
                    1.0
                } else {
                    (x * PI).sin() / (x * PI)
                }
            }
            Self::BipolarGaussian => (-x * x).exp() - (-1.0_f32).exp(),
            Self::BipolarSigmoid => sigmoid(x) - 0.5,
            Self::StepwiseLinear => {
                if x < -0.5 {
                    -1.0
                } else if x < 0.5 {
                    x + 0.5
                } else {
                    1.0
                }
            }
            Self::HighFrequency => (x * 100.0).sin(),
            Self::HighFrequencyAbs => (x * 100.0).sin().abs(),
        }
    }
}

/// One sampled function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Function this row samples.
    pub activation: NamedActivation,
    /// Sampled values, left to right over the table's input range.
    pub samples: Vec<f32>,
}

impl TableRow {
    /// Mean of the first `subset` samples minus mean of the last `subset`.
    #[must_use]
    pub fn density(&self, subset: usize) -> f32 {
        let subset = subset.clamp(1, self.samples.len().max(1));
        #[allow(clippy::cast_precision_loss)]
        let n = subset as f32;
        let head: f32 = self.samples.iter().take(subset).sum();
        let tail: f32 = self.samples.iter().rev().take(subset).sum();
        head / n - tail / n
    }
}

/// Activation functions sampled into rows of equal length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationTable {
    resolution: usize,
    rows: Vec<TableRow>,
}

impl ActivationTable {
    /// Default samples per row.
    pub const DEFAULT_RESOLUTION: usize = 8192;

    /// Sample every [`NamedActivation`] over `[-1, 1)` and sort rows by density.
    #[must_use]
    pub fn generate(resolution: usize) -> Self {
        let mut table = Self::sample(&NamedActivation::ALL, -1.0, 1.0, resolution);
        table.sort_by_density(resolution / 2);
        table
    }

    /// Sample the given functions at `resolution` points over `[start, stop)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn sample(
        activations: &[NamedActivation],
        start: f32,
        stop: f32,
        resolution: usize,
    ) -> Self {
        let step = if resolution == 0 {
            0.0
        } else {
            (stop - start) / resolution as f32
        };

        let rows = activations
            .iter()
            .map(|&activation| TableRow {
                activation,
                samples: (0..resolution)
                    .map(|i| activation.apply((i as f32).mul_add(step, start)))
                    .collect(),
            })
            .collect();

        Self { resolution, rows }
    }

    /// Stable ascending sort by [`TableRow::density`]; NaN densities compare equal.
    pub fn sort_by_density(&mut self, subset: usize) {
        self.rows.sort_by(|a, b| {
            a.density(subset)
                .partial_cmp(&b.density(subset))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    /// Samples per row.
    #[must_use]
    pub const fn resolution(&self) -> usize {
        self.resolution
    }

    /// Rows in table order.
    #[must_use]
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Row index of `activation`, if it is in the table.
    #[must_use]
    pub fn row_of(&self, activation: NamedActivation) -> Option<usize> {
        self.rows.iter().position(|row| row.activation == activation)
    }

    /// Row-major 8-bit UNORM image, `resolution` wide and one row per function.
    ///
    /// Values are clipped to `[-1, 1]` and mapped linearly onto `[0, 255]`.
    #[must_use]
    pub fn to_unorm_bytes(&self) -> Vec<u8> {
        self.rows
            .iter()
            .flat_map(|row| row.samples.iter().map(|&v| to_unorm(v)))
            .collect()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_unorm(value: f32) -> u8 {
    let clipped = if value.is_nan() { 0.0 } else { value.clamp(-1.0, 1.0) };
    ((clipped + 1.0) * 0.5 * 255.0).round() as u8
}
