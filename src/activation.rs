//! Universal parametric activation for NEAT nodes.
//!
//! Rather than choosing from a closed set of named functions, every node carries
//! the five shape coefficients of the Universal Activation Function (UAF):
//!
//! ```text
//! f(x) = softplus(a·(x + b) + c·x²) − softplus(d·(x − b)) + e
//! ```
//!
//! Depending on the coefficients the same expression approximates identity,
//! ReLU, sigmoid, tanh, gaussian and many others. A fixed arity keeps every node
//! the same size once packed into a texture, so the evaluator never branches
//! on activation kind.

use serde::{Deserialize, Serialize};

/// Number of coefficients carried by every activation.
pub const UAF_PARAM_COUNT: usize = 5;

/// Five-coefficient universal activation descriptor.
///
/// Immutable once constructed. There is deliberately no `Default`: callers
/// supply all five coefficients explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UafActivation {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
}

impl UafActivation {
    /// Create an activation from its five coefficients.
    #[must_use]
    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32) -> Self {
        Self { a, b, c, d, e }
    }

    /// Create an activation from a coefficient array in `[a, b, c, d, e]` order.
    #[must_use]
    pub const fn from_params(params: [f32; UAF_PARAM_COUNT]) -> Self {
        let [a, b, c, d, e] = params;
        Self { a, b, c, d, e }
    }

    /// Coefficients in `[a, b, c, d, e]` order, the order used in textures.
    #[must_use]
    pub const fn params(&self) -> [f32; UAF_PARAM_COUNT] {
        [self.a, self.b, self.c, self.d, self.e]
    }

    /// Slope of the rising branch.
    #[must_use]
    pub const fn a(&self) -> f32 {
        self.a
    }

    /// Input shift shared by both branches.
    #[must_use]
    pub const fn b(&self) -> f32 {
        self.b
    }

    /// Quadratic coefficient of the rising branch.
    #[must_use]
    pub const fn c(&self) -> f32 {
        self.c
    }

    /// Slope of the falling branch.
    #[must_use]
    pub const fn d(&self) -> f32 {
        self.d
    }

    /// Output offset.
    #[must_use]
    pub const fn e(&self) -> f32 {
        self.e
    }

    /// Evaluate the activation for a scalar input.
    ///
    /// NaN inputs propagate. Large magnitudes are handled through a stable
    /// softplus so finite inputs never overflow to infinity through `exp`.
    #[inline]
    #[must_use]
    pub fn apply(&self, x: f32) -> f32 {
        if x.is_nan() {
            return f32::NAN;
        }

        let rising = self.a.mul_add(x + self.b, self.c * x * x);
        let falling = self.d * (x - self.b);
        softplus(rising) - softplus(falling) + self.e
    }
}

/// `ln(1 + e^z)` without overflow for large `z`.
#[inline]
fn softplus(z: f32) -> f32 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}
