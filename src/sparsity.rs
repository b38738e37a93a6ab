//! Sparsity regularization for the hidden layer.
//!
//! In sparse mode the network tracks the mean activation `ρ̂` of each hidden
//! neuron over a full pass of the data set and nudges it towards a target
//! `ρ` by adding a penalty to that neuron's backpropagated error:
//!
//! ```text
//! penalty = -ρ/ρ̂ + (1 - ρ)/(1 - ρ̂)
//! ```
//!
//! which is the derivative of the KL divergence `KL(ρ || ρ̂)` with respect
//! to `ρ̂`.

use crate::activator::sigmoid_prime;
use crate::error::{AutoencoderError, Result};

/// Default target mean activation of a hidden neuron.
pub const DEFAULT_TARGET: f64 = 0.05;
/// Default weight (β) of the sparsity penalty.
pub const DEFAULT_PENALTY: f64 = 0.1;
/// Default clamp applied to the mean activation before dividing by it.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// How the sparsity penalty is folded into the hidden-layer delta.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SparsityGradient {
    /// `delta = (error + β·penalty)·f'(y)`.
    ///
    /// Matches models trained by earlier releases. The network's errors are
    /// `target - output`, so adding the penalty pushes activations *away*
    /// from the target and training may fail to converge.
    Legacy,
    /// `delta = (error - β·penalty)·f'(y)`, the sign that actually descends
    /// the KL divergence.
    Corrected,
}

impl Default for SparsityGradient {
    fn default() -> Self {
        SparsityGradient::Legacy
    }
}

/// Sparsity settings for the designated hidden layer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sparsity {
    /// Desired mean activation `ρ` of every hidden neuron.
    pub target: f64,
    /// Weight `β` of the penalty term.
    pub penalty: f64,
    /// Mean activations are clamped into `[epsilon, 1 - epsilon]`.
    pub epsilon: f64,
    pub gradient: SparsityGradient,
}

impl Default for Sparsity {
    fn default() -> Self {
        Sparsity {
            target: DEFAULT_TARGET,
            penalty: DEFAULT_PENALTY,
            epsilon: DEFAULT_EPSILON,
            gradient: SparsityGradient::Legacy,
        }
    }
}

impl Sparsity {
    /// Checks that every parameter is usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.target > 0.0 && self.target < 1.0) {
            return Err(AutoencoderError::InvalidConfig(format!(
                "sparsity target must lie in (0, 1), got {}",
                self.target
            )));
        }
        if !self.penalty.is_finite() || self.penalty < 0.0 {
            return Err(AutoencoderError::InvalidConfig(format!(
                "sparsity penalty must be a non-negative number, got {}",
                self.penalty
            )));
        }
        if !(self.epsilon > 0.0 && self.epsilon < 0.5) {
            return Err(AutoencoderError::InvalidConfig(format!(
                "sparsity epsilon must lie in (0, 0.5), got {}",
                self.epsilon
            )));
        }
        Ok(())
    }

    /// The KL-divergence gradient for a neuron whose mean activation is
    /// `avg_activation`. Always finite.
    pub fn penalty_term(&self, avg_activation: f64) -> f64 {
        let rho = self.target;
        // f64::max discards NaN, so a NaN mean lands on epsilon as well
        let rho_hat = avg_activation.max(self.epsilon).min(1.0 - self.epsilon);
        -(rho / rho_hat) + (1.0 - rho) / (1.0 - rho_hat)
    }

    /// Computes the delta of a hidden neuron with backpropagated `error`,
    /// current `output` and mean activation `avg_activation`.
    pub fn delta(&self, error: f64, output: f64, avg_activation: f64) -> f64 {
        let term = self.penalty * self.penalty_term(avg_activation);
        let signal = match self.gradient {
            SparsityGradient::Legacy => error + term,
            SparsityGradient::Corrected => error - term,
        };
        signal * sigmoid_prime(output)
    }
}
