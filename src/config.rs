//! Engine configuration.
//!
//! A [`Config`] can be built in code with its setters or read from JSON using
//! the option names `learningRate`, `momentum`, `hiddenLayers`, `makeSparse`,
//! `sparsityParameter` and `sparsityPenalty`. Omitted options take their
//! defaults.

use crate::error::{AutoencoderError, Result};
use crate::sparsity::{self, Sparsity, SparsityGradient};

/// Default gradient descent step size.
pub const DEFAULT_LEARNING_RATE: f64 = 0.3;
/// Default fraction of the previous weight change carried forward.
pub const DEFAULT_MOMENTUM: f64 = 0.1;

/// Hyperparameters of an [`Autoencoder`](crate::Autoencoder).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub learning_rate: f64,
    pub momentum: f64,
    /// Sizes of the hidden layers. When unset, training uses a single hidden
    /// layer of `max(3, input_len / 2)` neurons. An empty list connects the
    /// inputs straight to the outputs.
    pub hidden_layers: Option<Vec<usize>>,
    pub make_sparse: bool,
    /// Target mean activation of the hidden neurons in sparse mode.
    pub sparsity_parameter: f64,
    /// Weight of the sparsity penalty in sparse mode.
    pub sparsity_penalty: f64,
    pub sparsity_epsilon: f64,
    pub sparsity_gradient: SparsityGradient,
    /// Seed for weight initialization. Unseeded engines draw one from the
    /// thread RNG.
    pub seed: Option<u64>,
}

impl Default for Config {
    /// The defaults are:
    ///
    /// * A learning rate of 0.3 and momentum of 0.1.
    /// * An automatically sized hidden layer.
    /// * Sparsity disabled, with a target of 0.05 and penalty of 0.1 once
    ///   enabled.
    fn default() -> Self {
        Config {
            learning_rate: DEFAULT_LEARNING_RATE,
            momentum: DEFAULT_MOMENTUM,
            hidden_layers: None,
            make_sparse: false,
            sparsity_parameter: sparsity::DEFAULT_TARGET,
            sparsity_penalty: sparsity::DEFAULT_PENALTY,
            sparsity_epsilon: sparsity::DEFAULT_EPSILON,
            sparsity_gradient: SparsityGradient::Legacy,
            seed: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the learning rate to use during gradient descent.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Sets the momentum applied to weight updates.
    pub fn momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }

    /// Fixes the hidden layer sizes instead of deriving them from the data.
    pub fn hidden_layers(mut self, sizes: &[usize]) -> Self {
        self.hidden_layers = Some(sizes.into());
        self
    }

    /// Enables or disables the sparsity penalty.
    pub fn make_sparse(mut self, sparse: bool) -> Self {
        self.make_sparse = sparse;
        self
    }

    /// Sets the target mean hidden activation.
    pub fn sparsity_parameter(mut self, target: f64) -> Self {
        self.sparsity_parameter = target;
        self
    }

    /// Sets the weight of the sparsity penalty.
    pub fn sparsity_penalty(mut self, beta: f64) -> Self {
        self.sparsity_penalty = beta;
        self
    }

    pub fn sparsity_gradient(mut self, gradient: SparsityGradient) -> Self {
        self.sparsity_gradient = gradient;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The sparsity settings, if sparse mode is enabled.
    pub fn sparsity(&self) -> Option<Sparsity> {
        if !self.make_sparse {
            return None;
        }
        Some(Sparsity {
            target: self.sparsity_parameter,
            penalty: self.sparsity_penalty,
            epsilon: self.sparsity_epsilon,
            gradient: self.sparsity_gradient,
        })
    }

    /// Verifies that every option is usable.
    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate < 0.0 {
            return Err(AutoencoderError::InvalidConfig(format!(
                "learning rate must be a non-negative number, got {}",
                self.learning_rate
            )));
        }
        if !self.momentum.is_finite() || self.momentum < 0.0 {
            return Err(AutoencoderError::InvalidConfig(format!(
                "momentum must be a non-negative number, got {}",
                self.momentum
            )));
        }
        if let Some(sizes) = &self.hidden_layers {
            if sizes.contains(&0) {
                return Err(AutoencoderError::InvalidConfig(format!(
                    "hidden layer sizes must be positive, got {:?}",
                    sizes
                )));
            }
        }
        if let Some(sparsity) = self.sparsity() {
            sparsity.validate()?;
        }
        Ok(())
    }

    /// Layer sizes for a network mapping `input_len` inputs to `output_len`
    /// outputs.
    pub fn topology(&self, input_len: usize, output_len: usize) -> Vec<usize> {
        let mut sizes = vec![input_len];
        match &self.hidden_layers {
            Some(hidden) => sizes.extend(hidden),
            None => sizes.push(std::cmp::max(3, input_len / 2)),
        }
        sizes.push(output_len);
        sizes
    }
}
