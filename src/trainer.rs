//! The training loop.

use crate::error::{AutoencoderError, Result};
use crate::network::{NetworkState, StepSize};
use crate::sparsity::Sparsity;

use std::time::Instant;

/// Default upper bound on training iterations.
pub const DEFAULT_ITERATIONS: usize = 20_000;
/// Default mean square error at which training stops.
pub const DEFAULT_ERROR_THRESHOLD: f64 = 0.005;
/// Default number of iterations between callback invocations.
pub const DEFAULT_CALLBACK_PERIOD: usize = 10;

/// Options for a single call to [`Autoencoder::train`](crate::Autoencoder::train).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrainingOptions {
    /// Stops after this many iterations.
    pub iterations: usize,
    /// Stops once the mean error drops to this value.
    pub error_thresh: f64,
    pub logging: Logging,
    /// Iterations between callback invocations.
    pub callback_period: usize,
}

impl Default for TrainingOptions {
    /// Runs up to 20000 iterations or until the error reaches 0.005, without
    /// logging.
    fn default() -> Self {
        TrainingOptions {
            iterations: DEFAULT_ITERATIONS,
            error_thresh: DEFAULT_ERROR_THRESHOLD,
            logging: Logging::Silent,
            callback_period: DEFAULT_CALLBACK_PERIOD,
        }
    }
}

impl TrainingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of iterations.
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the error at which training is complete.
    pub fn error_threshold(mut self, threshold: f64) -> Self {
        self.error_thresh = threshold;
        self
    }

    /// Sets the type of logging to be emitted during training.
    pub fn logging(mut self, logging: Logging) -> Self {
        self.logging = logging;
        self
    }

    pub fn callback_period(mut self, period: usize) -> Self {
        self.callback_period = period;
        self
    }

    /// Returns true if training is complete.
    fn should_stop(&self, iteration: usize, training_error: f64) -> bool {
        iteration >= self.iterations || training_error <= self.error_thresh
    }

    fn validate(&self) -> Result<()> {
        if self.error_thresh.is_nan() {
            return Err(AutoencoderError::InvalidConfig("error threshold is NaN".into()));
        }
        Ok(())
    }
}

/// Logging frequency to use during training
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Logging {
    /// No logs will be emitted
    Silent,
    /// A summary will be emitted at completion
    Completion,
    /// A summary will be emitted every `n` training iterations, and at
    /// completion
    Iterations(usize),
}

impl Logging {
    /// Performs logging for `iteration` of training.
    fn iteration(&self, iteration: usize, training_error: f64, avg_hidden: Option<&[f64]>) {
        if let Logging::Iterations(freq) = *self {
            if freq > 0 && iteration % freq == 0 {
                match avg_hidden {
                    Some(avg) => {
                        let mean = avg.iter().sum::<f64>() / avg.len().max(1) as f64;
                        tracing::info!(iteration, training_error, avg_hidden_activation = mean, "training");
                    }
                    None => tracing::info!(iteration, training_error, "training"),
                }
            }
        }
    }

    /// Performs logging at the end of training.
    fn completion(&self, iterations: usize, training_error: f64, start_time: Instant) {
        if let Logging::Silent = self {
            return;
        }
        tracing::info!(
            iterations,
            training_error,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "training completed"
        );
    }
}

/// Result of a training run.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingStatus {
    /// Mean square error of the last completed iteration.
    pub error: f64,
    /// Number of completed iterations.
    pub iterations: usize,
}

/// Trains `network` on dense `(input, target)` pairs until `options` says to
/// stop.
///
/// Each iteration first measures the mean hidden activation over the whole
/// data set when `sparsity` is set, then runs one forward/backward/update
/// cycle per example. `callback` sees the status after every
/// `callback_period` iterations.
pub fn train_network<F>(
    network: &mut NetworkState,
    examples: &[(Vec<f64>, Vec<f64>)],
    step: StepSize,
    sparsity: Option<&Sparsity>,
    options: &TrainingOptions,
    mut callback: F,
) -> Result<TrainingStatus>
where
    F: FnMut(&TrainingStatus),
{
    options.validate()?;
    if examples.is_empty() {
        return Err(AutoencoderError::invalid_input("cannot train on an empty data set"));
    }
    if sparsity.is_some() && network.hidden_layer().is_none() {
        return Err(AutoencoderError::InvalidTopology(
            "sparse training needs a hidden layer".into(),
        ));
    }
    let inputs: Vec<&[f64]> = examples.iter().map(|(input, _)| input.as_slice()).collect();

    let start_time = Instant::now();
    let mut iteration = 0;
    let mut training_error = 1.0;
    while !options.should_stop(iteration, training_error) {
        if sparsity.is_some() {
            network.measure_hidden_activation(&inputs)?;
        }

        let mut sum = 0.0;
        for (input, target) in examples {
            sum += network.train_pattern(input, target, step, sparsity)?;
        }
        training_error = sum / examples.len() as f64;

        let avg_hidden = sparsity.map(|_| network.avg_hidden_activation());
        options.logging.iteration(iteration, training_error, avg_hidden);
        if options.callback_period > 0 && iteration % options.callback_period == 0 {
            callback(&TrainingStatus {
                error: training_error,
                iterations: iteration,
            });
        }
        iteration += 1;
    }
    options.logging.completion(iteration, training_error, start_time);
    Ok(TrainingStatus {
        error: training_error,
        iterations: iteration,
    })
}
