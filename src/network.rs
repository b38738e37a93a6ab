//! Per-layer network state and the training primitives that mutate it.
//!
//! Layers are indexed from 0 (input) to `output_layer()`. Every layer `ℓ > 0`
//! owns a weight matrix whose row `n` holds the weights from each neuron of
//! layer `ℓ - 1` into neuron `n`, a bias per neuron, and a momentum buffer
//! shaped like its weights. The input layer only has outputs.

use crate::activator::{sigmoid, sigmoid_prime};
use crate::error::{AutoencoderError, Result};
use crate::matrix::{randos, Mat};
use crate::sparsity::Sparsity;
use crate::utils::{mean_square_error, Back, ZeroOut};

use itertools::izip;
use rand::Rng;

/// Step sizes for a single weight update.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepSize {
    pub learning_rate: f64,
    pub momentum: f64,
}

/// The complete mutable state of a feedforward sigmoid network.
#[derive(Clone, Debug)]
pub struct NetworkState {
    sizes: Vec<usize>,
    /// Last activation of every neuron.
    outputs: Vec<Vec<f64>>,
    /// Backpropagated error of every neuron.
    errors: Vec<Vec<f64>>,
    /// Error scaled by the activation derivative.
    deltas: Vec<Vec<f64>>,
    /// `weights[0]` is an empty placeholder.
    weights: Vec<Mat>,
    biases: Vec<Vec<f64>>,
    /// Previous weight change, for momentum.
    changes: Vec<Mat>,
    hidden_sums: Vec<f64>,
    avg_hidden_activation: Vec<f64>,
}

impl NetworkState {
    /// Allocates a new, untrained network with the given layer sizes.
    ///
    /// Biases and weights are drawn uniformly from `[-0.02, 0.03)`; all other
    /// buffers start at zero.
    pub fn new<R: Rng + ?Sized>(sizes: &[usize], rng: &mut R) -> Result<Self> {
        validate_sizes(sizes)?;
        let mut weights = Vec::with_capacity(sizes.len());
        let mut biases = Vec::with_capacity(sizes.len());
        weights.push(Mat::zeros(0, 0));
        biases.push(Vec::new());
        for layer in 1..sizes.len() {
            biases.push(randos(rng, sizes[layer]));
            weights.push(Mat::random(rng, sizes[layer], sizes[layer - 1]));
        }
        Ok(Self::with_parameters(sizes.to_vec(), weights, biases))
    }

    /// Assembles a network from explicit parameters.
    ///
    /// `weights` and `biases` must have one entry per layer, with empty
    /// placeholders at index 0.
    pub fn from_parameters(sizes: Vec<usize>, weights: Vec<Mat>, biases: Vec<Vec<f64>>) -> Result<Self> {
        validate_sizes(&sizes)?;
        if weights.len() != sizes.len() {
            return Err(AutoencoderError::size_mismatch("weight layers", sizes.len(), weights.len()));
        }
        if biases.len() != sizes.len() {
            return Err(AutoencoderError::size_mismatch("bias layers", sizes.len(), biases.len()));
        }
        for layer in 1..sizes.len() {
            let w = &weights[layer];
            if w.rows() != sizes[layer] {
                return Err(AutoencoderError::size_mismatch("weight rows", sizes[layer], w.rows()));
            }
            if w.cols() != sizes[layer - 1] {
                return Err(AutoencoderError::size_mismatch("weight columns", sizes[layer - 1], w.cols()));
            }
            if biases[layer].len() != sizes[layer] {
                return Err(AutoencoderError::size_mismatch("biases", sizes[layer], biases[layer].len()));
            }
        }
        Ok(Self::with_parameters(sizes, weights, biases))
    }

    fn with_parameters(sizes: Vec<usize>, weights: Vec<Mat>, biases: Vec<Vec<f64>>) -> Self {
        let zeros: Vec<Vec<f64>> = sizes.iter().map(|&n| vec![0.0; n]).collect();
        let changes = weights.iter().map(|w| Mat::zeros(w.rows(), w.cols())).collect();
        let hidden = if sizes.len() > 2 { sizes[sizes.len() - 2] } else { 0 };
        NetworkState {
            outputs: zeros.clone(),
            errors: zeros.clone(),
            deltas: zeros,
            weights,
            biases,
            changes,
            hidden_sums: vec![0.0; hidden],
            avg_hidden_activation: vec![0.0; hidden],
            sizes,
        }
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn input_len(&self) -> usize {
        self.sizes[0]
    }

    pub fn output_len(&self) -> usize {
        *self.sizes.back()
    }

    pub fn output_layer(&self) -> usize {
        self.sizes.len() - 1
    }

    /// The layer immediately before the output layer, which sparsity
    /// regularizes. `None` if the network has no hidden layer.
    pub fn hidden_layer(&self) -> Option<usize> {
        if self.sizes.len() > 2 {
            Some(self.output_layer() - 1)
        } else {
            None
        }
    }

    pub fn weights(&self, layer: usize) -> &Mat {
        &self.weights[layer]
    }

    pub fn biases(&self, layer: usize) -> &[f64] {
        &self.biases[layer]
    }

    pub fn outputs(&self, layer: usize) -> &[f64] {
        &self.outputs[layer]
    }

    pub fn errors(&self, layer: usize) -> &[f64] {
        &self.errors[layer]
    }

    pub fn deltas(&self, layer: usize) -> &[f64] {
        &self.deltas[layer]
    }

    /// Mean hidden activation measured by the last call to
    /// [`measure_hidden_activation`](Self::measure_hidden_activation).
    pub fn avg_hidden_activation(&self) -> &[f64] {
        &self.avg_hidden_activation
    }

    /// Feeds `input` forward through the network, returning the output layer.
    pub fn run_input(&mut self, input: &[f64]) -> Result<&[f64]> {
        if input.len() != self.input_len() {
            return Err(AutoencoderError::size_mismatch("input", self.input_len(), input.len()));
        }
        self.outputs[0].copy_from_slice(input);
        for layer in 1..self.sizes.len() {
            let (before, after) = self.outputs.split_at_mut(layer);
            let incoming = before.back();
            for (output, weights, bias) in izip!(
                after[0].iter_mut(),
                self.weights[layer].iter_rows(),
                self.biases[layer].iter()
            ) {
                let sum = weights.iter().zip(incoming).fold(*bias, |acc, (w, x)| acc + w * x);
                *output = sigmoid(sum);
            }
        }
        Ok(self.outputs.back().as_slice())
    }

    /// Adds the current hidden-layer outputs into the sparsity accumulator.
    pub fn compute_hidden_sums(&mut self) {
        if let Some(hidden) = self.hidden_layer() {
            for (sum, output) in self.hidden_sums.iter_mut().zip(&self.outputs[hidden]) {
                *sum += output;
            }
        }
    }

    /// Runs every input forward, then stores the mean activation of each
    /// hidden neuron and resets the accumulator.
    pub fn measure_hidden_activation<I: AsRef<[f64]>>(&mut self, inputs: &[I]) -> Result<&[f64]> {
        if inputs.is_empty() {
            return Err(AutoencoderError::invalid_input("cannot average over an empty data set"));
        }
        for input in inputs {
            self.run_input(input.as_ref())?;
            self.compute_hidden_sums();
        }
        let count = inputs.len() as f64;
        for (avg, sum) in self.avg_hidden_activation.iter_mut().zip(&self.hidden_sums) {
            *avg = sum / count;
        }
        self.hidden_sums.zero_out();
        Ok(self.avg_hidden_activation.as_slice())
    }

    /// Backpropagates the difference between `target` and the last forward
    /// pass, filling in every neuron's error and delta.
    ///
    /// With `sparsity` set, the hidden layer's deltas include the sparsity
    /// penalty computed from the last measured mean activations.
    pub fn calculate_deltas(&mut self, target: &[f64], sparsity: Option<&Sparsity>) -> Result<()> {
        if target.len() != self.output_len() {
            return Err(AutoencoderError::size_mismatch("target", self.output_len(), target.len()));
        }
        let output_layer = self.output_layer();
        let sparse_layer = sparsity.and(self.hidden_layer());
        for layer in (0..=output_layer).rev() {
            for node in 0..self.sizes[layer] {
                let output = self.outputs[layer][node];
                let error = if layer == output_layer {
                    target[node] - output
                } else {
                    let next = &self.weights[layer + 1];
                    self.deltas[layer + 1]
                        .iter()
                        .enumerate()
                        .map(|(k, delta)| delta * next.get(k, node))
                        .sum()
                };
                self.errors[layer][node] = error;
                self.deltas[layer][node] = match sparsity {
                    Some(sparsity) if sparse_layer == Some(layer) => {
                        sparsity.delta(error, output, self.avg_hidden_activation[node])
                    }
                    _ => error * sigmoid_prime(output),
                };
            }
        }
        Ok(())
    }

    /// Applies one gradient step with momentum to every weight, and a plain
    /// gradient step to every bias.
    pub fn adjust_weights(&mut self, step: StepSize) {
        for layer in 1..self.sizes.len() {
            let incoming = &self.outputs[layer - 1];
            for node in 0..self.sizes[layer] {
                let delta = self.deltas[layer][node];
                let weights = self.weights[layer].row_mut(node);
                let changes = self.changes[layer].row_mut(node);
                for (weight, change, x) in izip!(weights.iter_mut(), changes.iter_mut(), incoming) {
                    *change = step.learning_rate * delta * x + step.momentum * *change;
                    *weight += *change;
                }
                self.biases[layer][node] += step.learning_rate * delta;
            }
        }
    }

    /// Runs one full forward/backward/update cycle, returning the mean square
    /// error of the output layer before the update.
    pub fn train_pattern(
        &mut self,
        input: &[f64],
        target: &[f64],
        step: StepSize,
        sparsity: Option<&Sparsity>,
    ) -> Result<f64> {
        self.run_input(input)?;
        self.calculate_deltas(target, sparsity)?;
        self.adjust_weights(step);
        Ok(mean_square_error(self.errors.back()))
    }
}

fn validate_sizes(sizes: &[usize]) -> Result<()> {
    if sizes.len() < 2 {
        return Err(AutoencoderError::InvalidTopology(format!(
            "need at least an input and an output layer, got {} layer(s)",
            sizes.len()
        )));
    }
    if let Some(layer) = sizes.iter().position(|&n| n == 0) {
        return Err(AutoencoderError::InvalidTopology(format!("layer {} is empty", layer)));
    }
    Ok(())
}
