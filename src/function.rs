//! Standalone inference over a serialized model.

use crate::activator::sigmoid;
use crate::data::Record;
use crate::error::{AutoencoderError, Result};
use crate::json::ModelJson;

/// Runs a [`ModelJson`] snapshot directly, without an
/// [`Autoencoder`](crate::Autoencoder).
///
/// Every layer computes `sigmoid(bias + Σ weight·input)` for each of its
/// nodes, reading inputs by the key of the node they come from.
#[derive(Clone, Debug, PartialEq)]
pub struct StandaloneFunction {
    net: ModelJson,
}

impl StandaloneFunction {
    /// Wraps `net`, which must pass [`ModelJson::validate`].
    pub fn new(net: ModelJson) -> Result<Self> {
        net.validate()?;
        Ok(StandaloneFunction { net })
    }

    /// The snapshot this function evaluates.
    pub fn snapshot(&self) -> &ModelJson {
        &self.net
    }

    /// Keys of the input layer, in order.
    pub fn input_keys(&self) -> impl Iterator<Item = &str> {
        self.net.layers[0].keys()
    }

    /// Evaluates the network on `input`, keyed like the input layer. Missing
    /// keys read as zero.
    pub fn call(&self, input: &Record) -> Record {
        let mut current = input.clone();
        for layer in &self.net.layers[1..] {
            let mut output = Record::new();
            for (id, node) in layer.iter() {
                let mut sum = node.bias.unwrap_or(0.0);
                if let Some(weights) = &node.weights {
                    for (iid, weight) in weights.iter() {
                        sum += weight * current.get(iid).copied().unwrap_or(0.0);
                    }
                }
                output.insert(id.to_string(), sigmoid(sum));
            }
            current = output;
        }
        current
    }

    /// Evaluates the network on a dense input, returning the output layer in
    /// node order.
    pub fn call_dense(&self, input: &[f64]) -> Result<Vec<f64>> {
        let first = &self.net.layers[0];
        if input.len() != first.len() {
            return Err(AutoencoderError::size_mismatch("input", first.len(), input.len()));
        }
        let record: Record = first.keys().map(str::to_string).zip(input.iter().copied()).collect();
        let output = self.call(&record);
        let last = &self.net.layers[self.net.layers.len() - 1];
        Ok(last.keys().map(|key| output.get(key).copied().unwrap_or(0.0)).collect())
    }

    /// Turns this function into a plain closure owning its snapshot.
    pub fn into_fn(self) -> impl Fn(&Record) -> Record {
        move |input| self.call(input)
    }
}
