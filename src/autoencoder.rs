//! A feedforward [autoencoder](https://en.wikipedia.org/wiki/Autoencoder)
//! trained with backpropagation, optionally with a sparsity penalty on its
//! hidden layer.
//!
//! # Example
//!
//! Let's teach a network to reproduce one-hot vectors through a narrower
//! hidden layer:
//!
//! ```
//! # use ::autoencoder::*;
//! let examples: Vec<Example> = (0..4)
//!     .map(|i| {
//!         let mut v = vec![0.0; 4];
//!         v[i] = 1.0;
//!         Example::autoencode(v)
//!     })
//!     .collect();
//!
//! // Train a network using those examples
//! let mut network = Autoencoder::new(Config::new().seed(1))?;
//! let status = network.train(&examples, &TrainingOptions::new())?;
//! assert!(status.error < 0.05);
//!
//! // The strongest output matches the hot input.
//! let out = network.run_input(&[0.0, 0.0, 1.0, 0.0])?;
//! assert!(out[2] > 0.5);
//! assert!(out[0] < 0.5 && out[1] < 0.5 && out[3] < 0.5);
//!
//! // The trained weights can be stored and restored.
//! let json = network.to_json()?.to_json_string()?;
//! let restored = Autoencoder::from_json(&ModelJson::from_json_str(&json)?)?;
//! assert_eq!(restored.sizes(), Some(&[4, 3, 4][..]));
//! # Ok::<(), AutoencoderError>(())
//! ```

use crate::config::Config;
use crate::data::{Example, Vector};
use crate::error::{AutoencoderError, Result};
use crate::function::StandaloneFunction;
use crate::json::{has_index_keys, node_weights, LayerJson, ModelJson, NodeJson, OrderedMap};
use crate::lookup::Lookup;
use crate::matrix::Mat;
use crate::network::{NetworkState, StepSize};
use crate::trainer::{train_network, TrainingOptions, TrainingStatus};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Dense training pairs plus the input and output lookups used to build them.
type FormattedData = (Vec<(Vec<f64>, Vec<f64>)>, Option<Lookup>, Option<Lookup>);

/// An autoencoder and everything it has learned.
///
/// The engine owns its network state, the label lookups established by the
/// first labeled training call, and the random number generator used to
/// initialize weights.
#[derive(Clone, Debug)]
pub struct Autoencoder {
    config: Config,
    network: Option<NetworkState>,
    input_lookup: Option<Lookup>,
    output_lookup: Option<Lookup>,
    rng: ChaCha8Rng,
}

impl Autoencoder {
    /// Creates a new, untrained autoencoder.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        Ok(Autoencoder {
            config,
            network: None,
            input_lookup: None,
            output_lookup: None,
            rng,
        })
    }

    /// Restores an autoencoder from a serialized model, using the default
    /// configuration for any further training.
    pub fn from_json(json: &ModelJson) -> Result<Self> {
        Self::from_json_with_config(json, Config::default())
    }

    pub fn from_json_with_config(json: &ModelJson, config: Config) -> Result<Self> {
        let mut autoencoder = Autoencoder::new(config)?;
        autoencoder.load_json(json)?;
        Ok(autoencoder)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The network state, once initialized.
    pub fn network(&self) -> Option<&NetworkState> {
        self.network.as_ref()
    }

    pub fn sizes(&self) -> Option<&[usize]> {
        self.network.as_ref().map(NetworkState::sizes)
    }

    pub fn input_lookup(&self) -> Option<&Lookup> {
        self.input_lookup.as_ref()
    }

    pub fn output_lookup(&self) -> Option<&Lookup> {
        self.output_lookup.as_ref()
    }

    /// Replaces the network with a freshly initialized one of the given
    /// layer sizes.
    pub fn initialize(&mut self, sizes: &[usize]) -> Result<()> {
        self.network = Some(NetworkState::new(sizes, &mut self.rng)?);
        Ok(())
    }

    /// Feeds `input` through the network.
    ///
    /// Labeled input is translated through the input lookup, and the output is
    /// labeled whenever an output lookup is registered.
    pub fn run(&mut self, input: &Vector) -> Result<Vector> {
        let dense = to_dense(self.input_lookup.as_ref(), input, "input")?;
        let output = self.run_input(&dense)?;
        match &self.output_lookup {
            Some(lookup) => Ok(Vector::Labeled(lookup.to_record(&output)?)),
            None => Ok(Vector::Dense(output)),
        }
    }

    /// Feeds a dense `input` through the network, returning the output layer.
    pub fn run_input(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        let network = self.network.as_mut().ok_or(AutoencoderError::Uninitialized)?;
        Ok(network.run_input(input)?.to_vec())
    }

    /// Trains a freshly initialized network on `data`.
    ///
    /// Input and output sizes come from the first example; hidden sizes from
    /// the configuration. Returns the final error and iteration count, which
    /// is also how non-convergence is reported.
    pub fn train(&mut self, data: &[Example], options: &TrainingOptions) -> Result<TrainingStatus> {
        self.train_with_callback(data, options, |_| {})
    }

    /// Like [`train`](Self::train), calling `callback` with the progress every
    /// `options.callback_period` iterations.
    pub fn train_with_callback<F>(
        &mut self,
        data: &[Example],
        options: &TrainingOptions,
        callback: F,
    ) -> Result<TrainingStatus>
    where
        F: FnMut(&TrainingStatus),
    {
        if data.is_empty() {
            return Err(AutoencoderError::invalid_input("cannot train on an empty data set"));
        }
        let (examples, input_lookup, output_lookup) = self.format_data(data)?;
        let input_len = examples[0].0.len();
        let output_len = examples[0].1.len();
        for (input, output) in &examples {
            if input.len() != input_len {
                return Err(AutoencoderError::size_mismatch("input", input_len, input.len()));
            }
            if output.len() != output_len {
                return Err(AutoencoderError::size_mismatch("output", output_len, output.len()));
            }
        }

        let sizes = self.config.topology(input_len, output_len);
        let mut network = NetworkState::new(&sizes, &mut self.rng)?;
        let step = StepSize {
            learning_rate: self.config.learning_rate,
            momentum: self.config.momentum,
        };
        let sparsity = self.config.sparsity();
        let status = train_network(&mut network, &examples, step, sparsity.as_ref(), options, callback)?;

        // Nothing is kept from a call that fails.
        self.input_lookup = input_lookup;
        self.output_lookup = output_lookup;
        self.network = Some(network);
        Ok(status)
    }

    /// Converts `data` to dense vectors along with the lookups to keep
    /// afterwards. Lookups are built the first time labeled data is seen and
    /// reused from then on.
    fn format_data(&self, data: &[Example]) -> Result<FormattedData> {
        let input_lookup = match &self.input_lookup {
            None if data.iter().any(|e| e.input.is_labeled()) => {
                Some(Lookup::build(data.iter().filter_map(|e| e.input.as_labeled())))
            }
            lookup => lookup.clone(),
        };
        let output_lookup = match &self.output_lookup {
            None if data.iter().any(|e| e.output.is_labeled()) => {
                Some(Lookup::build(data.iter().filter_map(|e| e.output.as_labeled())))
            }
            lookup => lookup.clone(),
        };
        let examples = data
            .iter()
            .map(|example| -> Result<(Vec<f64>, Vec<f64>)> {
                Ok((
                    to_dense(input_lookup.as_ref(), &example.input, "input")?,
                    to_dense(output_lookup.as_ref(), &example.output, "output")?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok((examples, input_lookup, output_lookup))
    }

    /// Serializes the network, keying input and output nodes by label when a
    /// lookup is registered.
    pub fn to_json(&self) -> Result<ModelJson> {
        let network = self.network.as_ref().ok_or(AutoencoderError::Uninitialized)?;
        let keys = (0..=network.output_layer())
            .map(|layer| self.node_keys(network, layer))
            .collect::<Result<Vec<_>>>()?;

        let mut layers = Vec::with_capacity(keys.len());
        for (layer, layer_keys) in keys.iter().enumerate() {
            let mut nodes = LayerJson::new();
            for (node, key) in layer_keys.iter().enumerate() {
                let entry = if layer == 0 {
                    NodeJson::default()
                } else {
                    let row = network.weights(layer).row(node);
                    let mut weights = OrderedMap::new();
                    for (predecessor, &weight) in keys[layer - 1].iter().zip(row) {
                        weights.insert(predecessor.clone(), weight)?;
                    }
                    NodeJson {
                        bias: Some(network.biases(layer)[node]),
                        weights: Some(weights),
                    }
                };
                nodes.insert(key.clone(), entry)?;
            }
            layers.push(nodes);
        }
        Ok(ModelJson { layers })
    }

    fn node_keys(&self, network: &NetworkState, layer: usize) -> Result<Vec<String>> {
        let size = network.sizes()[layer];
        let lookup = if layer == 0 {
            self.input_lookup.as_ref()
        } else if layer == network.output_layer() {
            self.output_lookup.as_ref()
        } else {
            None
        };
        match lookup {
            Some(lookup) if lookup.len() != size => {
                Err(AutoencoderError::size_mismatch("label lookup", size, lookup.len()))
            }
            Some(lookup) => Ok(lookup.labels().to_vec()),
            None => Ok((0..size).map(|i| i.to_string()).collect()),
        }
    }

    /// Replaces the network and lookups with those stored in `json`.
    ///
    /// Weights are matched to their inputs by key. Input or output layers not
    /// keyed `"0"`, `"1"`, ... are taken to be labeled.
    pub fn load_json(&mut self, json: &ModelJson) -> Result<()> {
        json.validate()?;
        let layers = &json.layers;
        let sizes: Vec<usize> = layers.iter().map(OrderedMap::len).collect();

        let mut weights = vec![Mat::zeros(0, 0)];
        let mut biases = vec![Vec::new()];
        for i in 1..layers.len() {
            let mut rows = Vec::with_capacity(sizes[i]);
            let mut layer_biases = Vec::with_capacity(sizes[i]);
            for (id, node) in layers[i].iter() {
                let (bias, row) = node_weights(i, id, node, &layers[i - 1])?;
                layer_biases.push(bias);
                rows.push(row);
            }
            let matrix = Mat::from_rows(rows, sizes[i - 1])
                .ok_or_else(|| AutoencoderError::format(format!("ragged weights in layer {}", i)))?;
            weights.push(matrix);
            biases.push(layer_biases);
        }
        let network = NetworkState::from_parameters(sizes, weights, biases)?;

        let first = &layers[0];
        let last = &layers[layers.len() - 1];
        self.input_lookup = label_lookup(first)?;
        self.output_lookup = label_lookup(last)?;
        self.network = Some(network);
        Ok(())
    }

    /// Packages the current weights into a function that runs without this
    /// autoencoder.
    pub fn to_function(&self) -> Result<StandaloneFunction> {
        StandaloneFunction::new(self.to_json()?)
    }
}

fn label_lookup(layer: &LayerJson) -> Result<Option<Lookup>> {
    if has_index_keys(layer) {
        Ok(None)
    } else {
        Lookup::from_keys(layer.keys()).map(Some)
    }
}

fn to_dense(lookup: Option<&Lookup>, vector: &Vector, what: &str) -> Result<Vec<f64>> {
    match (vector, lookup) {
        (Vector::Dense(values), _) => Ok(values.clone()),
        (Vector::Labeled(record), Some(lookup)) => Ok(lookup.to_array(record)),
        (Vector::Labeled(_), None) => Err(AutoencoderError::invalid_input(format!(
            "labeled {} given but no {} labels are registered",
            what, what
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;
    use crate::sparsity::SparsityGradient;

    fn one_hot(len: usize) -> Vec<Example> {
        (0..len)
            .map(|i| {
                let mut v = vec![0.0; len];
                v[i] = 1.0;
                Example::autoencode(v)
            })
            .collect()
    }

    fn colors() -> Vec<Example> {
        vec![
            Example::autoencode(Vector::labeled(vec![("red", 1.0), ("green", 0.0)])),
            Example::autoencode(Vector::labeled(vec![("green", 1.0), ("blue", 0.0)])),
            Example::autoencode(Vector::labeled(vec![("blue", 1.0)])),
        ]
    }

    fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
        a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum::<f64>().sqrt()
    }

    fn close(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-12)
    }

    #[test]
    fn run_before_training() {
        let mut net = Autoencoder::new(Config::default()).unwrap();
        assert!(matches!(net.run_input(&[1.0]), Err(AutoencoderError::Uninitialized)));
        assert!(matches!(net.to_json(), Err(AutoencoderError::Uninitialized)));
    }

    #[test]
    fn invalid_config() {
        assert!(Autoencoder::new(Config::new().learning_rate(-1.0)).is_err());
    }

    #[test]
    fn empty_data_set() {
        let mut net = Autoencoder::new(Config::default()).unwrap();
        assert!(matches!(
            net.train(&[], &TrainingOptions::default()),
            Err(AutoencoderError::InvalidInput(_))
        ));
    }

    #[test]
    fn inconsistent_example_sizes() {
        let mut net = Autoencoder::new(Config::default()).unwrap();
        let data = vec![Example::new([0.0, 1.0], [0.0, 1.0]), Example::new([1.0], [1.0, 0.0])];
        assert!(matches!(
            net.train(&data, &TrainingOptions::default()),
            Err(AutoencoderError::SizeMismatch { what: "input", .. })
        ));
    }

    #[test]
    fn outputs_are_sized_and_bounded() {
        let mut net = Autoencoder::new(Config::new().seed(3).hidden_layers(&[5, 2])).unwrap();
        let data = vec![Example::new([0.0, 1.0, 1.0], [1.0, 0.0]), Example::new([1.0, 0.0, 0.5], [0.0, 1.0])];
        net.train(&data, &TrainingOptions::new().iterations(100)).unwrap();
        assert_eq!(net.sizes(), Some(&[3, 5, 2, 2][..]));
        for input in &[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [-3.0, 2.0, 9.0]] {
            let out = net.run_input(input).unwrap();
            assert_eq!(out.len(), 2);
            assert!(out.iter().all(|&y| y > 0.0 && y < 1.0));
        }
        assert!(net.run_input(&[1.0, 0.0]).is_err());
    }

    #[test]
    fn learns_identity() {
        let data = one_hot(4);
        let mut short = Autoencoder::new(Config::new().seed(11)).unwrap();
        let first = short.train(&data, &TrainingOptions::new().iterations(1)).unwrap();

        let mut net = Autoencoder::new(Config::new().seed(11)).unwrap();
        let status = net.train(&data, &TrainingOptions::default()).unwrap();
        assert_eq!(net.sizes(), Some(&[4, 3, 4][..]));
        assert!(status.error < first.error);
        assert!(status.error <= 0.005, "error {} after {} iterations", status.error, status.iterations);
        assert!(status.iterations < 20_000);
    }

    #[test]
    fn two_pattern_scenario() {
        let config = Config::new().hidden_layers(&[2]).seed(3);
        let data = vec![Example::new([0.0, 1.0], [0.0, 1.0]), Example::new([1.0, 0.0], [1.0, 0.0])];

        let mut untrained = Autoencoder::new(config.clone()).unwrap();
        untrained.initialize(&[2, 2, 2]).unwrap();
        let before = untrained.run_input(&[0.0, 1.0]).unwrap();

        let mut net = Autoencoder::new(config).unwrap();
        net.train(&data, &TrainingOptions::new().iterations(1000)).unwrap();
        let after = net.run_input(&[0.0, 1.0]).unwrap();

        let to_target = euclidean_distance(&after, &[0.0, 1.0]);
        assert!(to_target < euclidean_distance(&after, &[1.0, 0.0]));
        assert!(to_target < euclidean_distance(&before, &[0.0, 1.0]));
    }

    #[test]
    fn zero_learning_rate_keeps_initial_weights() {
        let config = Config::new().learning_rate(0.0).seed(8);
        let data = one_hot(3);
        let mut fresh = Autoencoder::new(config.clone()).unwrap();
        fresh.initialize(&[3, 3, 3]).unwrap();
        let mut net = Autoencoder::new(config).unwrap();
        net.train(&data, &TrainingOptions::new().iterations(5)).unwrap();
        let (a, b) = (fresh.network().unwrap(), net.network().unwrap());
        for layer in 1..3 {
            assert_eq!(a.weights(layer), b.weights(layer));
            assert_eq!(a.biases(layer), b.biases(layer));
        }
    }

    #[test]
    fn json_round_trip() {
        let mut net = Autoencoder::new(Config::new().seed(21).hidden_layers(&[4, 3])).unwrap();
        net.train(&one_hot(5), &TrainingOptions::new().iterations(300)).unwrap();
        let json = net.to_json().unwrap();
        assert_eq!(json.layers.len(), 4);
        assert_eq!(json.layers[1].keys().collect::<Vec<_>>(), vec!["0", "1", "2", "3"]);

        let text = json.to_json_string().unwrap();
        let mut restored = Autoencoder::from_json(&ModelJson::from_json_str(&text).unwrap()).unwrap();
        assert_eq!(restored.sizes(), net.sizes());
        assert!(restored.input_lookup().is_none());
        for input in &[[1.0, 0.0, 0.0, 0.0, 0.0], [0.2, 0.4, 0.6, 0.8, 1.0], [0.0; 5]] {
            let a = net.run_input(input).unwrap();
            let b = restored.run_input(input).unwrap();
            assert!(close(&a, &b));
        }
    }

    #[test]
    fn labeled_training() {
        let mut net = Autoencoder::new(Config::new().seed(4)).unwrap();
        net.train(&colors(), &TrainingOptions::new().iterations(2000)).unwrap();
        assert_eq!(net.input_lookup().unwrap().labels(), &["green", "red", "blue"]);
        assert_eq!(net.sizes(), Some(&[3, 3, 3][..]));

        let out = net.run(&Vector::labeled(vec![("red", 1.0)])).unwrap();
        let record = out.as_labeled().unwrap();
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["blue", "green", "red"]);
        assert!(record["red"] > record["green"]);
        assert!(record["red"] > record["blue"]);

        // Dense input still works once lookups exist.
        assert!(net.run(&Vector::Dense(vec![0.0, 1.0, 0.0])).unwrap().is_labeled());
    }

    #[test]
    fn labeled_run_without_lookup() {
        let mut net = Autoencoder::new(Config::new().seed(4)).unwrap();
        net.train(&one_hot(3), &TrainingOptions::new().iterations(1)).unwrap();
        let result = net.run(&Vector::labeled(vec![("a", 1.0)]));
        assert!(matches!(result, Err(AutoencoderError::InvalidInput(_))));
    }

    #[test]
    fn failed_training_keeps_no_lookups() {
        let mut net = Autoencoder::new(Config::new().seed(4)).unwrap();
        let empty = vec![Example::new(Record::new(), Record::new())];
        assert!(matches!(
            net.train(&empty, &TrainingOptions::new().iterations(1)),
            Err(AutoencoderError::InvalidTopology(_))
        ));
        assert!(net.input_lookup().is_none());
        assert!(net.output_lookup().is_none());
        assert!(net.network().is_none());

        let data = vec![Example::autoencode(Vector::labeled(vec![("a", 1.0), ("b", 0.0)]))];
        net.train(&data, &TrainingOptions::new().iterations(5)).unwrap();
        assert_eq!(net.input_lookup().unwrap().labels(), &["a", "b"]);
        assert_eq!(net.sizes(), Some(&[2, 3, 2][..]));
    }

    #[test]
    fn failed_sparse_training_keeps_previous_network() {
        let config: Config = serde_json::from_str(r#"{"hiddenLayers": [], "makeSparse": true, "seed": 2}"#).unwrap();
        let mut net = Autoencoder::new(config).unwrap();
        net.initialize(&[3, 2, 3]).unwrap();
        let data = vec![Example::autoencode(Vector::labeled(vec![("x", 1.0)]))];
        assert!(matches!(
            net.train(&data, &TrainingOptions::new().iterations(5)),
            Err(AutoencoderError::InvalidTopology(_))
        ));
        assert_eq!(net.sizes(), Some(&[3, 2, 3][..]));
        assert!(net.input_lookup().is_none());
    }

    #[test]
    fn trains_without_hidden_layer() {
        let config: Config = serde_json::from_str(r#"{"hiddenLayers": [], "seed": 6}"#).unwrap();
        let mut net = Autoencoder::new(config).unwrap();
        let data = vec![Example::new([0.0, 1.0], [1.0]), Example::new([1.0, 0.0], [0.0])];
        let status = net.train(&data, &TrainingOptions::new().iterations(2000)).unwrap();
        assert_eq!(net.sizes(), Some(&[2, 1][..]));
        assert!(status.error < 0.05);
        assert!(net.run_input(&[0.0, 1.0]).unwrap()[0] > 0.5);
        assert!(net.run_input(&[1.0, 0.0]).unwrap()[0] < 0.5);

        let restored = Autoencoder::from_json(&net.to_json().unwrap()).unwrap();
        assert_eq!(restored.sizes(), Some(&[2, 1][..]));
    }

    #[test]
    fn labeled_json_round_trip() {
        let mut net = Autoencoder::new(Config::new().seed(6)).unwrap();
        net.train(&colors(), &TrainingOptions::new().iterations(200)).unwrap();
        let json = net.to_json().unwrap();
        assert_eq!(json.layers[0].keys().collect::<Vec<_>>(), vec!["green", "red", "blue"]);
        let node = json.layers[1].get("0").unwrap();
        assert_eq!(
            node.weights.as_ref().unwrap().keys().collect::<Vec<_>>(),
            vec!["green", "red", "blue"]
        );

        let mut restored = Autoencoder::from_json(&json).unwrap();
        assert_eq!(restored.input_lookup(), net.input_lookup());
        assert_eq!(restored.output_lookup(), net.output_lookup());
        let input = Vector::labeled(vec![("green", 1.0), ("blue", 0.5)]);
        assert_eq!(restored.run(&input).unwrap(), net.run(&input).unwrap());
    }

    #[test]
    fn labeled_and_dense_training_agree() {
        let options = TrainingOptions::new().iterations(50).error_threshold(0.0);
        let labeled = colors();
        let mut a = Autoencoder::new(Config::new().seed(13)).unwrap();
        a.train(&labeled, &options).unwrap();

        let (inputs, outputs) = (a.input_lookup().unwrap(), a.output_lookup().unwrap());
        let dense: Vec<Example> = labeled
            .iter()
            .map(|e| {
                Example::new(
                    inputs.to_array(e.input.as_labeled().unwrap()),
                    outputs.to_array(e.output.as_labeled().unwrap()),
                )
            })
            .collect();
        let mut b = Autoencoder::new(Config::new().seed(13)).unwrap();
        b.train(&dense, &options).unwrap();

        let (na, nb) = (a.network().unwrap(), b.network().unwrap());
        for layer in 1..3 {
            assert_eq!(na.weights(layer), nb.weights(layer));
            assert_eq!(na.biases(layer), nb.biases(layer));
        }
    }

    #[test]
    fn function_matches_run() {
        let mut net = Autoencoder::new(Config::new().seed(2)).unwrap();
        net.train(&colors(), &TrainingOptions::new().iterations(300)).unwrap();
        let function = net.to_function().unwrap();
        let input: Record = vec![("red".to_string(), 1.0), ("blue".to_string(), 0.25)].into_iter().collect();
        let expected = net.run(&Vector::Labeled(input.clone())).unwrap();
        let expected = expected.as_labeled().unwrap();
        let actual = function.call(&input);
        assert_eq!(actual.len(), expected.len());
        for (label, value) in expected {
            assert!((actual[label] - value).abs() < 1e-12);
        }
        // The function keeps working after the engine is retrained.
        net.train(&one_hot(2), &TrainingOptions::new().iterations(5)).unwrap();
        assert_eq!(function.call(&input), actual);
    }

    #[test]
    fn dense_function_matches_run_input() {
        let mut net = Autoencoder::new(Config::new().seed(2)).unwrap();
        net.train(&one_hot(4), &TrainingOptions::new().iterations(100)).unwrap();
        let function = net.to_function().unwrap();
        let input = [0.9, 0.1, 0.0, 0.3];
        assert!(close(&function.call_dense(&input).unwrap(), &net.run_input(&input).unwrap()));
    }

    #[test]
    fn malformed_json() {
        let json = ModelJson::from_json_str(
            r#"{"layers": [{"0": {}, "1": {}}, {"0": {"bias": 0.1, "weights": {"0": 0.5}}}]}"#,
        )
        .unwrap();
        assert!(matches!(Autoencoder::from_json(&json), Err(AutoencoderError::Format(_))));
    }

    #[test]
    fn sparse_training_tracks_hidden_activation() {
        let config = Config::new().seed(5).make_sparse(true).sparsity_gradient(SparsityGradient::Corrected);
        let mut net = Autoencoder::new(config).unwrap();
        let status = net.train(&one_hot(4), &TrainingOptions::new().iterations(500)).unwrap();
        assert!(status.error.is_finite());
        let avg = net.network().unwrap().avg_hidden_activation();
        assert_eq!(avg.len(), 3);
        assert!(avg.iter().all(|&a| a > 0.0 && a < 1.0));
    }

    #[test]
    fn legacy_sparse_training_stays_finite() {
        let config = Config::new().seed(5).make_sparse(true).sparsity_penalty(3.0);
        let mut net = Autoencoder::new(config).unwrap();
        let status = net.train(&one_hot(4), &TrainingOptions::new().iterations(300)).unwrap();
        assert!(status.error.is_finite());
        let out = net.run_input(&[1.0, 0.0, 0.0, 0.0]).unwrap();
        assert!(out.iter().all(|y| y.is_finite()));
    }

    #[test]
    fn callback_sees_progress() {
        let mut net = Autoencoder::new(Config::new().seed(1)).unwrap();
        let mut errors = Vec::new();
        let options = TrainingOptions::new().iterations(100).error_threshold(0.0).callback_period(25);
        net.train_with_callback(&one_hot(4), &options, |status| errors.push(status.error))
            .unwrap();
        assert_eq!(errors.len(), 4);
        assert!(errors[3] < errors[0]);
    }
}
