//! The persisted model format.
//!
//! A model serializes to
//!
//! ```json
//! {
//!   "layers": [
//!     { "x": {}, "y": {} },
//!     { "0": { "bias": -0.98, "weights": { "x": 0.83, "y": 1.24 } },
//!       "1": { "bias": 3.48, "weights": { "x": 1.78, "y": -2.67 } } },
//!     { "f": { "bias": 0.27, "weights": { "0": 1.31, "1": 2.00 } } }
//!   ]
//! }
//! ```
//!
//! Input and output nodes are keyed by label when the model was trained on
//! labeled data and by index otherwise. Key order is significant: it fixes
//! the position of every node in its layer.

use crate::error::{AutoencoderError, Result};

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// A string-keyed map that remembers insertion order.
#[derive(Clone, Debug)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        OrderedMap {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Appends `key`, failing if it is already present.
    pub fn insert(&mut self, key: String, value: V) -> Result<()> {
        if self.index.contains_key(&key) {
            return Err(AutoencoderError::format(format!("duplicate key '{}'", key)));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: PartialEq> PartialEq for OrderedMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct OrderedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map with string keys")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let mut map = OrderedMap::new();
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            map.insert(key, value).map_err(<A::Error as de::Error>::custom)?;
        }
        Ok(map)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// One neuron. Input-layer nodes carry neither field.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bias: Option<f64>,
    /// Incoming weights keyed by the predecessor node's key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<OrderedMap<f64>>,
}

/// Nodes of a single layer, in order.
pub type LayerJson = OrderedMap<NodeJson>;

/// A complete serialized model.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelJson {
    pub layers: Vec<LayerJson>,
}

impl ModelJson {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that every non-input node has a bias and exactly one weight per
    /// node of the previous layer.
    pub fn validate(&self) -> Result<()> {
        if self.layers.len() < 2 {
            return Err(AutoencoderError::format(format!(
                "expected at least 2 layers, found {}",
                self.layers.len()
            )));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.is_empty() {
                return Err(AutoencoderError::format(format!("layer {} has no nodes", i)));
            }
            if i == 0 {
                continue;
            }
            let previous = &self.layers[i - 1];
            for (id, node) in layer.iter() {
                node_weights(i, id, node, previous)?;
            }
        }
        Ok(())
    }
}

/// Returns the bias of `node` and its weights ordered like `previous`.
pub(crate) fn node_weights(layer: usize, id: &str, node: &NodeJson, previous: &LayerJson) -> Result<(f64, Vec<f64>)> {
    let bias = node
        .bias
        .ok_or_else(|| AutoencoderError::format(format!("node '{}' in layer {} has no bias", id, layer)))?;
    let weights = node
        .weights
        .as_ref()
        .ok_or_else(|| AutoencoderError::format(format!("node '{}' in layer {} has no weights", id, layer)))?;
    if weights.len() != previous.len() {
        return Err(AutoencoderError::format(format!(
            "node '{}' in layer {} has {} weights for {} inputs",
            id,
            layer,
            weights.len(),
            previous.len()
        )));
    }
    let row = previous
        .keys()
        .map(|key| {
            weights.get(key).copied().ok_or_else(|| {
                AutoencoderError::format(format!(
                    "node '{}' in layer {} has no weight for input '{}'",
                    id, layer, key
                ))
            })
        })
        .collect::<Result<Vec<f64>>>()?;
    Ok((bias, row))
}

/// True if the keys are exactly "0", "1", ... in order.
pub(crate) fn has_index_keys(layer: &LayerJson) -> bool {
    layer.keys().enumerate().all(|(i, key)| key == i.to_string())
}
