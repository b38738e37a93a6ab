//! Training and inference data.
//!
//! A [`Vector`] is either a dense list of numbers or a sparse, label-keyed
//! [`Record`]. In JSON the two are distinguished by shape alone: an array is
//! dense and an object is labeled.

use std::collections::BTreeMap;

/// A label-keyed feature vector. Missing labels read as zero.
pub type Record = BTreeMap<String, f64>;

/// Network input or output in either representation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Vector {
    Dense(Vec<f64>),
    Labeled(Record),
}

impl Vector {
    pub fn as_dense(&self) -> Option<&[f64]> {
        match self {
            Vector::Dense(values) => Some(values.as_slice()),
            Vector::Labeled(_) => None,
        }
    }

    pub fn as_labeled(&self) -> Option<&Record> {
        match self {
            Vector::Labeled(record) => Some(record),
            Vector::Dense(_) => None,
        }
    }

    pub fn is_labeled(&self) -> bool {
        matches!(self, Vector::Labeled(_))
    }

    /// Builds a labeled vector from `(label, value)` pairs.
    pub fn labeled<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Vector::Labeled(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<Vec<f64>> for Vector {
    fn from(values: Vec<f64>) -> Self {
        Vector::Dense(values)
    }
}

impl<'a> From<&'a [f64]> for Vector {
    fn from(values: &'a [f64]) -> Self {
        Vector::Dense(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Vector {
    fn from(values: [f64; N]) -> Self {
        Vector::Dense(values.to_vec())
    }
}

impl From<Record> for Vector {
    fn from(record: Record) -> Self {
        Vector::Labeled(record)
    }
}

/// A single labelled training example.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub input: Vector,
    pub output: Vector,
}

impl Example {
    pub fn new<I: Into<Vector>, O: Into<Vector>>(input: I, output: O) -> Self {
        Example {
            input: input.into(),
            output: output.into(),
        }
    }

    /// An example whose expected output is its own input.
    pub fn autoencode<I: Into<Vector>>(input: I) -> Self {
        let input = input.into();
        Example {
            output: input.clone(),
            input,
        }
    }
}
