//! Translation between label-keyed records and dense vectors.

use crate::data::Record;
use crate::error::{AutoencoderError, Result};

use std::collections::HashMap;

/// A bidirectional mapping between labels and vector indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Lookup {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl Lookup {
    /// Builds a lookup covering every label found in `records`.
    ///
    /// Labels are numbered in order of first appearance, scanning the records
    /// in order and the keys of each record in sorted order.
    pub fn build<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut lookup = Lookup::default();
        for record in records {
            for label in record.keys() {
                if !lookup.index.contains_key(label) {
                    lookup.push(label.clone());
                }
            }
        }
        lookup
    }

    /// Builds a lookup from the keys of a serialized layer, in order.
    pub fn from_keys<I, S>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut lookup = Lookup::default();
        for key in keys {
            let key = key.into();
            if lookup.index.contains_key(&key) {
                return Err(AutoencoderError::format(format!("duplicate label '{}'", key)));
            }
            lookup.push(key);
        }
        Ok(lookup)
    }

    fn push(&mut self, label: String) {
        self.index.insert(label.clone(), self.labels.len());
        self.labels.push(label);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels ordered by index.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Converts `record` to a dense vector. Labels the lookup has never seen
    /// are dropped and missing labels become zero.
    pub fn to_array(&self, record: &Record) -> Vec<f64> {
        let mut values = vec![0.0; self.labels.len()];
        for (label, &value) in record {
            if let Some(i) = self.index_of(label) {
                values[i] = value;
            }
        }
        values
    }

    /// Converts a dense vector back to a record keyed by label.
    pub fn to_record(&self, values: &[f64]) -> Result<Record> {
        if values.len() != self.labels.len() {
            return Err(AutoencoderError::size_mismatch("labeled vector", self.labels.len(), values.len()));
        }
        Ok(self.labels.iter().cloned().zip(values.iter().copied()).collect())
    }
}
