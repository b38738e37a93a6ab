//! A feedforward sigmoid autoencoder with an optional sparsity penalty.
//!
//! See the [`autoencoder`] module for an example.

#[macro_use]
extern crate serde_derive;

pub mod activator;
pub mod autoencoder;
pub mod config;
pub mod data;
pub mod error;
pub mod function;
pub mod json;
pub mod lookup;
pub mod network;
pub mod sparsity;
pub mod trainer;

mod matrix;
mod utils;

pub use crate::autoencoder::Autoencoder;
pub use crate::config::Config;
pub use crate::data::{Example, Record, Vector};
pub use crate::error::{AutoencoderError, Result};
pub use crate::function::StandaloneFunction;
pub use crate::json::{ModelJson, NodeJson};
pub use crate::lookup::Lookup;
pub use crate::matrix::Mat;
pub use crate::network::{NetworkState, StepSize};
pub use crate::sparsity::{Sparsity, SparsityGradient};
pub use crate::trainer::{Logging, TrainingOptions, TrainingStatus};
