//! # Dataset Preparation
//!
//! JSON-lines dataset loading and batch collation for the training loop.

pub mod dataset;

pub use dataset::{prepare_datasets, Batch, Collator, Example, LabeledDataset};
