//! # Training
//!
//! The train-and-predict collaborator: optimizer loop, per-epoch
//! evaluation and final head checkpointing.

pub mod trainer;

pub use trainer::{train_and_predict, TrainReport};

// Test modules (only compiled in test builds)
#[cfg(test)]
pub mod trainer_test;
