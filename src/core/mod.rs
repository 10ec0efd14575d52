//! # Core Layer
//!
//! Configuration loading, tokenization and the crate-wide error type.

pub mod config_loader;
pub mod tokenization;
pub mod unified_error;

pub use config_loader::{AppConfig, ModelConfig, ModelVariant, TrainConfig};
pub use tokenization::BatchTokenizer;
pub use unified_error::{
    checkpoint_errors, config_errors, model_errors, processing_errors, ConfigErrorType,
    ModelErrorType, UnifiedError, UnifiedResult,
};

// Test modules (only compiled in test builds)
#[cfg(test)]
pub mod config_loader_test;
