//! Application Configuration Loader
//!
//! Loads and validates the JSON configuration file that drives model
//! assembly, checkpoint restoration, dataset preparation and training.

use crate::core::unified_error::{config_errors, UnifiedError, UnifiedResult};
use serde::Deserialize;
use std::path::Path;

/// Which classifier head to assemble on top of the frozen encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelVariant {
    /// Conv1d feature extractor followed by a unidirectional LSTM,
    /// classifying from the final timestep.
    #[default]
    CnnLstm,
    /// Conv1d feature extractor, bidirectional LSTM, attention pooling,
    /// dropout and layer normalization.
    CnnBilstmAttn,
}

/// Dimensions of the trainable head.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_cnn_out_channels")]
    pub cnn_out_channels: usize,
    #[serde(default = "default_lstm_hidden_size")]
    pub lstm_hidden_size: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            cnn_out_channels: default_cnn_out_channels(),
            lstm_hidden_size: default_lstm_hidden_size(),
        }
    }
}

/// Optimizer and loop settings for the training collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainConfig {
    #[serde(default = "default_lr")]
    pub learning_rate: f64,
    #[serde(default = "default_weight_decay")]
    pub weight_decay: f64,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_epochs")]
    pub epochs: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_output_path")]
    pub output_path: String,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            learning_rate: default_lr(),
            weight_decay: default_weight_decay(),
            batch_size: default_batch_size(),
            epochs: default_epochs(),
            seed: default_seed(),
            output_path: default_output_path(),
        }
    }
}

/// Top-level application configuration.
///
/// `encoder_model_id` is either a local model directory (containing
/// `config.json`, `tokenizer.json` and weights) or a HuggingFace Hub id.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub encoder_model_id: String,
    #[serde(default)]
    pub model_variant: ModelVariant,
    #[serde(flatten)]
    pub model: ModelConfig,
    #[serde(default = "default_max_seq_len")]
    pub max_seq_len: usize,
    #[serde(default)]
    pub use_cpu: bool,
    #[serde(default)]
    pub checkpoint_path: Option<String>,
    #[serde(default)]
    pub load_checkpoint: bool,
    pub train_data_path: String,
    pub eval_data_path: String,
    #[serde(default)]
    pub training: TrainConfig,
}

fn default_cnn_out_channels() -> usize {
    100
}
fn default_lstm_hidden_size() -> usize {
    256
}
fn default_max_seq_len() -> usize {
    128
}
fn default_lr() -> f64 {
    2e-5
}
fn default_weight_decay() -> f64 {
    1e-2
}
fn default_batch_size() -> usize {
    16
}
fn default_epochs() -> usize {
    3
}
fn default_seed() -> u64 {
    42
}
fn default_output_path() -> String {
    "checkpoints/stance_head.safetensors".to_string()
}

impl AppConfig {
    /// Load and validate the configuration from a JSON file.
    pub fn load(path: &Path) -> UnifiedResult<Self> {
        let display_path = path.to_string_lossy();
        let content = std::fs::read_to_string(path)
            .map_err(|_e| config_errors::file_not_found(&display_path))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| config_errors::invalid_json(&display_path, &e.to_string()))?;

        config.validate(&display_path)?;
        Ok(config)
    }

    fn validate(&self, path: &str) -> UnifiedResult<()> {
        if self.encoder_model_id.is_empty() {
            return Err(config_errors::missing_field("encoder_model_id", path));
        }
        if self.model.cnn_out_channels == 0 {
            return Err(UnifiedError::Validation {
                field: "cnn_out_channels".to_string(),
                expected: "positive integer".to_string(),
                actual: "0".to_string(),
            });
        }
        if self.model.lstm_hidden_size == 0 {
            return Err(UnifiedError::Validation {
                field: "lstm_hidden_size".to_string(),
                expected: "positive integer".to_string(),
                actual: "0".to_string(),
            });
        }
        if self.max_seq_len == 0 {
            return Err(UnifiedError::Validation {
                field: "max_seq_len".to_string(),
                expected: "positive integer".to_string(),
                actual: "0".to_string(),
            });
        }
        // The checkpoint key itself is required as soon as restoration is
        // requested; whether the file exists is checked later at assembly
        // time and falls back to initialized weights if it does not.
        if self.load_checkpoint && self.checkpoint_path.is_none() {
            return Err(config_errors::missing_field("checkpoint_path", path));
        }
        if self.training.batch_size == 0 {
            return Err(UnifiedError::Validation {
                field: "training.batch_size".to_string(),
                expected: "positive integer".to_string(),
                actual: "0".to_string(),
            });
        }
        Ok(())
    }
}
