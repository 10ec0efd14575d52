//! Tests for the application configuration loader

use crate::core::config_loader::*;
use crate::core::unified_error::{ConfigErrorType, UnifiedError};
use rstest::*;
use std::io::Write;
use std::path::PathBuf;

fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    (dir, path)
}

const MINIMAL: &str = r#"{
    "encoder_model_id": "vinai/bertweet-base",
    "train_data_path": "data/train.jsonl",
    "eval_data_path": "data/eval.jsonl"
}"#;

#[rstest]
fn test_minimal_config_applies_defaults() {
    let (_dir, path) = write_config(MINIMAL);
    let config = AppConfig::load(&path).unwrap();

    assert_eq!(config.encoder_model_id, "vinai/bertweet-base");
    assert_eq!(config.model_variant, ModelVariant::CnnLstm);
    assert_eq!(config.model.cnn_out_channels, 100);
    assert_eq!(config.model.lstm_hidden_size, 256);
    assert_eq!(config.max_seq_len, 128);
    assert!(!config.use_cpu);
    assert!(!config.load_checkpoint);
    assert!(config.checkpoint_path.is_none());
    assert_eq!(config.training.epochs, 3);
    assert_eq!(config.training.seed, 42);
}

#[rstest]
fn test_full_config_overrides_defaults() {
    let (_dir, path) = write_config(
        r#"{
        "encoder_model_id": "vinai/bertweet-base",
        "model_variant": "cnn_bilstm_attn",
        "cnn_out_channels": 64,
        "lstm_hidden_size": 128,
        "max_seq_len": 96,
        "use_cpu": true,
        "checkpoint_path": "checkpoints/head.safetensors",
        "load_checkpoint": true,
        "train_data_path": "data/train.jsonl",
        "eval_data_path": "data/eval.jsonl",
        "training": { "learning_rate": 0.001, "epochs": 5 }
    }"#,
    );
    let config = AppConfig::load(&path).unwrap();

    assert_eq!(config.model_variant, ModelVariant::CnnBilstmAttn);
    assert_eq!(config.model.cnn_out_channels, 64);
    assert_eq!(config.model.lstm_hidden_size, 128);
    assert!(config.use_cpu);
    assert!(config.load_checkpoint);
    assert_eq!(
        config.checkpoint_path.as_deref(),
        Some("checkpoints/head.safetensors")
    );
    assert!((config.training.learning_rate - 0.001).abs() < 1e-12);
    assert_eq!(config.training.epochs, 5);
    // Unset training fields keep their defaults.
    assert_eq!(config.training.batch_size, 16);
}

#[rstest]
fn test_nonexistent_file_is_a_configuration_error() {
    let err = AppConfig::load(std::path::Path::new("/nonexistent/config.json")).unwrap_err();
    assert!(matches!(
        err,
        UnifiedError::Configuration {
            source: ConfigErrorType::FileNotFound(_),
            ..
        }
    ));
}

#[rstest]
fn test_malformed_json_is_a_parse_error() {
    let (_dir, path) = write_config("{ not json");
    let err = AppConfig::load(&path).unwrap_err();
    assert!(matches!(
        err,
        UnifiedError::Configuration {
            source: ConfigErrorType::ParseError(_),
            ..
        }
    ));
}

#[rstest]
#[case::missing_encoder(r#"{"train_data_path": "t", "eval_data_path": "e"}"#)]
#[case::missing_train(r#"{"encoder_model_id": "m", "eval_data_path": "e"}"#)]
#[case::missing_eval(r#"{"encoder_model_id": "m", "train_data_path": "t"}"#)]
fn test_missing_required_key_fails(#[case] content: &str) {
    let (_dir, path) = write_config(content);
    assert!(AppConfig::load(&path).is_err());
}

#[rstest]
fn test_load_checkpoint_without_path_fails() {
    let (_dir, path) = write_config(
        r#"{
        "encoder_model_id": "m",
        "load_checkpoint": true,
        "train_data_path": "t",
        "eval_data_path": "e"
    }"#,
    );
    let err = AppConfig::load(&path).unwrap_err();
    assert!(matches!(
        err,
        UnifiedError::Configuration {
            source: ConfigErrorType::MissingField(field),
            ..
        } if field == "checkpoint_path"
    ));
}

#[rstest]
#[case::zero_channels(r#""cnn_out_channels": 0"#, "cnn_out_channels")]
#[case::zero_hidden(r#""lstm_hidden_size": 0"#, "lstm_hidden_size")]
#[case::zero_seq_len(r#""max_seq_len": 0"#, "max_seq_len")]
fn test_zero_dimensions_fail_validation(#[case] override_key: &str, #[case] field_name: &str) {
    let content = format!(
        r#"{{
        "encoder_model_id": "m",
        {},
        "train_data_path": "t",
        "eval_data_path": "e"
    }}"#,
        override_key
    );
    let (_dir, path) = write_config(&content);
    let err = AppConfig::load(&path).unwrap_err();
    assert!(matches!(
        err,
        UnifiedError::Validation { field, .. } if field == field_name
    ));
}

#[rstest]
fn test_unknown_model_variant_fails() {
    let (_dir, path) = write_config(
        r#"{
        "encoder_model_id": "m",
        "model_variant": "transformer_xl",
        "train_data_path": "t",
        "eval_data_path": "e"
    }"#,
    );
    assert!(AppConfig::load(&path).is_err());
}
