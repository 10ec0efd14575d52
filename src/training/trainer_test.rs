//! Tests for the training loop

use crate::classifiers::cnn_lstm::CnnLstmClassifier;
use crate::core::config_loader::{ModelConfig, TrainConfig};
use crate::core::tokenization::BatchTokenizer;
use crate::data::dataset::{Collator, Example, LabeledDataset};
use crate::model_architectures::init::apply_xavier_uniform;
use crate::model_architectures::traits::TextClassifier;
use crate::test_fixtures::{fixture_encoder, word_level_tokenizer};
use crate::training::trainer::train_and_predict;
use candle_core::Device;
use candle_nn::VarMap;
use rstest::*;

fn toy_dataset() -> LabeledDataset {
    let records = [
        ("good", 1u32),
        ("great", 1),
        ("fine", 1),
        ("bad", 0),
        ("awful", 0),
        ("poor", 0),
    ];
    LabeledDataset::from_examples(
        records
            .iter()
            .map(|(text, label)| Example {
                text: text.to_string(),
                label: *label,
            })
            .collect(),
    )
}

#[rstest]
fn test_train_and_predict_completes_and_saves_the_head() {
    let device = Device::Cpu;
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("head.safetensors");

    let varmap = VarMap::new();
    let config = ModelConfig {
        cnn_out_channels: 8,
        lstm_hidden_size: 8,
    };
    let model = CnnLstmClassifier::new(fixture_encoder(), &config, &varmap, &device).unwrap();
    apply_xavier_uniform(&varmap, &model.layer_specs()).unwrap();

    let tokenizer = BatchTokenizer::new(word_level_tokenizer(), 8, device.clone()).unwrap();
    let collator = Collator::new(tokenizer);
    let train = toy_dataset();
    let eval = toy_dataset();

    let train_config = TrainConfig {
        learning_rate: 1e-2,
        weight_decay: 0.0,
        batch_size: 2,
        epochs: 2,
        seed: 7,
        output_path: output_path.to_string_lossy().to_string(),
    };

    let report = train_and_predict(&model, &varmap, &train, &eval, &collator, &train_config)
        .unwrap();

    assert_eq!(report.epoch_train_loss.len(), 2);
    assert!(report.epoch_train_loss.iter().all(|l| l.is_finite()));
    assert!(report.eval_loss.is_finite());
    assert!((0.0..=1.0).contains(&report.eval_accuracy));
    assert_eq!(report.predictions.len(), eval.len());
    assert!(report.predictions.iter().all(|&p| p < 2));
    assert!(output_path.exists());
}

#[rstest]
fn test_training_changes_the_head_parameters() {
    let device = Device::Cpu;
    let dir = tempfile::tempdir().unwrap();

    let varmap = VarMap::new();
    let config = ModelConfig {
        cnn_out_channels: 8,
        lstm_hidden_size: 8,
    };
    let model = CnnLstmClassifier::new(fixture_encoder(), &config, &varmap, &device).unwrap();
    apply_xavier_uniform(&varmap, &model.layer_specs()).unwrap();

    let before: Vec<f32> = {
        let data = varmap.data().lock().unwrap();
        data.get("classifier.weight")
            .unwrap()
            .as_tensor()
            .flatten_all()
            .unwrap()
            .to_vec1()
            .unwrap()
    };

    let tokenizer = BatchTokenizer::new(word_level_tokenizer(), 8, device.clone()).unwrap();
    let collator = Collator::new(tokenizer);
    let train = toy_dataset();
    let eval = toy_dataset();
    let train_config = TrainConfig {
        learning_rate: 1e-2,
        weight_decay: 0.0,
        batch_size: 3,
        epochs: 1,
        seed: 11,
        output_path: dir
            .path()
            .join("head.safetensors")
            .to_string_lossy()
            .to_string(),
    };

    train_and_predict(&model, &varmap, &train, &eval, &collator, &train_config).unwrap();

    let after: Vec<f32> = {
        let data = varmap.data().lock().unwrap();
        data.get("classifier.weight")
            .unwrap()
            .as_tensor()
            .flatten_all()
            .unwrap()
            .to_vec1()
            .unwrap()
    };
    assert_ne!(before, after, "optimizer steps must update the classifier");
}
