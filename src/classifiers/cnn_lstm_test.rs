//! Tests for the Conv1d + LSTM classifier

use crate::classifiers::cnn_lstm::CnnLstmClassifier;
use crate::core::config_loader::ModelConfig;
use crate::model_architectures::init::{apply_xavier_uniform, LayerKind};
use crate::model_architectures::traits::{TextClassifier, NUM_CLASSES};
use crate::test_fixtures::{fixture_encoder, input_batch, FixtureEncoder};
use candle_core::Device;
use candle_nn::VarMap;
use rstest::*;

fn small_classifier() -> CnnLstmClassifier<FixtureEncoder> {
    let device = Device::Cpu;
    let varmap = VarMap::new();
    let config = ModelConfig {
        cnn_out_channels: 12,
        lstm_hidden_size: 16,
    };
    let model = CnnLstmClassifier::new(fixture_encoder(), &config, &varmap, &device).unwrap();
    apply_xavier_uniform(&varmap, &model.layer_specs()).unwrap();
    model
}

#[rstest]
#[case(1, 1)]
#[case(2, 4)]
#[case(4, 16)]
#[case(3, 33)]
fn test_logits_shape_is_batch_by_two(#[case] batch: usize, #[case] seq_len: usize) {
    let model = small_classifier();
    let (input_ids, attention_mask) = input_batch(batch, seq_len, &Device::Cpu);

    let logits = model.forward(&input_ids, &attention_mask, false).unwrap();
    assert_eq!(logits.dims(), &[batch, NUM_CLASSES]);
}

#[rstest]
fn test_sequence_length_never_changes_output_width() {
    let model = small_classifier();
    for seq_len in [1usize, 8, 24] {
        let (input_ids, attention_mask) = input_batch(2, seq_len, &Device::Cpu);
        let logits = model.forward(&input_ids, &attention_mask, false).unwrap();
        assert_eq!(logits.dims()[1], NUM_CLASSES);
    }
}

#[rstest]
fn test_evaluation_is_bit_identical_across_runs() {
    let model = small_classifier();
    let (input_ids, attention_mask) = input_batch(4, 16, &Device::Cpu);

    let first: Vec<f32> = model
        .forward(&input_ids, &attention_mask, false)
        .unwrap()
        .flatten_all()
        .unwrap()
        .to_vec1()
        .unwrap();
    let second: Vec<f32> = model
        .forward(&input_ids, &attention_mask, false)
        .unwrap()
        .flatten_all()
        .unwrap()
        .to_vec1()
        .unwrap();

    assert_eq!(first, second);
    assert!(first.iter().all(|v| v.is_finite()));
}

#[rstest]
fn test_layer_specs_cover_the_trainable_head() {
    let model = small_classifier();
    let specs = model.layer_specs();

    assert_eq!(specs.len(), 3);
    assert!(specs
        .iter()
        .any(|s| s.kind == LayerKind::Conv1d && s.prefix == "cnn"));
    assert!(specs
        .iter()
        .any(|s| s.kind == LayerKind::Lstm && s.prefix == "lstm"));
    assert!(specs
        .iter()
        .any(|s| s.kind == LayerKind::Linear && s.prefix == "classifier"));
}

#[rstest]
fn test_head_parameters_land_in_the_varmap() {
    let device = Device::Cpu;
    let varmap = VarMap::new();
    let config = ModelConfig {
        cnn_out_channels: 12,
        lstm_hidden_size: 16,
    };
    let _model = CnnLstmClassifier::new(fixture_encoder(), &config, &varmap, &device).unwrap();

    let data = varmap.data().lock().unwrap();
    for name in [
        "cnn.weight",
        "cnn.bias",
        "lstm.weight_ih_l0",
        "lstm.weight_hh_l0",
        "lstm.bias_ih_l0",
        "lstm.bias_hh_l0",
        "classifier.weight",
        "classifier.bias",
    ] {
        assert!(data.contains_key(name), "missing parameter {}", name);
    }
}
