//! Assembly and entry flow.
//!
//! Wires configuration, encoder loading, head construction, weight
//! initialization, optional checkpoint restoration, dataset preparation
//! and the train-and-predict call. Nothing here runs at module load
//! time; callers invoke [`run`] explicitly.

use anyhow::Result;
use candle_core::Device;
use candle_nn::VarMap;
use std::path::Path;

use crate::classifiers::{CnnBiLstmAttnClassifier, CnnLstmClassifier};
use crate::core::config_loader::{AppConfig, ModelVariant};
use crate::core::tokenization::BatchTokenizer;
use crate::core::unified_error::UnifiedResult;
use crate::data::dataset::prepare_datasets;
use crate::model_architectures::checkpoint;
use crate::model_architectures::encoder::BertEncoder;
use crate::model_architectures::init::apply_xavier_uniform;
use crate::model_architectures::traits::TextClassifier;
use crate::training::trainer::train_and_predict;

/// Run the full assembly and training flow from a configuration file.
pub fn run(config_path: &Path) -> Result<()> {
    let config = AppConfig::load(config_path)?;
    let device = if config.use_cpu {
        Device::Cpu
    } else {
        Device::cuda_if_available(0)?
    };

    let encoder = BertEncoder::load(&config.encoder_model_id, &device)?;
    let tokenizer =
        BatchTokenizer::from_file(encoder.tokenizer_file(), config.max_seq_len, device.clone())?;

    let mut varmap = VarMap::new();
    let model: Box<dyn TextClassifier> = match config.model_variant {
        ModelVariant::CnnLstm => Box::new(CnnLstmClassifier::new(
            encoder,
            &config.model,
            &varmap,
            &device,
        )?),
        ModelVariant::CnnBilstmAttn => Box::new(CnnBiLstmAttnClassifier::new(
            encoder,
            &config.model,
            &varmap,
            &device,
        )?),
    };
    apply_xavier_uniform(&varmap, &model.layer_specs())?;

    maybe_restore(&mut varmap, &config)?;

    let (train, eval, collator) = prepare_datasets(&config, tokenizer)?;
    let report = train_and_predict(
        model.as_ref(),
        &varmap,
        &train,
        &eval,
        &collator,
        &config.training,
    )?;
    tracing::info!(
        eval_loss = report.eval_loss,
        eval_accuracy = report.eval_accuracy,
        "run complete"
    );
    Ok(())
}

/// Restore the head when restoration is requested and the checkpoint file
/// exists. A missing file is not an error: the run proceeds on freshly
/// initialized weights. Returns whether a restore happened.
pub(crate) fn maybe_restore(varmap: &mut VarMap, config: &AppConfig) -> UnifiedResult<bool> {
    if !config.load_checkpoint {
        return Ok(false);
    }
    match config.checkpoint_path.as_deref() {
        Some(path) if Path::new(path).exists() => {
            checkpoint::restore(varmap, path)?;
            tracing::info!(path, "model restored from checkpoint");
            Ok(true)
        }
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config_loader::{ModelConfig, TrainConfig};
    use candle_core::DType;
    use candle_nn::{Init, VarBuilder};

    fn config_with_checkpoint(load_checkpoint: bool, path: Option<&str>) -> AppConfig {
        AppConfig {
            encoder_model_id: "test-encoder".to_string(),
            model_variant: ModelVariant::CnnLstm,
            model: ModelConfig::default(),
            max_seq_len: 16,
            use_cpu: true,
            checkpoint_path: path.map(|p| p.to_string()),
            load_checkpoint,
            train_data_path: "train.jsonl".to_string(),
            eval_data_path: "eval.jsonl".to_string(),
            training: TrainConfig::default(),
        }
    }

    #[test]
    fn test_missing_checkpoint_path_falls_back_to_initialized_weights() {
        let mut varmap = VarMap::new();
        let config = config_with_checkpoint(true, Some("/nonexistent/stance_head.safetensors"));

        let restored = maybe_restore(&mut varmap, &config).unwrap();
        assert!(!restored);
    }

    #[test]
    fn test_restore_skipped_when_not_requested() {
        let mut varmap = VarMap::new();
        let config = config_with_checkpoint(false, Some("/nonexistent/stance_head.safetensors"));

        let restored = maybe_restore(&mut varmap, &config).unwrap();
        assert!(!restored);
    }

    #[test]
    fn test_restore_overwrites_parameters_in_place() {
        let device = Device::Cpu;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("head.safetensors");
        let path = path.to_string_lossy().to_string();

        // Save a head with known values.
        let saved = VarMap::new();
        let vb = VarBuilder::from_varmap(&saved, DType::F32, &device);
        vb.get_with_hints((2, 2), "classifier.weight", Init::Const(1.0))
            .unwrap();
        checkpoint::save(&saved, &path).unwrap();

        // A twin with different values picks up the saved ones.
        let mut varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let weight = vb
            .get_with_hints((2, 2), "classifier.weight", Init::Const(0.0))
            .unwrap();

        let config = config_with_checkpoint(true, Some(&path));
        let restored = maybe_restore(&mut varmap, &config).unwrap();
        assert!(restored);

        let values: Vec<f32> = weight.flatten_all().unwrap().to_vec1().unwrap();
        assert!(values.iter().all(|&v| (v - 1.0).abs() < f32::EPSILON));
    }
}
