//! Frozen Pretrained Encoder
//!
//! Loads a BERT-family encoder from a local model directory or the
//! HuggingFace Hub, following Candle's official BERT loading pattern.
//! The encoder only ever runs in a frozen, no-gradient role: its weights
//! are loaded as plain tensors and its output is detached before any
//! trainable layer sees it.

use candle_core::{Device, Result, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config, HiddenAct, DTYPE};
use hf_hub::{api::sync::Api, Repo, RepoType};
use std::path::Path;

use crate::core::unified_error::{model_errors, UnifiedResult};
use crate::model_architectures::traits::SequenceEncoder;

/// Frozen BERT encoder plus the file layout it was resolved from.
pub struct BertEncoder {
    model: BertModel,
    hidden_size: usize,
    tokenizer_file: String,
    device: Device,
}

impl BertEncoder {
    /// Load the encoder named by `model_id` (local directory or Hub id).
    pub fn load(model_id: &str, device: &Device) -> UnifiedResult<Self> {
        if model_id.is_empty() {
            return Err(model_errors::encoder(
                "resolve model files",
                "empty encoder model id",
            ));
        }

        let (config_filename, tokenizer_filename, weights_filename, use_pth) =
            Self::resolve_model_files(model_id)?;

        let config = std::fs::read_to_string(&config_filename)
            .map_err(|e| model_errors::encoder("read encoder config", e))?;
        let mut config: Config = serde_json::from_str(&config)
            .map_err(|e| model_errors::encoder("parse encoder config", e))?;
        // Approximate GELU for better performance
        config.hidden_act = HiddenAct::GeluApproximate;

        let vb = if use_pth {
            VarBuilder::from_pth(&weights_filename, DTYPE, device)
        } else {
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_filename.clone()], DTYPE, device) }
        }
        .map_err(|e| model_errors::encoder("load encoder weights", e))?;

        let hidden_size = config.hidden_size;
        let model = BertModel::load(vb, &config)
            .map_err(|e| model_errors::encoder("build encoder", e))?;

        tracing::info!(model_id, hidden_size, "loaded frozen encoder");

        Ok(Self {
            model,
            hidden_size,
            tokenizer_file: tokenizer_filename,
            device: device.clone(),
        })
    }

    /// Path of the `tokenizer.json` resolved alongside the weights.
    pub fn tokenizer_file(&self) -> &str {
        &self.tokenizer_file
    }

    /// Resolve `config.json`, `tokenizer.json` and the weight file either
    /// from a local directory or the HuggingFace Hub. Safetensors are
    /// preferred, with a PyTorch weight fallback.
    fn resolve_model_files(model_id: &str) -> UnifiedResult<(String, String, String, bool)> {
        if Path::new(model_id).exists() {
            let config_path = Path::new(model_id).join("config.json");
            let tokenizer_path = Path::new(model_id).join("tokenizer.json");

            let (weights_path, use_pth) = if Path::new(model_id).join("model.safetensors").exists()
            {
                (
                    Path::new(model_id)
                        .join("model.safetensors")
                        .to_string_lossy()
                        .to_string(),
                    false,
                )
            } else if Path::new(model_id).join("pytorch_model.bin").exists() {
                (
                    Path::new(model_id)
                        .join("pytorch_model.bin")
                        .to_string_lossy()
                        .to_string(),
                    true,
                )
            } else {
                return Err(model_errors::encoder(
                    "resolve model files",
                    format!("no model weights found in {}", model_id),
                ));
            };

            Ok((
                config_path.to_string_lossy().to_string(),
                tokenizer_path.to_string_lossy().to_string(),
                weights_path,
                use_pth,
            ))
        } else {
            let repo =
                Repo::with_revision(model_id.to_string(), RepoType::Model, "main".to_string());

            let api = Api::new().map_err(|e| model_errors::encoder("open hub api", e))?;
            let api = api.repo(repo);
            let config = api
                .get("config.json")
                .map_err(|e| model_errors::encoder("fetch config.json", e))?;
            let tokenizer = api
                .get("tokenizer.json")
                .map_err(|e| model_errors::encoder("fetch tokenizer.json", e))?;

            let (weights, use_pth) = match api.get("model.safetensors") {
                Ok(weights) => (weights, false),
                Err(_) => (
                    api.get("pytorch_model.bin")
                        .map_err(|e| model_errors::encoder("fetch model weights", e))?,
                    true,
                ),
            };

            Ok((
                config.to_string_lossy().to_string(),
                tokenizer.to_string_lossy().to_string(),
                weights.to_string_lossy().to_string(),
                use_pth,
            ))
        }
    }
}

impl SequenceEncoder for BertEncoder {
    fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    fn device(&self) -> &Device {
        &self.device
    }

    fn encode(&self, input_ids: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self
            .model
            .forward(input_ids, &token_type_ids, Some(attention_mask))?;
        // Detaching here is what keeps the encoder frozen: the head's
        // gradients stop at this boundary.
        Ok(hidden.detach())
    }
}
