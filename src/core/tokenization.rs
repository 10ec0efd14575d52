//! Tokenization Core Module
//!
//! Thin wrapper around a `tokenizers::Tokenizer` that produces padded
//! batch tensors ready for the encoder: `input_ids` and `attention_mask`,
//! both `(batch, seq_len)` U32 tensors on the configured device.

use crate::core::unified_error::{model_errors, UnifiedResult};
use candle_core::{Device, Tensor};
use tokenizers::{
    PaddingParams, PaddingStrategy, Tokenizer, TruncationDirection, TruncationParams,
    TruncationStrategy,
};

/// Tokenizer configured for batch classification input.
#[derive(Debug)]
pub struct BatchTokenizer {
    tokenizer: Tokenizer,
    max_length: usize,
    device: Device,
}

impl BatchTokenizer {
    /// Wrap an existing tokenizer, installing truncation and
    /// longest-in-batch padding.
    pub fn new(mut tokenizer: Tokenizer, max_length: usize, device: Device) -> UnifiedResult<Self> {
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                strategy: TruncationStrategy::LongestFirst,
                stride: 0,
                direction: TruncationDirection::Right,
            }))
            .map_err(|e| model_errors::tokenizer("configure truncation", e))?;
        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            ..Default::default()
        }));

        Ok(Self {
            tokenizer,
            max_length,
            device,
        })
    }

    /// Load a `tokenizer.json` file and wrap it.
    pub fn from_file(path: &str, max_length: usize, device: Device) -> UnifiedResult<Self> {
        let tokenizer = Tokenizer::from_file(path)
            .map_err(|e| model_errors::tokenizer("load tokenizer file", e))?;
        Self::new(tokenizer, max_length, device)
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Encode a batch of texts into `(input_ids, attention_mask)` tensors.
    ///
    /// All rows are padded to the longest sequence in the batch, so both
    /// tensors share the shape `(batch, seq_len)`.
    pub fn encode_batch(&self, texts: &[&str]) -> UnifiedResult<(Tensor, Tensor)> {
        if texts.is_empty() {
            return Err(model_errors::tokenizer("encode batch", "empty text batch"));
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| model_errors::tokenizer("encode batch", e))?;

        let batch_size = encodings.len();
        let seq_len = encodings[0].get_ids().len();

        let mut ids = Vec::with_capacity(batch_size * seq_len);
        let mut mask = Vec::with_capacity(batch_size * seq_len);
        for encoding in &encodings {
            ids.extend_from_slice(encoding.get_ids());
            mask.extend_from_slice(encoding.get_attention_mask());
        }

        let input_ids = Tensor::from_vec(ids, (batch_size, seq_len), &self.device)
            .map_err(|e| model_errors::tokenizer("build input_ids tensor", e))?;
        let attention_mask = Tensor::from_vec(mask, (batch_size, seq_len), &self.device)
            .map_err(|e| model_errors::tokenizer("build attention_mask tensor", e))?;

        Ok((input_ids, attention_mask))
    }
}
