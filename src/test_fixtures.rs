//! Shared test fixtures.
//!
//! A deterministic in-memory encoder and a tiny word-level tokenizer so
//! unit tests exercise the full head data flow without downloading any
//! pretrained model.

use candle_core::{DType, Device, Result, Tensor};
use std::collections::HashMap;
use tokenizers::models::wordlevel::WordLevel;
use tokenizers::Tokenizer;

use crate::model_architectures::traits::SequenceEncoder;

/// Vocabulary size of the fixture encoder's token table.
pub const FIXTURE_VOCAB: usize = 64;

/// Deterministic embedding-lookup encoder.
///
/// Maps every token id to a fixed vector from a small arithmetic table,
/// so two encodes of the same input are bit-identical and no weights are
/// involved.
pub struct FixtureEncoder {
    table: Tensor,
    hidden_size: usize,
    device: Device,
}

impl FixtureEncoder {
    pub fn new(hidden_size: usize, device: &Device) -> Result<Self> {
        let mut values = Vec::with_capacity(FIXTURE_VOCAB * hidden_size);
        for token in 0..FIXTURE_VOCAB {
            for dim in 0..hidden_size {
                values.push(((token * 31 + dim * 17) % 13) as f32 / 13.0 - 0.5);
            }
        }
        let table = Tensor::from_vec(values, (FIXTURE_VOCAB, hidden_size), device)?;
        Ok(Self {
            table,
            hidden_size,
            device: device.clone(),
        })
    }
}

impl SequenceEncoder for FixtureEncoder {
    fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    fn device(&self) -> &Device {
        &self.device
    }

    fn encode(&self, input_ids: &Tensor, _attention_mask: &Tensor) -> Result<Tensor> {
        let (batch, seq_len) = input_ids.dims2()?;
        let flat = input_ids.flatten_all()?;
        let rows = self.table.index_select(&flat, 0)?;
        rows.reshape((batch, seq_len, self.hidden_size))
    }
}

/// Default fixture encoder: 8-dimensional hidden states on CPU.
pub fn fixture_encoder() -> FixtureEncoder {
    FixtureEncoder::new(8, &Device::Cpu).unwrap()
}

/// Deterministic `(input_ids, attention_mask)` batch with in-vocabulary
/// token ids and an all-ones mask.
pub fn input_batch(batch: usize, seq_len: usize, device: &Device) -> (Tensor, Tensor) {
    let ids: Vec<u32> = (0..batch * seq_len)
        .map(|i| ((i * 7 + 3) % FIXTURE_VOCAB) as u32)
        .collect();
    let input_ids = Tensor::from_vec(ids, (batch, seq_len), device).unwrap();
    let attention_mask = Tensor::ones((batch, seq_len), DType::U32, device).unwrap();
    (input_ids, attention_mask)
}

/// Word-level tokenizer over a tiny sentiment vocabulary. No
/// pre-tokenizer is installed, so each input text is one token; batch
/// padding still exercises the collation path.
pub fn word_level_tokenizer() -> Tokenizer {
    let vocab: HashMap<String, u32> = [
        ("[PAD]", 0u32),
        ("[UNK]", 1),
        ("good", 2),
        ("bad", 3),
        ("great", 4),
        ("awful", 5),
        ("fine", 6),
        ("poor", 7),
    ]
    .into_iter()
    .map(|(token, id)| (token.to_string(), id))
    .collect();

    let model = WordLevel::builder()
        .vocab(vocab)
        .unk_token("[UNK]".to_string())
        .build()
        .unwrap();
    Tokenizer::new(model)
}
