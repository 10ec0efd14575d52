//! Labeled dataset and batch collation.
//!
//! Datasets are JSON-lines files, one `{"text": ..., "label": 0|1}`
//! record per line. The collator turns a slice of records into the
//! `(input_ids, attention_mask, labels)` tensors the classifier and loss
//! consume.

use candle_core::Tensor;
use serde::Deserialize;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::core::config_loader::AppConfig;
use crate::core::tokenization::BatchTokenizer;
use crate::core::unified_error::{UnifiedError, UnifiedResult};
use crate::model_architectures::traits::NUM_CLASSES;

/// One labeled text record.
#[derive(Debug, Clone, Deserialize)]
pub struct Example {
    pub text: String,
    pub label: u32,
}

/// An in-memory labeled dataset.
#[derive(Debug, Clone)]
pub struct LabeledDataset {
    examples: Vec<Example>,
}

impl LabeledDataset {
    /// Load a JSON-lines file, validating every label.
    pub fn load(path: &Path) -> UnifiedResult<Self> {
        let display_path = path.to_string_lossy().to_string();
        let file = std::fs::File::open(path).map_err(|e| UnifiedError::IO {
            operation: "open dataset".to_string(),
            path: Some(display_path.clone()),
            source: e,
        })?;

        let mut examples = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|e| UnifiedError::Data {
                path: display_path.clone(),
                line: Some(line_no),
                source: e.to_string(),
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let example: Example =
                serde_json::from_str(&line).map_err(|e| UnifiedError::Data {
                    path: display_path.clone(),
                    line: Some(line_no),
                    source: e.to_string(),
                })?;
            if example.label as usize >= NUM_CLASSES {
                return Err(UnifiedError::Data {
                    path: display_path.clone(),
                    line: Some(line_no),
                    source: format!(
                        "label {} out of range (expected 0..{})",
                        example.label, NUM_CLASSES
                    ),
                });
            }
            examples.push(example);
        }

        if examples.is_empty() {
            return Err(UnifiedError::Data {
                path: display_path,
                line: None,
                source: "dataset contains no records".to_string(),
            });
        }

        Ok(Self { examples })
    }

    pub fn from_examples(examples: Vec<Example>) -> Self {
        Self { examples }
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    /// Records selected by index, in the given order.
    pub fn select(&self, indices: &[usize]) -> Vec<&Example> {
        indices.iter().map(|&i| &self.examples[i]).collect()
    }
}

/// A collated batch ready for the classifier.
#[derive(Debug)]
pub struct Batch {
    pub input_ids: Tensor,
    pub attention_mask: Tensor,
    pub labels: Tensor,
}

/// Turns record batches into padded tensors.
#[derive(Debug)]
pub struct Collator {
    tokenizer: BatchTokenizer,
}

impl Collator {
    pub fn new(tokenizer: BatchTokenizer) -> Self {
        Self { tokenizer }
    }

    pub fn collate(&self, examples: &[&Example]) -> UnifiedResult<Batch> {
        let texts: Vec<&str> = examples.iter().map(|e| e.text.as_str()).collect();
        let (input_ids, attention_mask) = self.tokenizer.encode_batch(&texts)?;

        let labels: Vec<u32> = examples.iter().map(|e| e.label).collect();
        let labels = Tensor::from_vec(labels, examples.len(), self.tokenizer.device()).map_err(
            |e| UnifiedError::Processing {
                operation: "build label tensor".to_string(),
                source: e.to_string(),
                input_context: None,
            },
        )?;

        Ok(Batch {
            input_ids,
            attention_mask,
            labels,
        })
    }
}

/// Load the train/eval pair named by the configuration and build the
/// collation strategy the training loop consumes.
pub fn prepare_datasets(
    config: &AppConfig,
    tokenizer: BatchTokenizer,
) -> UnifiedResult<(LabeledDataset, LabeledDataset, Collator)> {
    let train = LabeledDataset::load(Path::new(&config.train_data_path))?;
    let eval = LabeledDataset::load(Path::new(&config.eval_data_path))?;
    tracing::info!(
        train_records = train.len(),
        eval_records = eval.len(),
        "datasets prepared"
    );
    Ok((train, eval, Collator::new(tokenizer)))
}
