//! Training loop for the classifier heads.
//!
//! AdamW over the head's `VarMap` with cross-entropy loss; the frozen
//! encoder contributes no trainable parameters. Each epoch reshuffles the
//! training set deterministically from the configured seed, then runs an
//! evaluation pass. After the final epoch the eval-set predictions are
//! materialized and the trained head is written to the output path.

use candle_core::{Result as CandleResult, Tensor, D};
use candle_nn::{loss, Optimizer, VarMap};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::core::config_loader::TrainConfig;
use crate::core::unified_error::{model_errors, UnifiedResult};
use crate::data::dataset::{Collator, LabeledDataset};
use crate::model_architectures::checkpoint;
use crate::model_architectures::traits::TextClassifier;

/// Per-epoch metrics plus the final eval predictions.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub epoch_train_loss: Vec<f64>,
    pub eval_loss: f64,
    pub eval_accuracy: f64,
    pub predictions: Vec<u32>,
}

/// Train the head, evaluate each epoch, predict on the eval set and save
/// the trained parameters. Any tensor or loss failure aborts the run.
pub fn train_and_predict(
    model: &dyn TextClassifier,
    varmap: &VarMap,
    train: &LabeledDataset,
    eval: &LabeledDataset,
    collator: &Collator,
    config: &TrainConfig,
) -> UnifiedResult<TrainReport> {
    let mut optimizer = candle_nn::AdamW::new(
        varmap.all_vars(),
        candle_nn::ParamsAdamW {
            lr: config.learning_rate,
            weight_decay: config.weight_decay,
            ..Default::default()
        },
    )
    .map_err(|e| model_errors::head("create optimizer", e))?;

    let mut indices: Vec<usize> = (0..train.len()).collect();
    let mut epoch_train_loss = Vec::with_capacity(config.epochs);

    for epoch in 0..config.epochs {
        let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(epoch as u64));
        indices.shuffle(&mut rng);

        let mut epoch_loss = 0.0;
        let mut batch_count = 0usize;
        for chunk in indices.chunks(config.batch_size) {
            let batch = collator.collate(&train.select(chunk))?;
            let loss_value = train_step(
                model,
                &mut optimizer,
                &batch.input_ids,
                &batch.attention_mask,
                &batch.labels,
            )
            .map_err(|e| model_errors::head("training step", e))?;
            epoch_loss += loss_value;
            batch_count += 1;
        }
        let avg_train_loss = epoch_loss / batch_count.max(1) as f64;
        epoch_train_loss.push(avg_train_loss);

        let (eval_loss, eval_accuracy, _) = evaluate(model, eval, collator, config.batch_size)?;
        tracing::info!(
            epoch = epoch + 1,
            train_loss = avg_train_loss,
            eval_loss,
            eval_accuracy,
            "epoch complete"
        );
    }

    let (eval_loss, eval_accuracy, predictions) =
        evaluate(model, eval, collator, config.batch_size)?;

    checkpoint::save(varmap, &config.output_path)?;
    tracing::info!(path = %config.output_path, "trained head saved");

    Ok(TrainReport {
        epoch_train_loss,
        eval_loss,
        eval_accuracy,
        predictions,
    })
}

fn train_step(
    model: &dyn TextClassifier,
    optimizer: &mut candle_nn::AdamW,
    input_ids: &Tensor,
    attention_mask: &Tensor,
    labels: &Tensor,
) -> CandleResult<f64> {
    let logits = model.forward(input_ids, attention_mask, true)?;
    let loss = loss::cross_entropy(&logits, labels)?;
    optimizer.backward_step(&loss)?;
    Ok(loss.to_scalar::<f32>()? as f64)
}

/// Evaluation pass: mean loss, accuracy and argmax predictions.
fn evaluate(
    model: &dyn TextClassifier,
    eval: &LabeledDataset,
    collator: &Collator,
    batch_size: usize,
) -> UnifiedResult<(f64, f64, Vec<u32>)> {
    let indices: Vec<usize> = (0..eval.len()).collect();
    let mut total_loss = 0.0;
    let mut batch_count = 0usize;
    let mut correct = 0usize;
    let mut predictions = Vec::with_capacity(eval.len());

    for chunk in indices.chunks(batch_size) {
        let batch = collator.collate(&eval.select(chunk))?;
        let (loss_value, batch_preds, batch_labels) = eval_step(
            model,
            &batch.input_ids,
            &batch.attention_mask,
            &batch.labels,
        )
        .map_err(|e| model_errors::head("evaluation step", e))?;

        total_loss += loss_value;
        batch_count += 1;
        correct += batch_preds
            .iter()
            .zip(batch_labels.iter())
            .filter(|(p, l)| p == l)
            .count();
        predictions.extend(batch_preds);
    }

    let mean_loss = total_loss / batch_count.max(1) as f64;
    let accuracy = correct as f64 / eval.len().max(1) as f64;
    Ok((mean_loss, accuracy, predictions))
}

fn eval_step(
    model: &dyn TextClassifier,
    input_ids: &Tensor,
    attention_mask: &Tensor,
    labels: &Tensor,
) -> CandleResult<(f64, Vec<u32>, Vec<u32>)> {
    let logits = model.forward(input_ids, attention_mask, false)?;
    let loss = loss::cross_entropy(&logits, labels)?;
    let preds = logits.argmax(D::Minus1)?.to_vec1::<u32>()?;
    let labels = labels.to_vec1::<u32>()?;
    Ok((loss.to_scalar::<f32>()? as f64, preds, labels))
}
