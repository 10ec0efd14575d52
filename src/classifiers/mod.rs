//! # Classifier Heads
//!
//! Trainable heads stacked on top of the frozen encoder. Both variants
//! share the convolutional feature extractor; they differ in the
//! recurrent path and the pooling strategy.

pub mod cnn_bilstm;
pub mod cnn_lstm;

pub use cnn_bilstm::CnnBiLstmAttnClassifier;
pub use cnn_lstm::CnnLstmClassifier;

use candle_core::{Result, Tensor};
use candle_nn::{Conv1d, Module};

/// Run the convolution over a `(batch, seq_len, hidden)` tensor.
///
/// Conv1d consumes channel-first input, so the sequence and channel axes
/// are swapped before the convolution and swapped back afterwards; the
/// two transposes are exact inverses and the sequence length is preserved
/// by the kernel-3 / padding-1 configuration.
pub(crate) fn local_features(cnn: &Conv1d, hidden: &Tensor) -> Result<Tensor> {
    let channel_first = hidden.transpose(1, 2)?.contiguous()?;
    let convolved = cnn.forward(&channel_first)?;
    convolved.transpose(1, 2)?.contiguous()
}

#[cfg(test)]
pub mod cnn_lstm_test;
