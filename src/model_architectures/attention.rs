//! Attention Pooling
//!
//! Collapses a sequence of vectors into a single vector using learned
//! scalar attention weights: a bias-free linear projection scores each
//! timestep, softmax over the sequence axis normalizes the scores, and the
//! pooled output is the weighted sum of the input sequence.

use candle_core::{Result, Tensor, D};
use candle_nn::{linear_no_bias, ops, Linear, Module, VarBuilder};

use crate::core::unified_error::processing_errors;

/// Learned attention pooling over a `(batch, seq_len, hidden)` sequence.
#[derive(Debug)]
pub struct AttentionPool {
    score: Linear,
    hidden_size: usize,
}

impl AttentionPool {
    pub fn new(hidden_size: usize, vb: VarBuilder) -> Result<Self> {
        let score = linear_no_bias(hidden_size, 1, vb)?;
        Ok(Self { score, hidden_size })
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Pool the sequence into `(batch, hidden)`, also returning the
    /// `(batch, seq_len)` attention weights (each row sums to 1).
    ///
    /// Fails with a shape error if the input is not rank 3 or its last
    /// dimension does not match the configured hidden size.
    pub fn forward(&self, xs: &Tensor) -> Result<(Tensor, Tensor)> {
        let (_batch, _seq_len, hidden) = xs.dims3()?;
        if hidden != self.hidden_size {
            return Err(processing_errors::shape(
                "attention pooling",
                &format!("hidden dimension {}", self.hidden_size),
                &format!("hidden dimension {}", hidden),
            )
            .into());
        }

        let scores = self.score.forward(xs)?.squeeze(D::Minus1)?;
        let weights = ops::softmax(&scores, D::Minus1)?;
        let pooled = weights.unsqueeze(1)?.matmul(xs)?.squeeze(1)?;
        Ok((pooled, weights))
    }
}
