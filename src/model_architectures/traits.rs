//! Model Traits
//!
//! Seams between the frozen encoder, the trainable classifier heads and
//! the training loop. Heads are generic over [`SequenceEncoder`] so tests
//! can drive them with a lightweight deterministic encoder.

use crate::model_architectures::init::LayerSpec;
use candle_core::{Device, Result, Tensor};

/// The task is binary (stance vs. non-stance), so the class count is fixed.
pub const NUM_CLASSES: usize = 2;

/// A frozen sequence encoder producing contextual token representations.
pub trait SequenceEncoder {
    /// Width of the per-token representation.
    fn hidden_size(&self) -> usize;

    /// Device the encoder's tensors live on.
    fn device(&self) -> &Device;

    /// Encode `(batch, seq_len)` token ids and attention mask into a
    /// `(batch, seq_len, hidden_size)` tensor.
    ///
    /// The returned tensor is detached: the encoder is frozen and no
    /// gradient ever flows back into its parameters.
    fn encode(&self, input_ids: &Tensor, attention_mask: &Tensor) -> Result<Tensor>;
}

/// A classifier head producing `(batch, NUM_CLASSES)` logits.
pub trait TextClassifier {
    /// Forward pass. `train` toggles stochastic layers (dropout); in
    /// evaluation mode the pass is fully deterministic.
    fn forward(&self, input_ids: &Tensor, attention_mask: &Tensor, train: bool) -> Result<Tensor>;

    /// Trainable sublayers of the head, for the weight initializer.
    fn layer_specs(&self) -> Vec<LayerSpec>;

    fn num_classes(&self) -> usize {
        NUM_CLASSES
    }
}
