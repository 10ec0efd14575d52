//! Encoder -> Conv1d -> BiLSTM -> Attention -> Norm classifier
//!
//! The bidirectional variant: forward and reverse LSTM passes over the
//! convolved features are concatenated per timestep, attention pooling
//! weighs informative tokens instead of relying on the final timestep,
//! and dropout plus layer normalization stabilize the pooled features
//! before classification.

use candle_core::{DType, Device, Result, Tensor, D};
use candle_nn::{
    conv1d, layer_norm, linear, lstm, Conv1d, Conv1dConfig, Dropout, LayerNorm, Linear, Module,
    VarBuilder, VarMap, LSTM, LSTMConfig, RNN,
};

use crate::classifiers::local_features;
use crate::core::config_loader::ModelConfig;
use crate::core::unified_error::{model_errors, UnifiedResult};
use crate::model_architectures::attention::AttentionPool;
use crate::model_architectures::init::{LayerKind, LayerSpec};
use crate::model_architectures::traits::{SequenceEncoder, TextClassifier, NUM_CLASSES};

const CNN_KERNEL_SIZE: usize = 3;
const CNN_PADDING: usize = 1;
const DROPOUT_RATE: f32 = 0.3;
const LAYER_NORM_EPS: f64 = 1e-5;

pub struct CnnBiLstmAttnClassifier<E: SequenceEncoder> {
    encoder: E,
    cnn: Conv1d,
    lstm_fwd: LSTM,
    lstm_rev: LSTM,
    attention: AttentionPool,
    dropout: Dropout,
    layer_norm: LayerNorm,
    classifier: Linear,
}

impl<E: SequenceEncoder> CnnBiLstmAttnClassifier<E> {
    pub fn new(
        encoder: E,
        config: &ModelConfig,
        varmap: &VarMap,
        device: &Device,
    ) -> UnifiedResult<Self> {
        let vb = VarBuilder::from_varmap(varmap, DType::F32, device);
        // Forward and reverse states are concatenated per timestep.
        let bi_hidden = 2 * config.lstm_hidden_size;

        let cnn = conv1d(
            encoder.hidden_size(),
            config.cnn_out_channels,
            CNN_KERNEL_SIZE,
            Conv1dConfig {
                padding: CNN_PADDING,
                ..Default::default()
            },
            vb.pp("cnn"),
        )
        .map_err(|e| model_errors::head("build cnn", e))?;

        let lstm_fwd = lstm(
            config.cnn_out_channels,
            config.lstm_hidden_size,
            LSTMConfig::default(),
            vb.pp("lstm_fwd"),
        )
        .map_err(|e| model_errors::head("build forward lstm", e))?;
        let lstm_rev = lstm(
            config.cnn_out_channels,
            config.lstm_hidden_size,
            LSTMConfig::default(),
            vb.pp("lstm_rev"),
        )
        .map_err(|e| model_errors::head("build reverse lstm", e))?;

        let attention = AttentionPool::new(bi_hidden, vb.pp("attention"))
            .map_err(|e| model_errors::head("build attention", e))?;
        let dropout = Dropout::new(DROPOUT_RATE);
        let layer_norm = layer_norm(bi_hidden, LAYER_NORM_EPS, vb.pp("layer_norm"))
            .map_err(|e| model_errors::head("build layer norm", e))?;
        let classifier = linear(bi_hidden, NUM_CLASSES, vb.pp("classifier"))
            .map_err(|e| model_errors::head("build classifier", e))?;

        Ok(Self {
            encoder,
            cnn,
            lstm_fwd,
            lstm_rev,
            attention,
            dropout,
            layer_norm,
            classifier,
        })
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Full-sequence bidirectional recurrent output,
    /// `(batch, seq_len, 2 * lstm_hidden_size)`.
    ///
    /// The reverse pass consumes the time-reversed features and its
    /// outputs are re-reversed before concatenation, so both directions
    /// align per timestep.
    fn bilstm_sequence(&self, features: &Tensor) -> Result<Tensor> {
        let fwd_states = self.lstm_fwd.seq(features)?;
        let fwd = self.lstm_fwd.states_to_tensor(&fwd_states)?;

        let reversed = reverse_time(features)?;
        let rev_states = self.lstm_rev.seq(&reversed)?;
        let rev = reverse_time(&self.lstm_rev.states_to_tensor(&rev_states)?)?;

        Tensor::cat(&[&fwd, &rev], D::Minus1)
    }
}

/// Reverse a `(batch, seq_len, features)` tensor along the sequence axis.
fn reverse_time(xs: &Tensor) -> Result<Tensor> {
    let (_batch, seq_len, _features) = xs.dims3()?;
    let indices: Vec<u32> = (0..seq_len as u32).rev().collect();
    let indices = Tensor::from_vec(indices, seq_len, xs.device())?;
    xs.index_select(&indices, 1)
}

impl<E: SequenceEncoder> TextClassifier for CnnBiLstmAttnClassifier<E> {
    fn forward(&self, input_ids: &Tensor, attention_mask: &Tensor, train: bool) -> Result<Tensor> {
        let hidden = self.encoder.encode(input_ids, attention_mask)?;
        let features = local_features(&self.cnn, &hidden)?;

        let sequence = self.bilstm_sequence(&features)?;
        let (pooled, _weights) = self.attention.forward(&sequence)?;

        let pooled = self.dropout.forward(&pooled, train)?;
        let pooled = self.layer_norm.forward(&pooled)?;
        self.classifier.forward(&pooled)
    }

    fn layer_specs(&self) -> Vec<LayerSpec> {
        vec![
            LayerSpec::new(LayerKind::Conv1d, "cnn"),
            LayerSpec::new(LayerKind::Lstm, "lstm_fwd"),
            LayerSpec::new(LayerKind::Lstm, "lstm_rev"),
            LayerSpec::new(LayerKind::Linear, "attention"),
            LayerSpec::new(LayerKind::Linear, "classifier"),
        ]
    }
}
