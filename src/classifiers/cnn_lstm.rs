//! Encoder -> Conv1d -> LSTM classifier
//!
//! The unidirectional variant: a Conv1d feature extractor over the frozen
//! encoder output, a single-direction LSTM, and a linear classifier fed
//! from the final timestep's hidden state. Earlier timestep outputs are
//! discarded, which keeps this head deliberately simple compared to the
//! attention-pooled variant.

use candle_core::{DType, Device, Result, Tensor};
use candle_nn::{
    conv1d, linear, lstm, Conv1d, Conv1dConfig, Linear, Module, VarBuilder, VarMap, LSTM,
    LSTMConfig, RNN,
};

use crate::classifiers::local_features;
use crate::core::config_loader::ModelConfig;
use crate::core::unified_error::{model_errors, processing_errors, UnifiedResult};
use crate::model_architectures::init::{LayerKind, LayerSpec};
use crate::model_architectures::traits::{SequenceEncoder, TextClassifier, NUM_CLASSES};

/// Convolution kernel size; padding below keeps the sequence length.
const CNN_KERNEL_SIZE: usize = 3;
const CNN_PADDING: usize = 1;

pub struct CnnLstmClassifier<E: SequenceEncoder> {
    encoder: E,
    cnn: Conv1d,
    lstm: LSTM,
    classifier: Linear,
}

impl<E: SequenceEncoder> CnnLstmClassifier<E> {
    /// Build the head in `varmap` on top of `encoder`. The convolution's
    /// input width comes from the encoder, so the encoder must be loaded
    /// first. Call the weight initializer on the result before use.
    pub fn new(
        encoder: E,
        config: &ModelConfig,
        varmap: &VarMap,
        device: &Device,
    ) -> UnifiedResult<Self> {
        let vb = VarBuilder::from_varmap(varmap, DType::F32, device);

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

        let lstm = lstm(
            config.cnn_out_channels,
            config.lstm_hidden_size,
            LSTMConfig::default(),
            vb.pp("lstm"),
        )
        .map_err(|e| model_errors::head("build lstm", e))?;

        let classifier = linear(config.lstm_hidden_size, NUM_CLASSES, vb.pp("classifier"))
            .map_err(|e| model_errors::head("build classifier", e))?;

        Ok(Self {
            encoder,
            cnn,
            lstm,
            classifier,
        })
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }
}

impl<E: SequenceEncoder> TextClassifier for CnnLstmClassifier<E> {
    fn forward(&self, input_ids: &Tensor, attention_mask: &Tensor, _train: bool) -> Result<Tensor> {
        let hidden = self.encoder.encode(input_ids, attention_mask)?;
        let features = local_features(&self.cnn, &hidden)?;

        let states = self.lstm.seq(&features)?;
        let last = states.last().ok_or_else(|| {
            candle_core::Error::from(processing_errors::shape(
                "lstm sequence",
                "at least one timestep",
                "empty sequence",
            ))
        })?;

        self.classifier.forward(last.h())
    }

    fn layer_specs(&self) -> Vec<LayerSpec> {
        vec![
            LayerSpec::new(LayerKind::Conv1d, "cnn"),
            LayerSpec::new(LayerKind::Lstm, "lstm"),
            LayerSpec::new(LayerKind::Linear, "classifier"),
        ]
    }
}
