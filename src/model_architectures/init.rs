//! Weight Initialization
//!
//! Xavier/Glorot uniform re-initialization of the trainable head,
//! dispatched over a closed set of layer kinds. Each classifier enumerates
//! its sublayers as [`LayerSpec`]s; the initializer walks the model's
//! `VarMap` and overwrites exactly the weight-group parameters each kind
//! declares. Bias and normalization parameters are never touched.

use candle_core::{Result, Tensor};
use candle_nn::VarMap;

use crate::core::unified_error::processing_errors;

/// The closed set of layer kinds eligible for re-initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Linear,
    Conv1d,
    Lstm,
}

impl LayerKind {
    /// Names of the weight-group parameters this kind owns, relative to
    /// the layer's prefix. Bias groups are deliberately absent.
    pub fn weight_param_names(&self) -> &'static [&'static str] {
        match self {
            LayerKind::Linear | LayerKind::Conv1d => &["weight"],
            LayerKind::Lstm => &["weight_ih_l0", "weight_hh_l0"],
        }
    }
}

/// One trainable sublayer: its kind plus its parameter-name prefix.
#[derive(Debug, Clone)]
pub struct LayerSpec {
    pub kind: LayerKind,
    pub prefix: String,
}

impl LayerSpec {
    pub fn new(kind: LayerKind, prefix: impl Into<String>) -> Self {
        Self {
            kind,
            prefix: prefix.into(),
        }
    }
}

/// Re-initialize the weight parameters of every listed layer in place.
///
/// Re-applying re-randomizes the weights, so callers must not invoke this
/// after a checkpoint restore.
pub fn apply_xavier_uniform(varmap: &VarMap, specs: &[LayerSpec]) -> Result<()> {
    let data = varmap.data().lock().unwrap();
    for spec in specs {
        for leaf in spec.kind.weight_param_names() {
            let name = format!("{}.{}", spec.prefix, leaf);
            if let Some(var) = data.get(&name) {
                let init = xavier_uniform(var.dims(), var.device())?;
                var.set(&init.to_dtype(var.dtype())?)?;
            }
        }
    }
    Ok(())
}

/// Sample a tensor uniformly from `[-bound, bound]` with
/// `bound = sqrt(6 / (fan_in + fan_out))`.
fn xavier_uniform(dims: &[usize], device: &candle_core::Device) -> Result<Tensor> {
    let (fan_in, fan_out) = fan_in_out(dims)?;
    let bound = (6.0_f64 / (fan_in + fan_out) as f64).sqrt();
    Tensor::rand(-bound as f32, bound as f32, dims, device)
}

/// Fan computation following the convolution convention: dimension 0 is
/// the output channels, dimension 1 the input channels, and any trailing
/// dimensions form the receptive field.
fn fan_in_out(dims: &[usize]) -> Result<(usize, usize)> {
    match dims {
        [out_features, in_features] => Ok((*in_features, *out_features)),
        [out_channels, in_channels, rest @ ..] => {
            let receptive_field: usize = rest.iter().product();
            Ok((in_channels * receptive_field, out_channels * receptive_field))
        }
        _ => Err(processing_errors::shape(
            "xavier initialization",
            "weight tensor of rank >= 2",
            &format!("rank {}", dims.len()),
        )
        .into()),
    }
}
