//! # Model Architectures
//!
//! The frozen pretrained encoder, the attention pooling module, the
//! weight initializer and checkpoint persistence for trainable heads.

pub mod attention;
pub mod checkpoint;
pub mod encoder;
pub mod init;
pub mod traits;

pub use attention::AttentionPool;
pub use encoder::BertEncoder;
pub use init::{apply_xavier_uniform, LayerKind, LayerSpec};
pub use traits::{SequenceEncoder, TextClassifier, NUM_CLASSES};
