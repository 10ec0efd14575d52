//! Checkpoint Persistence
//!
//! Saves and restores the trainable head as a safetensors tensor map
//! keyed by parameter name. Restoration overwrites the live `VarMap` in
//! place and requires an exact name and shape correspondence; any
//! mismatch is fatal with no partial application.

use candle_nn::VarMap;
use std::path::Path;

use crate::core::unified_error::{checkpoint_errors, UnifiedResult};

/// Restore all trainable parameters from `path`.
///
/// Must run after construction and weight initialization. Tensors load
/// onto each parameter's existing device, so no relocation is needed
/// afterwards.
pub fn restore(varmap: &mut VarMap, path: &str) -> UnifiedResult<()> {
    varmap
        .load(path)
        .map_err(|e| checkpoint_errors::restore(path, e))
}

/// Write all trainable parameters to `path`, creating parent directories.
pub fn save(varmap: &VarMap, path: &str) -> UnifiedResult<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| checkpoint_errors::save(path, e))?;
        }
    }
    varmap.save(path).map_err(|e| checkpoint_errors::save(path, e))
}
