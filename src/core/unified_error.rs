//! Unified Error Handling
//!
//! Structured error type shared by every layer of the crate, replacing
//! ad-hoc `candle_core::Error::Msg` strings with a consistent taxonomy.

use std::fmt;

/// Unified error type for all classifier operations
#[derive(Debug)]
pub enum UnifiedError {
    /// Configuration errors (file loading, parsing, validation)
    Configuration {
        operation: String,
        source: ConfigErrorType,
        context: Option<String>,
    },

    /// Model errors (encoder loading, head construction, forward passes)
    Model {
        model_type: ModelErrorType,
        operation: String,
        source: String,
        context: Option<String>,
    },

    /// Processing errors (tensor rank/shape contract violations)
    Processing {
        operation: String,
        source: String,
        input_context: Option<String>,
    },

    /// Checkpoint errors (parameter name/shape mismatch at restore time)
    Checkpoint {
        operation: String,
        path: String,
        source: String,
    },

    /// Dataset errors (malformed records, out-of-range labels)
    Data {
        path: String,
        line: Option<usize>,
        source: String,
    },

    /// Validation errors (input validation, parameter checks)
    Validation {
        field: String,
        expected: String,
        actual: String,
    },

    /// I/O errors (file operations, device access)
    IO {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
    },
}

/// Configuration error subtypes
#[derive(Debug)]
pub enum ConfigErrorType {
    FileNotFound(String),
    ParseError(String),
    MissingField(String),
    InvalidData(String),
}

/// Model error subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelErrorType {
    Encoder,
    Head,
    Tokenizer,
}

impl fmt::Display for UnifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnifiedError::Configuration {
                operation,
                source,
                context,
            } => {
                write!(f, "Configuration error in '{}': {}", operation, source)?;
                if let Some(ctx) = context {
                    write!(f, " (context: {})", ctx)?;
                }
                Ok(())
            }
            UnifiedError::Model {
                model_type,
                operation,
                source,
                context,
            } => {
                write!(
                    f,
                    "Model error ({:?}) in '{}': {}",
                    model_type, operation, source
                )?;
                if let Some(ctx) = context {
                    write!(f, " (context: {})", ctx)?;
                }
                Ok(())
            }
            UnifiedError::Processing {
                operation,
                source,
                input_context,
            } => {
                write!(f, "Processing error in '{}': {}", operation, source)?;
                if let Some(ctx) = input_context {
                    write!(f, " (input: {})", ctx)?;
                }
                Ok(())
            }
            UnifiedError::Checkpoint {
                operation,
                path,
                source,
            } => {
                write!(
                    f,
                    "Checkpoint error in '{}' for '{}': {}",
                    operation, path, source
                )
            }
            UnifiedError::Data { path, line, source } => {
                write!(f, "Data error in '{}'", path)?;
                if let Some(line) = line {
                    write!(f, " at line {}", line)?;
                }
                write!(f, ": {}", source)
            }
            UnifiedError::Validation {
                field,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Validation error for '{}': expected '{}', got '{}'",
                    field, expected, actual
                )
            }
            UnifiedError::IO {
                operation,
                path,
                source,
            } => {
                write!(f, "I/O error in '{}': {}", operation, source)?;
                if let Some(p) = path {
                    write!(f, " (path: {})", p)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for ConfigErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigErrorType::FileNotFound(path) => write!(f, "file not found: {}", path),
            ConfigErrorType::ParseError(msg) => write!(f, "parse error: {}", msg),
            ConfigErrorType::MissingField(field) => write!(f, "missing required field: {}", field),
            ConfigErrorType::InvalidData(msg) => write!(f, "invalid data: {}", msg),
        }
    }
}

impl std::error::Error for UnifiedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UnifiedError::IO { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type alias for unified error handling
pub type UnifiedResult<T> = Result<T, UnifiedError>;

/// Convert UnifiedError to candle_core::Error so tensor code can propagate it
impl From<UnifiedError> for candle_core::Error {
    fn from(err: UnifiedError) -> Self {
        candle_core::Error::Msg(err.to_string())
    }
}

impl From<std::io::Error> for UnifiedError {
    fn from(err: std::io::Error) -> Self {
        UnifiedError::IO {
            operation: "I/O operation".to_string(),
            path: None,
            source: err,
        }
    }
}

impl From<serde_json::Error> for UnifiedError {
    fn from(err: serde_json::Error) -> Self {
        UnifiedError::Configuration {
            operation: "JSON parsing".to_string(),
            source: ConfigErrorType::ParseError(err.to_string()),
            context: None,
        }
    }
}

/// Constructor helpers for configuration errors
pub mod config_errors {
    use super::{ConfigErrorType, UnifiedError};

    pub fn file_not_found(path: &str) -> UnifiedError {
        UnifiedError::Configuration {
            operation: "config loading".to_string(),
            source: ConfigErrorType::FileNotFound(path.to_string()),
            context: None,
        }
    }

    pub fn invalid_json(path: &str, detail: &str) -> UnifiedError {
        UnifiedError::Configuration {
            operation: "config parsing".to_string(),
            source: ConfigErrorType::ParseError(detail.to_string()),
            context: Some(path.to_string()),
        }
    }

    pub fn missing_field(field: &str, path: &str) -> UnifiedError {
        UnifiedError::Configuration {
            operation: "config validation".to_string(),
            source: ConfigErrorType::MissingField(field.to_string()),
            context: Some(path.to_string()),
        }
    }
}

/// Constructor helpers for model errors
pub mod model_errors {
    use super::{ModelErrorType, UnifiedError};

    pub fn encoder(operation: &str, source: impl ToString) -> UnifiedError {
        UnifiedError::Model {
            model_type: ModelErrorType::Encoder,
            operation: operation.to_string(),
            source: source.to_string(),
            context: None,
        }
    }

    pub fn head(operation: &str, source: impl ToString) -> UnifiedError {
        UnifiedError::Model {
            model_type: ModelErrorType::Head,
            operation: operation.to_string(),
            source: source.to_string(),
            context: None,
        }
    }

    pub fn tokenizer(operation: &str, source: impl ToString) -> UnifiedError {
        UnifiedError::Model {
            model_type: ModelErrorType::Tokenizer,
            operation: operation.to_string(),
            source: source.to_string(),
            context: None,
        }
    }
}

/// Constructor helpers for processing errors
pub mod processing_errors {
    use super::UnifiedError;

    pub fn shape(operation: &str, expected: &str, actual: &str) -> UnifiedError {
        UnifiedError::Processing {
            operation: operation.to_string(),
            source: format!("expected {}, got {}", expected, actual),
            input_context: None,
        }
    }

    pub fn tensor(operation: &str, source: impl ToString) -> UnifiedError {
        UnifiedError::Processing {
            operation: operation.to_string(),
            source: source.to_string(),
            input_context: None,
        }
    }
}

/// Constructor helpers for checkpoint errors
pub mod checkpoint_errors {
    use super::UnifiedError;

    pub fn restore(path: &str, source: impl ToString) -> UnifiedError {
        UnifiedError::Checkpoint {
            operation: "restore".to_string(),
            path: path.to_string(),
            source: source.to_string(),
        }
    }

    pub fn save(path: &str, source: impl ToString) -> UnifiedError {
        UnifiedError::Checkpoint {
            operation: "save".to_string(),
            path: path.to_string(),
            source: source.to_string(),
        }
    }
}
