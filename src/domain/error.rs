//! Domain error types.

/// Top-level error type for signalbench.
///
/// Trade rejections and indicator warm-up are recorded outcomes, not errors;
/// this type only covers configuration, construction and data loading.
#[derive(Debug, thiserror::Error)]
pub enum SignalbenchError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unknown strategy: {name}")]
    UnknownStrategy { name: String },

    #[error("invalid blend: {reason}")]
    InvalidBlend { reason: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SignalbenchError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        SignalbenchError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(section: &str, key: &str) -> Self {
        SignalbenchError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }
}

impl SignalbenchError {
    /// Process exit code for this error family.
    pub fn exit_code(&self) -> u8 {
        match self {
            SignalbenchError::Io(_) => 1,
            SignalbenchError::ConfigParse { .. }
            | SignalbenchError::ConfigMissing { .. }
            | SignalbenchError::ConfigInvalid { .. } => 2,
            SignalbenchError::UnknownStrategy { .. } | SignalbenchError::InvalidBlend { .. } => 4,
            SignalbenchError::Data { .. } | SignalbenchError::NoData { .. } => 5,
        }
    }
}

impl From<&SignalbenchError> for std::process::ExitCode {
    fn from(err: &SignalbenchError) -> Self {
        std::process::ExitCode::from(err.exit_code())
    }
}
