//! Domain error types.

/// Top-level error type for lowtide.
#[derive(Debug, thiserror::Error)]
pub enum LowtideError {
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

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no price data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&LowtideError> for std::process::ExitCode {
    fn from(err: &LowtideError) -> Self {
        let code: u8 = match err {
            LowtideError::Io(_) => 1,
            LowtideError::ConfigParse { .. }
            | LowtideError::ConfigMissing { .. }
            | LowtideError::ConfigInvalid { .. } => 2,
            LowtideError::Data { .. } => 3,
            LowtideError::NoData { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
