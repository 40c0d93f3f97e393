//! Domain error types.

/// Top-level error type for alphalegion.
#[derive(Debug, thiserror::Error)]
pub enum AlphaLegionError {
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

    #[error("no snapshots found in {file}")]
    NoData { file: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&AlphaLegionError> for std::process::ExitCode {
    fn from(err: &AlphaLegionError) -> Self {
        let code: u8 = match err {
            AlphaLegionError::Io(_) => 1,
            AlphaLegionError::ConfigParse { .. }
            | AlphaLegionError::ConfigMissing { .. }
            | AlphaLegionError::ConfigInvalid { .. } => 2,
            AlphaLegionError::Data { .. } => 3,
            AlphaLegionError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
