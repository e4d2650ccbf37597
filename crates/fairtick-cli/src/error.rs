use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] fairtick_core::ValidationError),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Watchlist(#[from] fairtick_watchlist::WatchlistError),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Config(_) => 2,
            Self::Command(_) => 2,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
            Self::Watchlist(_) => 10,
        }
    }
}

impl From<fairtick_core::ProviderError> for CliError {
    fn from(error: fairtick_core::ProviderError) -> Self {
        Self::Command(error.to_string())
    }
}
