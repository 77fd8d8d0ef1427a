use crate::ConfigError;

/// Errors that can occur during an evolutionary search.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq)]
pub enum Error {
    #[error("invalid search config: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid robot for a design: {0}")]
    Robot(#[from] cadence_wmr::ConfigError),
}
