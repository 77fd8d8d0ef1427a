use cadence_core::TimeIncrementError;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when constructing a [`Transport`](crate::Transport).
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("invalid fixed step: {0}")]
    FixedStep(#[from] TimeIncrementError),

    #[error("fixed step of {0} s is below the timer resolution")]
    BelowResolution(f64),

    #[error("time end must be finite and non-negative, got {0} s")]
    TimeEnd(f64),
}

/// How a running transport converts accumulated time into positions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrainPolicy {
    /// Advance at most one position per tick.
    ///
    /// After a long stall the displayed position lags wall-clock time and
    /// does not catch up; leftover time stays in the accumulator.
    #[default]
    SingleStep,

    /// Advance as many positions as the accumulated time allows, stopping
    /// at the final position.
    CatchUp,
}
