//! Error types for the fallible host-side operations.
//!
//! The simulation itself never fails: unknown keys are ignored and missing
//! sprites draw nothing.  Only terminal I/O and startup configuration can go
//! wrong.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
