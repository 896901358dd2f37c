//! Error types for the simulation.
//!
//! Occupancy-contract violations are deliberately not represented here:
//! an animal or grass item that is not where the caller claims means the
//! spatial index is already corrupt, and the world map panics instead of
//! guessing.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
