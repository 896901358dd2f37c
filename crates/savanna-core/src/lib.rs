//! Core types and utilities for the Savanna grid-world life simulator.

pub mod config;
pub mod error;
pub mod types;

pub use config::*;
pub use error::{Error, Result};
pub use types::*;
