//! Error types for the game core.
//!
//! Nothing in normal play is recoverable; these exist so that invariant
//! violations surface as values instead of NaNs or silently skipped entities.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GeometryError {
    /// Square root requested for a negative or NaN value.
    #[error("cannot take the square root of {0}")]
    NegativeRoot(f64),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The type index pointed at an entity whose concrete type is not the
    /// one it was registered under.
    #[error("entity {id} is indexed as `{expected}` but has a different concrete type")]
    TypeMismatch { id: u64, expected: &'static str },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Anything that can go wrong while stepping a frame.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GameError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// The controller was handed a config that fails validation.
    #[error("{0}")]
    Config(String),
}
