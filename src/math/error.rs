// src/math/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoronoiError {
    #[error("Invalid precision: expected at least {minimum} facets, got {requested}")]
    InvalidPrecision { requested: u32, minimum: u32 },

    #[error("Export to '{}' failed: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Reference diagram could not be built: {reason}")]
    Reference { reason: String },
}

pub type VoronoiResult<T> = Result<T, VoronoiError>;
