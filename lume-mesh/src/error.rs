use lume_core::LumeError;
use std::path::PathBuf;
use thiserror::Error;

pub type MeshResult<T> = std::result::Result<T, MeshError>;

#[derive(Error, Debug)]
pub enum MeshError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {origin} (line {line}): {message}")]
    Parse {
        origin: String,
        line: usize,
        message: String,
    },

    #[error("No shapes in {0}")]
    EmptyScene(String),

    #[error("GPU upload failed: {0}")]
    Device(#[from] LumeError),
}

impl MeshError {
    pub fn parse(origin: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        MeshError::Parse {
            origin: origin.into(),
            line,
            message: message.into(),
        }
    }
}
