use std::fmt;

#[derive(Debug)]
pub enum LumeError {
    ResourceCreationFailed(String),
    ConfigLoadFailed(String),
    QueryFailed(String),
    BackendError(String),
    OutOfMemory,
    Generic(&'static str),
}

impl fmt::Display for LumeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LumeError::ResourceCreationFailed(msg) => write!(f, "Resource Creation Failed: {}", msg),
            LumeError::ConfigLoadFailed(msg) => write!(f, "Config Load Failed: {}", msg),
            LumeError::QueryFailed(msg) => write!(f, "Query Failed: {}", msg),
            LumeError::BackendError(msg) => write!(f, "Backend Error: {}", msg),
            LumeError::OutOfMemory => write!(f, "Out of Memory"),
            LumeError::Generic(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for LumeError {}

pub type LumeResult<T> = Result<T, LumeError>;
