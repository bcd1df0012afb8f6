use thiserror::Error;

/// Errors returned by the fallible map operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// the requested key has no binding in the map
    #[error("key not found")]
    NotFound,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
