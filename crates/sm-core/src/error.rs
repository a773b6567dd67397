//! Workspace base error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `From`.

use thiserror::Error;

use crate::{IntersectionId, StreetId};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("intersection {0} not found")]
    IntersectionNotFound(IntersectionId),

    #[error("street {0} not found")]
    StreetNotFound(StreetId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `sm-core`.
pub type CoreResult<T> = Result<T, CoreError>;
