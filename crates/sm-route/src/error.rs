//! Routing error type.
//!
//! An unreachable destination is not an error: it is reported as `None`
//! (or an empty segment list).  Errors cover caller mistakes only.

use thiserror::Error;

use sm_core::CoreError;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type RouteResult<T> = Result<T, RouteError>;
