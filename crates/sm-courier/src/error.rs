//! Courier-planning error type.
//!
//! An infeasible request is not an error; it yields an empty [`Tour`].
//!
//! [`Tour`]: crate::Tour

use thiserror::Error;

use sm_core::CoreError;

#[derive(Debug, Error)]
pub enum CourierError {
    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type CourierResult<T> = Result<T, CourierError>;
