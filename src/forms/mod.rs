//! Form definitions backing the review routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod review;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid decision")]
    InvalidDecision,

    #[error("invalid gesture")]
    InvalidGesture,
}
