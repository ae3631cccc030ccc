//! Error types.
//!
//! - `CardError`: failures of the card geometry pipeline (pure, no I/O)
//! - `AppError`: what the binary reports, carrying a process exit code
//!
//! Exit codes:
//! - 2: usage / input / I/O problems
//! - 3: no usable data
//! - 4: computation failure

use thiserror::Error;

/// Errors raised while turning samples into a classified card.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CardError {
    /// A line could not be fitted: no points, all x equal, or a non-finite result.
    #[error("degenerate fit: {0}")]
    DegenerateFit(String),

    /// An axis has no spread (max == min), so it cannot be normalized.
    #[error("degenerate range: all {axis} values equal {value}")]
    DegenerateRange { axis: &'static str, value: f64 },

    #[error("insufficient samples: need {needed}, have {available}")]
    InsufficientSamples { needed: usize, available: usize },
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<CardError> for AppError {
    fn from(err: CardError) -> Self {
        let exit_code = match err {
            CardError::InsufficientSamples { .. } => 3,
            CardError::DegenerateFit(_) | CardError::DegenerateRange { .. } => 4,
        };
        AppError::new(exit_code, format!("Card classification failed: {err}"))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_errors_map_to_exit_codes() {
        let err: AppError = CardError::InsufficientSamples { needed: 4, available: 2 }.into();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("need 4, have 2"));

        let err: AppError = CardError::DegenerateRange { axis: "load", value: 7.0 }.into();
        assert_eq!(err.exit_code(), 4);
    }
}
