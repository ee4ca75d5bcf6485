//! Validator port for message validation.
//!
//! Defines the abstract interface for validating message drafts before
//! they reach the repository.

use crate::message::{domain::MessageDraft, error::ValidationError};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Port for draft validation operations.
///
/// Validation occurs in layers:
/// 1. Structure validation (identifiers, participants)
/// 2. Body validation (text limits, image reference shape)
///
/// # Implementation Notes
///
/// Implementations should:
/// - Collect all validation errors before returning (not fail-fast)
/// - Use `ValidationError::multiple` to combine errors
/// - Be stateless and thread-safe
pub trait MessageValidator: Send + Sync {
    /// Validates a draft against all rules.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any validation rule fails.
    /// Multiple failures are combined using `ValidationError::Multiple`.
    fn validate(&self, draft: &MessageDraft) -> ValidationResult<()>;

    /// Validates only the structural aspects of a draft.
    ///
    /// Checks:
    /// - Message ID is non-nil
    /// - Both participants are present and distinct
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if structural validation fails.
    fn validate_structure(&self, draft: &MessageDraft) -> ValidationResult<()>;

    /// Validates the body of a draft.
    ///
    /// Checks:
    /// - Text bodies are non-empty and within the length limit
    /// - Image bodies carry an `image/*` MIME type
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if body validation fails.
    fn validate_body(&self, draft: &MessageDraft) -> ValidationResult<()>;
}

/// Configuration for validation rules.
///
/// Allows customisation of validation behaviour for different contexts.
///
/// # Examples
///
/// ```
/// use parley::message::ports::validator::ValidationConfig;
///
/// let config = ValidationConfig::default();
/// assert_eq!(config.max_text_length, 10_000);
/// ```
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Maximum text content length in characters.
    pub max_text_length: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_text_length: 10_000,
        }
    }
}

impl ValidationConfig {
    /// Creates a configuration with a custom text length limit.
    #[must_use]
    pub const fn with_max_text_length(max_text_length: usize) -> Self {
        Self { max_text_length }
    }
}
