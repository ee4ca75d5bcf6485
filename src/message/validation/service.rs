//! Validation service implementation.
//!
//! Provides the default implementation of the `MessageValidator` port,
//! combining individual validation rules into a comprehensive validator.

use crate::message::{
    domain::MessageDraft,
    error::ValidationError,
    ports::validator::{MessageValidator, ValidationConfig, ValidationResult},
    validation::rules,
};

/// Default implementation of the draft validator.
///
/// Applies all validation rules in order, collecting errors to provide
/// comprehensive feedback rather than failing on the first error.
///
/// # Examples
///
/// ```
/// use parley::message::domain::{MessageBody, MessageDraft, UserId};
/// use parley::message::ports::validator::MessageValidator;
/// use parley::message::validation::service::DefaultMessageValidator;
/// use mockable::DefaultClock;
///
/// let clock = DefaultClock;
/// let draft = MessageDraft::new(
///     UserId::new(),
///     UserId::new(),
///     MessageBody::text("hello"),
///     &clock,
/// ).expect("valid draft");
///
/// let validator = DefaultMessageValidator::new();
/// assert!(validator.validate(&draft).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct DefaultMessageValidator {
    config: ValidationConfig,
}

impl DefaultMessageValidator {
    /// Creates a new validator with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ValidationConfig::default(),
        }
    }

    /// Creates a new validator with custom configuration.
    #[must_use]
    pub const fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Returns the current validation configuration.
    #[must_use]
    pub const fn config(&self) -> &ValidationConfig {
        &self.config
    }
}

impl Default for DefaultMessageValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageValidator for DefaultMessageValidator {
    fn validate(&self, draft: &MessageDraft) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.validate_structure(draft) {
            collect_errors(&mut errors, e);
        }

        if let Err(e) = self.validate_body(draft) {
            collect_errors(&mut errors, e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::multiple(errors))
        }
    }

    fn validate_structure(&self, draft: &MessageDraft) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = rules::validate_message_id(draft) {
            errors.push(e);
        }

        if let Err(e) = rules::validate_participants(draft) {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::multiple(errors))
        }
    }

    fn validate_body(&self, draft: &MessageDraft) -> ValidationResult<()> {
        rules::validate_body(draft, &self.config)
    }
}

/// Helper function to collect errors, flattening `Multiple` variants.
fn collect_errors(errors: &mut Vec<ValidationError>, error: ValidationError) {
    match error {
        ValidationError::Multiple(inner) => errors.extend(inner),
        other => errors.push(other),
    }
}

// Note: Unit tests for DefaultMessageValidator are located in
// src/message/tests/validation_tests.rs using rstest fixtures.
