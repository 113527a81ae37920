//! Validation collaborator port
//!
//! Validators are pure: they inspect a configuration and return every
//! field-scoped problem they find. Any non-empty result fails the asset
//! that consulted the validator.

use crate::error::{FieldError, GenerateError};

/// Pure configuration validator
pub trait Validator<C: ?Sized>: Send + Sync {
    fn validate(&self, config: &C) -> Vec<FieldError>;
}

impl<C: ?Sized, F> Validator<C> for F
where
    F: Fn(&C) -> Vec<FieldError> + Send + Sync,
{
    fn validate(&self, config: &C) -> Vec<FieldError> {
        self(config)
    }
}

/// Run a validator, turning any findings into a generation failure
pub fn ensure_valid<C: ?Sized>(
    validator: &dyn Validator<C>,
    config: &C,
) -> Result<(), GenerateError> {
    let errors = validator.validate(config);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(GenerateError::Validation(errors))
    }
}
