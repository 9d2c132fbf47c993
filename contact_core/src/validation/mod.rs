//! Input validation shared by the relay handler and the submission controller

pub mod rules;

pub use rules::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: HashMap<String, Vec<String>>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            is_valid: true,
            errors: HashMap::new(),
        }
    }

    pub fn from_validation_errors(errors: ValidationErrors) -> Self {
        let mut result = Self {
            is_valid: false,
            errors: HashMap::new(),
        };

        for (field, field_errors) in errors.field_errors() {
            let messages = field_errors
                .iter()
                .map(|error| match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("Validation failed for field '{}'", field),
                })
                .collect();

            result.errors.insert(field.to_string(), messages);
        }

        result
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.is_valid = false;
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    /// Names of the fields that failed, sorted for stable log output.
    pub fn invalid_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self.errors.keys().map(String::as_str).collect();
        fields.sort_unstable();
        fields
    }
}

pub trait Validatable {
    fn validate_comprehensive(&self) -> ValidationResult;
}

impl<T> Validatable for T
where
    T: Validate,
{
    fn validate_comprehensive(&self) -> ValidationResult {
        match self.validate() {
            Ok(_) => ValidationResult::success(),
            Err(errors) => ValidationResult::from_validation_errors(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_error_marks_invalid() {
        let mut result = ValidationResult::success();
        assert!(result.is_valid);

        result.add_error("name", "Name is required");
        result.add_error("email", "Email is required");

        assert!(!result.is_valid);
        assert_eq!(result.invalid_fields(), vec!["email", "name"]);
    }
}
