use std::fmt;
use std::time::Duration;

use super::AppConfig;
use crate::validation::validate_endpoint;

/// Upper bound on how long a lookup may block the terminal.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub type ValidationResult = Result<(), Vec<ValidationError>>;

pub struct ConfigValidator;

impl ConfigValidator {
    /// Check every field and report all problems at once.
    pub fn validate(config: &AppConfig) -> ValidationResult {
        let mut errors = Vec::new();

        if let Err(e) = validate_endpoint(&config.api_url) {
            errors.push(ValidationError {
                field: "api_url".to_string(),
                message: e.user_message(),
            });
        }

        if config.timeout_secs == 0 {
            errors.push(ValidationError {
                field: "timeout_secs".to_string(),
                message: "Timeout must be greater than zero".to_string(),
            });
        } else if config.timeout_secs > MAX_TIMEOUT.as_secs() {
            errors.push(ValidationError {
                field: "timeout_secs".to_string(),
                message: format!("Timeout must be at most {} seconds", MAX_TIMEOUT.as_secs()),
            });
        }

        if config.user_agent.trim().is_empty() {
            errors.push(ValidationError {
                field: "user_agent".to_string(),
                message: "User agent must not be empty".to_string(),
            });
        }

        if config.default_program.trim().is_empty() {
            errors.push(ValidationError {
                field: "default_program".to_string(),
                message: "Default program must not be empty".to_string(),
            });
        }

        if let Some(path) = &config.booklist_path {
            if !path.is_file() {
                errors.push(ValidationError {
                    field: "booklist_path".to_string(),
                    message: format!("Booklist file not found: {}", path.display()),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
