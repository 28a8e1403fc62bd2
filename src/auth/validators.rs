use super::models::{LoginRequest, SignupRequest};
use crate::common::ValidationResult;

pub fn validate_signup(data: &SignupRequest) -> ValidationResult {
    let mut result = ValidationResult::new();

    if !is_valid_email(&data.email) {
        result.add_error("email", "Invalid email address");
    }

    if data.password.len() < 8 {
        result.add_error("password", "Password must be at least 8 characters");
    }

    if data.name.trim().len() < 2 {
        result.add_error("name", "Name must be at least 2 characters");
    }

    result
}

pub fn validate_login(data: &LoginRequest) -> ValidationResult {
    let mut result = ValidationResult::new();

    if !is_valid_email(&data.email) {
        result.add_error("email", "Invalid email address");
    }

    if data.password.is_empty() {
        result.add_error("password", "Password is required");
    }

    result
}

/// Minimal shape check; deliverability is the mail provider's problem
pub fn is_valid_email(email: &str) -> bool {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }
    let (local, domain) = (parts[0], parts[1]);
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
