// src/users/validators.rs

use super::models::*;
use crate::common::ValidationResult;
use crate::signs::validators::is_valid_language;

// ============================================================================
// Profile Validators
// ============================================================================

pub fn validate_profile_update(data: &UpdateProfileRequest) -> ValidationResult {
    let mut result = ValidationResult::new();

    if data.name.is_none() && data.avatar.is_none() {
        result.add_error("body", "At least one of name or avatar is required");
        return result;
    }

    if let Some(name) = &data.name {
        if name.trim().len() < 2 {
            result.add_error("name", "Name must be at least 2 characters");
        } else if name.len() > 100 {
            result.add_error("name", "Name must be less than 100 characters");
        }
    }

    if let Some(avatar) = &data.avatar {
        if !avatar.starts_with("http://") && !avatar.starts_with("https://") {
            result.add_error("avatar", "Avatar must be a URL");
        }
    }

    result
}

pub fn validate_preferences(data: &PreferencesRequest) -> ValidationResult {
    let mut result = ValidationResult::new();

    if let Some(language) = &data.language {
        if !is_valid_language(language) {
            result.add_error("language", "Unknown sign language");
        }
    }

    if let Some(speed) = data.avatar_speed {
        if !(0.5..=2.0).contains(&speed) {
            result.add_error("avatarSpeed", "Avatar speed must be between 0.5 and 2.0");
        }
    }

    if let Some(theme) = &data.theme {
        if theme != "light" && theme != "dark" {
            result.add_error("theme", "Theme must be light or dark");
        }
    }

    result
}
