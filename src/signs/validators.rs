use super::models::{SignListParams, DIFFICULTIES, SIGN_LANGUAGES};
use crate::common::ValidationResult;

pub fn validate_list_params(params: &SignListParams) -> ValidationResult {
    let mut result = ValidationResult::new();

    if let Some(language) = &params.language {
        if !is_valid_language(language) {
            result.add_error("language", "Unknown sign language");
        }
    }

    if let Some(difficulty) = &params.difficulty {
        if !is_valid_difficulty(difficulty) {
            result.add_error("difficulty", "Unknown difficulty level");
        }
    }

    if let Some(page) = params.page {
        if page < 1 {
            result.add_error("page", "Page must be at least 1");
        }
    }

    result
}

pub fn is_valid_language(language: &str) -> bool {
    SIGN_LANGUAGES.contains(&language)
}

pub fn is_valid_difficulty(difficulty: &str) -> bool {
    DIFFICULTIES.contains(&difficulty)
}
