//! Payload validation for create requests: every field check happens here so
//! route handlers stay thin and malformed requests never reach the store.

use std::collections::HashSet;

/// Payload validation errors with helpful messages
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("{field} must not be empty")]
    MissingField { field: &'static str },

    #[error("{field} is too long (maximum {max} characters)")]
    TooLong { field: &'static str, max: usize },

    #[error("mobile number must be exactly 10 digits")]
    InvalidMobileNumber,

    #[error("unknown age group: {value}")]
    UnknownAgeGroup { value: String },

    #[error("unsupported language code: {value}")]
    UnsupportedLanguage { value: String },

    #[error("at least one primary crop is required")]
    NoPrimaryCrops,

    #[error("step index {index} is out of range for a quest with {len} steps")]
    StepOutOfRange { index: usize, len: usize },
}

const MAX_NAME_LEN: usize = 60;
const MAX_FIELD_LEN: usize = 120;

/// Language codes the client ships translations for.
fn supported_languages() -> HashSet<&'static str> {
    ["en", "hi", "te", "ta"].into_iter().collect()
}

/// Age brackets offered during onboarding.
fn known_age_groups() -> HashSet<&'static str> {
    ["18-30", "31-45", "46-60", "60+"].into_iter().collect()
}

/// Require a non-empty, bounded free-text field.
pub fn require_text(field: &'static str, value: &str) -> Result<(), PayloadError> {
    if value.trim().is_empty() {
        return Err(PayloadError::MissingField { field });
    }
    if value.chars().count() > MAX_FIELD_LEN {
        return Err(PayloadError::TooLong {
            field,
            max: MAX_FIELD_LEN,
        });
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), PayloadError> {
    if name.trim().is_empty() {
        return Err(PayloadError::MissingField { field: "name" });
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(PayloadError::TooLong {
            field: "name",
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

/// Indian mobile numbers: exactly 10 ASCII digits.
pub fn validate_mobile_number(mobile: &str) -> Result<(), PayloadError> {
    if mobile.len() != 10 || !mobile.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PayloadError::InvalidMobileNumber);
    }
    Ok(())
}

pub fn validate_age_group(age_group: &str) -> Result<(), PayloadError> {
    if known_age_groups().contains(age_group) {
        Ok(())
    } else {
        Err(PayloadError::UnknownAgeGroup {
            value: age_group.to_string(),
        })
    }
}

pub fn validate_language(language: &str) -> Result<(), PayloadError> {
    if supported_languages().contains(language) {
        Ok(())
    } else {
        Err(PayloadError::UnsupportedLanguage {
            value: language.to_string(),
        })
    }
}

pub fn validate_primary_crops(crops: &[String]) -> Result<(), PayloadError> {
    if crops.is_empty() || crops.iter().all(|c| c.trim().is_empty()) {
        return Err(PayloadError::NoPrimaryCrops);
    }
    Ok(())
}

/// Bounds-check a step index against a quest's progress vector.
pub fn validate_step_index(index: usize, len: usize) -> Result<(), PayloadError> {
    if index >= len {
        return Err(PayloadError::StepOutOfRange { index, len });
    }
    Ok(())
}
