use regex::Regex;

use crate::error::{AppError, AppResult};

/// Validate an email address. Intentionally lenient: one `@` with
/// something on both sides and no whitespace.
pub fn validate_email(email: &str) -> AppResult<()> {
    let email_regex = Regex::new(r"^[^@\s]+@[^@\s]+$").unwrap();

    if !email_regex.is_match(email) {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }

    Ok(())
}

/// Validate a Brazilian state code (UF), e.g. "MG" or "SP".
pub fn validate_state(state: &str) -> AppResult<()> {
    if state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::Validation(
            "State must be a two-letter UF code".to_string(),
        ));
    }

    Ok(())
}

/// Validate a CEP (postal code): eight digits, separators ignored.
pub fn validate_postal_code(cep: &str) -> AppResult<()> {
    let digits: String = cep.chars().filter(|c| *c != '-' && *c != '.').collect();

    if digits.len() != 8 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Postal code must have eight digits".to_string(),
        ));
    }

    Ok(())
}
