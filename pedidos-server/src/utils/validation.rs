//! Input validation helpers
//!
//! Centralized text limits and the CNPJ digit filter. The store enforces no
//! lengths of its own, so the limits live here.

use shared::error::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Company names, delivery locations, addresses
pub const MAX_TEXT_LEN: usize = 500;

/// Short identifiers: phone, state registration, document numbers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// A Brazilian CNPJ has exactly 14 digits
pub const CNPJ_DIGITS: usize = 14;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Strip formatting from a CNPJ, keeping digits only (the form sends
/// `12.345.678/0001-90`, the store keeps `12345678000190`).
pub fn cnpj_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Validate a CNPJ after stripping formatting.
pub fn validate_cnpj(raw: &str) -> Result<String, AppError> {
    let digits = cnpj_digits(raw);
    if digits.len() != CNPJ_DIGITS {
        return Err(
            AppError::validation(format!("CNPJ must have {CNPJ_DIGITS} digits"))
                .with_detail("cnpj", raw),
        );
    }
    Ok(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("RUA A, 100", "endereco", MAX_TEXT_LEN).is_ok());
        assert!(validate_required_text("   ", "endereco", MAX_TEXT_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(600), "endereco", MAX_TEXT_LEN).is_err());
    }

    #[test]
    fn test_cnpj_digits() {
        assert_eq!(cnpj_digits("33.149.502/0001-38"), "33149502000138");
        assert_eq!(cnpj_digits("33149502000138"), "33149502000138");
    }

    #[test]
    fn test_validate_cnpj() {
        assert_eq!(
            validate_cnpj("33.149.502/0001-38").unwrap(),
            "33149502000138"
        );
        assert!(validate_cnpj("123").is_err());
        assert!(validate_cnpj("").is_err());
    }
}
