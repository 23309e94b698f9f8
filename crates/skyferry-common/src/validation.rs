//! Input validation utilities.
//!
//! Centralized validation helpers used across API routes.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use validator::Validate;

use crate::error::FerryError;

/// US civil registration: `N`, a leading non-zero digit, then up to four more
/// digits with at most two trailing letters (I and O are never issued).
static N_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^N[1-9](?:[0-9]{0,4}|[0-9]{0,3}[A-HJ-NP-Z]|[0-9]{0,2}[A-HJ-NP-Z]{2})$")
        .expect("N-number pattern is valid")
});

/// Validate a request body, returning a FerryError::Validation on failure.
pub fn validate_request<T: Validate>(body: &T) -> Result<(), FerryError> {
    body.validate().map_err(|e| FerryError::Validation {
        message: format_validation_errors(e),
    })
}

/// Format validation errors into a human-readable string.
fn format_validation_errors(errors: validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for '{field}'"))
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

/// Normalize and validate an aircraft tail number.
///
/// Input is trimmed, upper-cased and stripped of dashes (`n-123ab` → `N123AB`).
pub fn normalize_tail_number(raw: &str) -> Result<String, FerryError> {
    let tail: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '-')
        .collect::<String>()
        .to_ascii_uppercase();

    if N_NUMBER.is_match(&tail) {
        Ok(tail)
    } else {
        Err(FerryError::Validation {
            message: format!("'{}' is not a valid N-number", raw.trim()),
        })
    }
}

/// Validate a free-text field is not blank.
pub fn require_text(field: &str, value: &str) -> Result<(), FerryError> {
    if value.trim().is_empty() {
        return Err(FerryError::Validation {
            message: format!("{field} cannot be empty or whitespace only"),
        });
    }
    Ok(())
}

/// Validate an airport identifier (ICAO `KSEA` or FAA LID `S43`).
pub fn validate_airport(field: &str, code: &str) -> Result<String, FerryError> {
    let code = code.trim().to_ascii_uppercase();
    let valid = (3..=4).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphanumeric());
    if valid {
        Ok(code)
    } else {
        Err(FerryError::Validation {
            message: format!("{field} must be a 3-4 character airport identifier"),
        })
    }
}

/// Validate that a date range is ordered.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), FerryError> {
    if end < start {
        return Err(FerryError::Validation {
            message: "Expiration date must not precede the effective date".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_numbers_normalize() {
        assert_eq!(normalize_tail_number("n12345").unwrap(), "N12345");
        assert_eq!(normalize_tail_number(" N-172SP ").unwrap(), "N172SP");
        assert_eq!(normalize_tail_number("N1A").unwrap(), "N1A");
    }

    #[test]
    fn bad_tail_numbers_are_rejected() {
        assert!(normalize_tail_number("N0123").is_err());
        assert!(normalize_tail_number("N123456").is_err());
        assert!(normalize_tail_number("N12OI").is_err());
        assert!(normalize_tail_number("G-ABCD").is_err());
        assert!(normalize_tail_number("").is_err());
    }

    #[test]
    fn airports() {
        assert_eq!(validate_airport("origin", "ksea").unwrap(), "KSEA");
        assert_eq!(validate_airport("origin", "S43").unwrap(), "S43");
        assert!(validate_airport("origin", "K").is_err());
        assert!(validate_airport("origin", "KS-A").is_err());
    }

    #[test]
    fn blank_text() {
        assert!(require_text("Reason", "   ").is_err());
        assert!(require_text("Reason", "Annual due").is_ok());
    }

    #[test]
    fn date_ranges() {
        let a = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert!(validate_date_range(a, b).is_ok());
        assert!(validate_date_range(a, a).is_ok());
        assert!(validate_date_range(b, a).is_err());
    }
}
