use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Local, pre-network validation failure. Never reaches the gateway.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("required field missing: {0}")]
    MissingField(&'static str),
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}

/// Fails when `value` is empty or whitespace-only.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if !EMAIL_RE.is_match(email.trim()) {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(validate_email("tutor@casagialla.it").is_ok());
        assert!(validate_email(" tutor@casagialla.it ").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in ["", "tutor", "tutor@", "@casagialla.it", "a b@c.it", "a@b"] {
            assert!(validate_email(email).is_err(), "accepted {email:?}");
        }
    }
}
