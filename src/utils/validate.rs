use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AppError, AppResult};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Simple local@domain.tld shape, not full RFC
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex")
});

static OTP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}$").expect("invalid otp regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_otp(code: &str) -> bool {
    OTP_RE.is_match(code)
}

pub fn require_email(field: &str, email: &str) -> AppResult<()> {
    if !is_valid_email(email) {
        return Err(AppError::validation(field, "A valid email is required"));
    }
    Ok(())
}

pub fn require_non_empty(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(field, "This field is required"));
    }
    Ok(())
}

pub fn require_otp_format(code: &str) -> AppResult<()> {
    if !is_valid_otp(code) {
        return Err(AppError::validation("otp", "OTP must be 4 digits"));
    }
    Ok(())
}

pub fn require_new_password(new_password: &str, confirm_password: &str) -> AppResult<()> {
    if new_password.len() < 6 {
        return Err(AppError::validation(
            "new_password",
            "Password must be at least 6 characters",
        ));
    }
    if new_password != confirm_password {
        return Err(AppError::validation(
            "confirm_password",
            "Passwords do not match",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("jo@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.org"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_otp_format() {
        assert!(is_valid_otp("1234"));
        assert!(is_valid_otp("0000"));
        assert!(!is_valid_otp("12a4"));
        assert!(!is_valid_otp("123"));
        assert!(!is_valid_otp("12345"));
        assert!(!is_valid_otp(""));
    }

    #[test]
    fn test_new_password_rules() {
        assert!(require_new_password("secret1", "secret1").is_ok());
        assert!(require_new_password("short", "short").is_err());
        assert!(require_new_password("secret1", "secret2").is_err());
    }

    #[test]
    fn test_non_empty() {
        assert!(require_non_empty("phone", "555").is_ok());
        assert!(require_non_empty("phone", "  ").is_err());
    }
}
