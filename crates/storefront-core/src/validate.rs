// ── Form validation ──
//
// Runs before any request. Failures land in a per-field map the host
// renders inline next to each input.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Minimum length for a new password.
pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 \-]{5,18}[0-9]$").expect("Invalid regex"));

static POSTAL_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 \-]{1,8}[A-Za-z0-9]$").expect("Invalid regex")
});

/// Field name → message, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error. The first message for a field is kept.
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Record "`label` is required" when `value` is blank.
    pub fn require(&mut self, field: &'static str, value: &str, label: &str) -> bool {
        if value.trim().is_empty() {
            self.insert(field, format!("{label} is required"));
            false
        } else {
            true
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// `Ok(())` when empty, otherwise a validation error carrying the map.
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.len() {
            0 => f.write_str("no errors"),
            1 => {
                let (_, msg) = self.0.iter().next().ok_or(fmt::Error)?;
                f.write_str(msg)
            }
            n => write!(f, "{n} fields need attention"),
        }
    }
}

/// Anything a form can submit.
pub trait Validate {
    fn validate(&self) -> FieldErrors;
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value.trim())
}

/// 7–20 characters of digits, spaces and dashes, optionally starting with `+`.
pub fn is_valid_phone(value: &str) -> bool {
    PHONE.is_match(value.trim())
}

pub fn is_valid_postal_code(value: &str) -> bool {
    POSTAL_CODE.is_match(value.trim())
}

/// Shared checks for a new password and its confirmation.
pub fn check_new_password(
    errors: &mut FieldErrors,
    field: &'static str,
    confirm_field: &'static str,
    password: &str,
    confirm: &str,
) {
    if password.is_empty() {
        errors.insert(field, "New password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert(
            field,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }
    if confirm != password {
        errors.insert(confirm_field, "Passwords do not match");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn patterns_compile() {
        for pattern in [&EMAIL, &PHONE, &POSTAL_CODE] {
            assert!(!LazyLock::force(pattern).as_str().is_empty());
        }
    }

    #[test]
    fn email_format() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("  ada+shop@mail.example.co.uk "));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada example@x.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn phone_format() {
        assert!(is_valid_phone("+33 1 23 45 67 89"));
        assert!(is_valid_phone("555-1234"));
        assert!(!is_valid_phone("12"));
        assert!(!is_valid_phone("call me"));
    }

    #[test]
    fn postal_code_format() {
        assert!(is_valid_postal_code("75002"));
        assert!(is_valid_postal_code("SW1A 1AA"));
        assert!(!is_valid_postal_code("7"));
        assert!(!is_valid_postal_code("!!!!"));
    }

    #[test]
    fn first_error_per_field_is_kept() {
        let mut errors = FieldErrors::new();
        errors.insert("email", "Email is required");
        errors.insert("email", "Email is invalid");
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.to_string(), "Email is required");
    }

    #[test]
    fn new_password_rules() {
        let mut errors = FieldErrors::new();
        check_new_password(&mut errors, "new", "confirm", "short", "shorter");
        assert_eq!(
            errors.get("new"),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(errors.get("confirm"), Some("Passwords do not match"));

        let mut ok = FieldErrors::new();
        check_new_password(&mut ok, "new", "confirm", "long enough", "long enough");
        assert!(ok.into_result().is_ok());
    }
}
