use crate::models::{NewUser, UserInput};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// Hardcoded regex patterns - guaranteed to be valid at compile time
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$").unwrap()
});

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[1-9][0-9]{0,15}$").unwrap());

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 50;
pub const ADDRESS_MIN: usize = 5;
pub const ADDRESS_MAX: usize = 200;
const EMAIL_MAX: usize = 254;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validates every field of `input` and returns the normalized record, or
/// the full list of problems found.
///
/// Surrounding whitespace is trimmed from all fields and the email is
/// lowercased before checks run.
pub fn validate_user_input(input: &UserInput) -> Result<NewUser, Vec<FieldError>> {
    let name = trimmed(&input.name);
    let email = trimmed(&input.email).to_lowercase();
    let phone = trimmed(&input.phone);
    let address = trimmed(&input.address);

    let mut errors = Vec::new();

    if name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    } else if !length_between(name, NAME_MIN, NAME_MAX) {
        errors.push(FieldError::new(
            "name",
            format!("Name must be between {NAME_MIN} and {NAME_MAX} characters"),
        ));
    }

    if !is_valid_email(&email) {
        errors.push(FieldError::new("email", "Please provide a valid email"));
    }

    if !PHONE_PATTERN.is_match(phone) {
        errors.push(FieldError::new("phone", "Please provide a valid phone number"));
    }

    if address.is_empty() {
        errors.push(FieldError::new("address", "Address is required"));
    } else if !length_between(address, ADDRESS_MIN, ADDRESS_MAX) {
        errors.push(FieldError::new(
            "address",
            format!("Address must be between {ADDRESS_MIN} and {ADDRESS_MAX} characters"),
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewUser {
        name: name.to_string(),
        email,
        phone: phone.to_string(),
        address: address.to_string(),
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= EMAIL_MAX && EMAIL_PATTERN.is_match(email)
}

fn trimmed(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or_default()
}

fn length_between(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    (min..=max).contains(&len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> UserInput {
        UserInput::new(
            "Ada Lovelace",
            "ada@example.com",
            "+442071234567",
            "12 Babbage St, London",
        )
    }

    fn fields(errors: &[FieldError]) -> Vec<&'static str> {
        errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn accepts_valid_input() {
        let user = validate_user_input(&valid_input()).unwrap();
        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.phone, "+442071234567");
        assert_eq!(user.address, "12 Babbage St, London");
    }

    #[test]
    fn normalizes_email_and_trims_fields() {
        let input = UserInput::new("  Ada  ", " ADA@Example.COM ", "15551234", " 12 Babbage St ");
        let user = validate_user_input(&input).unwrap();
        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.address, "12 Babbage St");
    }

    #[test]
    fn reports_every_invalid_field() {
        let errors = validate_user_input(&UserInput::default()).unwrap_err();
        assert_eq!(fields(&errors), vec!["name", "email", "phone", "address"]);
        assert_eq!(errors[0].message, "Name is required");
        assert_eq!(errors[3].message, "Address is required");
    }

    #[test]
    fn enforces_name_length_bounds() {
        let mut input = valid_input();
        input.name = Some("A".to_string());
        let errors = validate_user_input(&input).unwrap_err();
        assert_eq!(fields(&errors), vec!["name"]);
        assert_eq!(errors[0].message, "Name must be between 2 and 50 characters");

        input.name = Some("x".repeat(50));
        assert!(validate_user_input(&input).is_ok());

        input.name = Some("x".repeat(51));
        assert!(validate_user_input(&input).is_err());
    }

    #[test]
    fn counts_characters_not_bytes() {
        let mut input = valid_input();
        input.name = Some("é".repeat(50));
        assert!(validate_user_input(&input).is_ok());
    }

    #[test]
    fn enforces_address_length_bounds() {
        let mut input = valid_input();
        input.address = Some("1 St".to_string());
        assert_eq!(fields(&validate_user_input(&input).unwrap_err()), vec!["address"]);

        input.address = Some("y".repeat(200));
        assert!(validate_user_input(&input).is_ok());

        input.address = Some("y".repeat(201));
        assert!(validate_user_input(&input).is_err());
    }

    #[test]
    fn phone_pattern() {
        for ok in ["1", "+1", "+442071234567", "1234567890123456", "+9999999999999999"] {
            let mut input = valid_input();
            input.phone = Some(ok.to_string());
            assert!(validate_user_input(&input).is_ok(), "{ok} should be accepted");
        }

        for bad in ["", "+", "0123", "12345678901234567", "555-1234", "++1", "1 234"] {
            let mut input = valid_input();
            input.phone = Some(bad.to_string());
            let errors = validate_user_input(&input).unwrap_err();
            assert_eq!(fields(&errors), vec!["phone"], "{bad} should be rejected");
        }
    }

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co.uk"));
        assert!(!is_valid_email("ada"));
        assert!(!is_valid_email("ada@"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada @example.com"));
    }
}
