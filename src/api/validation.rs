//! Input validation for form submissions.
//!
//! These checks run entirely client-side, before any request is sent. The
//! server still validates everything it receives.
//!
//! To collect several failures at once, feed the results into
//! `ValidationErrors::check` from the `error` module.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for a plausible email address
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)*\.[a-zA-Z]{2,}$"
    ).unwrap();
}

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LEN: usize = 6;

/// Minimum age of a registering user
pub const MIN_AGE: i64 = 18;

/// Minimum units in a donation or a request
pub const MIN_UNITS: i64 = 1;

/// Valid gender values
pub const VALID_GENDERS: [&str; 3] = ["male", "female", "other"];

/// Validate that a text field has a non-blank value
pub fn validate_required(value: Option<&str>) -> Result<(), String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err("Required".to_string()),
    }
}

/// Validate an email address
pub fn validate_email(email: Option<&str>) -> Result<(), String> {
    validate_required(email)?;
    let email = email.unwrap_or_default().trim();

    if email.len() > 254 {
        return Err("Email is too long (max 254 characters)".to_string());
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email".to_string());
    }

    Ok(())
}

/// Validate a registration password
pub fn validate_password(password: Option<&str>) -> Result<(), String> {
    validate_required(password)?;
    if password.unwrap_or_default().chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }
    Ok(())
}

/// Validate the age of a registering user
pub fn validate_age(age: Option<i64>) -> Result<(), String> {
    match age {
        None => Err("Required".to_string()),
        Some(a) if a < MIN_AGE => Err(format!("Must be at least {} years old", MIN_AGE)),
        Some(a) if a > 150 => Err("Age is not plausible".to_string()),
        Some(_) => Ok(()),
    }
}

/// Validate a unit count for a donation or a request
pub fn validate_quantity(quantity: Option<i64>) -> Result<(), String> {
    match quantity {
        None => Err("Required".to_string()),
        Some(q) if q < MIN_UNITS => Err(format!("Must be at least {} unit", MIN_UNITS)),
        Some(_) => Ok(()),
    }
}

/// Validate a stock count; zero is allowed, negative is not
pub fn validate_stock(quantity: Option<i64>) -> Result<(), String> {
    match quantity {
        None => Err("Required".to_string()),
        Some(q) if q < 0 => Err("Quantity cannot be negative".to_string()),
        Some(_) => Ok(()),
    }
}

/// Validate a gender value
pub fn validate_gender(gender: Option<&str>) -> Result<(), String> {
    validate_required(gender)?;
    let lower = gender.unwrap_or_default().trim().to_lowercase();
    if !VALID_GENDERS.contains(&lower.as_str()) {
        return Err(format!(
            "Invalid gender. Must be one of: {}",
            VALID_GENDERS.join(", ")
        ));
    }
    Ok(())
}

/// Validate a selection that refers to a record by id
pub fn validate_selected_id(id: Option<i64>) -> Result<(), String> {
    match id {
        None => Err("Required".to_string()),
        Some(v) if v <= 0 => Err("Invalid selection".to_string()),
        Some(_) => Ok(()),
    }
}

/// Parse a numeric text field. Blank input is `Ok(None)` so that the
/// range check can report "Required".
pub fn parse_number(value: Option<&str>) -> Result<Option<i64>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse::<i64>()
            .map(Some)
            .map_err(|_| "Must be a number".to_string()),
    }
}

/// Parse an enum-valued field, reporting "Required" when it is blank
pub fn parse_choice<T>(value: Option<&str>) -> Result<T, String>
where
    T: std::str::FromStr<Err = String>,
{
    validate_required(value)?;
    value.unwrap_or_default().parse::<T>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BloodType, Role};

    #[test]
    fn test_validate_required() {
        assert!(validate_required(Some("x")).is_ok());
        assert_eq!(validate_required(Some("   ")).unwrap_err(), "Required");
        assert_eq!(validate_required(None).unwrap_err(), "Required");
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email(Some("ada@example.com")).is_ok());
        assert!(validate_email(Some("first.last+tag@sub.example.org")).is_ok());

        assert_eq!(validate_email(None).unwrap_err(), "Required");
        assert_eq!(validate_email(Some("not-an-email")).unwrap_err(), "Invalid email");
        assert!(validate_email(Some("a@b")).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password(Some("secret")).is_ok());
        assert_eq!(
            validate_password(Some("12345")).unwrap_err(),
            "Password must be at least 6 characters"
        );
        assert!(validate_password(None).is_err());
    }

    #[test]
    fn test_validate_age() {
        assert!(validate_age(Some(18)).is_ok());
        assert!(validate_age(Some(64)).is_ok());
        assert_eq!(validate_age(Some(17)).unwrap_err(), "Must be at least 18 years old");
        assert!(validate_age(None).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(Some(1)).is_ok());
        assert!(validate_quantity(Some(3)).is_ok());
        assert_eq!(validate_quantity(Some(0)).unwrap_err(), "Must be at least 1 unit");
        assert_eq!(validate_quantity(Some(-2)).unwrap_err(), "Must be at least 1 unit");
        assert_eq!(validate_quantity(None).unwrap_err(), "Required");
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(Some(0)).is_ok());
        assert!(validate_stock(Some(-1)).is_err());
    }

    #[test]
    fn test_validate_gender() {
        assert!(validate_gender(Some("female")).is_ok());
        assert!(validate_gender(Some("Other")).is_ok());
        assert!(validate_gender(Some("unknown")).is_err());
        assert!(validate_gender(None).is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(Some(" 12 ")).unwrap(), Some(12));
        assert_eq!(parse_number(Some("")).unwrap(), None);
        assert_eq!(parse_number(None).unwrap(), None);
        assert_eq!(parse_number(Some("two")).unwrap_err(), "Must be a number");
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice::<BloodType>(Some("O+")).unwrap(), BloodType::OPositive);
        assert_eq!(parse_choice::<Role>(Some("donor")).unwrap(), Role::Donor);
        assert_eq!(parse_choice::<BloodType>(Some("")).unwrap_err(), "Required");
        assert!(parse_choice::<BloodType>(Some("Z+")).is_err());
    }
}
