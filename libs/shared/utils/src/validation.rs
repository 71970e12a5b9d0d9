use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::Serialize;

static STRICT_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

// Unanchored on purpose: any `x@y.z` run inside the input is accepted.
static PERMISSIVE_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid email pattern"));

static SPECIAL_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[!@#$%^&*(),.?":{}|<>]"#).expect("valid special char pattern"));

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Registration-grade check: the whole input must be `local@domain.tld` without whitespace.
pub fn is_valid_email(email: &str) -> bool {
    STRICT_EMAIL.is_match(email)
}

/// Booking-form check: accepts anything containing a `local@domain.tld` run.
pub fn is_plausible_email(email: &str) -> bool {
    PERMISSIVE_EMAIL.is_match(email)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordCheck {
    pub is_valid: bool,
    pub strength: Option<PasswordStrength>,
    pub message: String,
}

pub fn check_password(password: &str) -> PasswordCheck {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return PasswordCheck {
            is_valid: false,
            strength: None,
            message: format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
        };
    }

    let strength = if length < 8 {
        PasswordStrength::Weak
    } else {
        let classes = [
            password.chars().any(|c| c.is_ascii_uppercase()),
            password.chars().any(|c| c.is_ascii_lowercase()),
            password.chars().any(|c| c.is_ascii_digit()),
            SPECIAL_CHAR.is_match(password),
        ]
        .into_iter()
        .filter(|present| *present)
        .count();

        match classes {
            4 => PasswordStrength::Strong,
            2 | 3 => PasswordStrength::Medium,
            _ => PasswordStrength::Weak,
        }
    };

    PasswordCheck {
        is_valid: true,
        strength: Some(strength),
        message: format!("Password strength: {:?}", strength),
    }
}

/// Whole years between `date_of_birth` and `today`; negative when the birth date is in the future.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}
