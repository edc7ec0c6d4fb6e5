use crate::domain::errors::{FieldError, ValidationError};

/// Collects field errors across a request body so clients get every problem at once.
///
/// Each check returns the normalized value when it passes. After `finish()`
/// succeeds, every required check has returned `Some`.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    // Required text, trimmed, with an inclusive character-count range.
    pub fn required_text(
        &mut self,
        field: &str,
        value: Option<&str>,
        min: usize,
        max: usize,
    ) -> Option<String> {
        let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
            self.reject(field, format!("{} is required", label(field)));
            return None;
        };
        let len = value.chars().count();
        if !(min..=max).contains(&len) {
            self.reject(
                field,
                format!("{} must be between {min} and {max} characters", label(field)),
            );
            return None;
        }
        Some(value.to_string())
    }

    // Required secret, taken as sent. Only an empty or all-blank value counts as missing.
    pub fn required_secret(
        &mut self,
        field: &str,
        value: Option<&str>,
        min: usize,
        max: usize,
    ) -> Option<String> {
        let Some(value) = value.filter(|value| !value.trim().is_empty()) else {
            self.reject(field, format!("{} is required", label(field)));
            return None;
        };
        let len = value.chars().count();
        if !(min..=max).contains(&len) {
            self.reject(
                field,
                format!("{} must be between {min} and {max} characters", label(field)),
            );
            return None;
        }
        Some(value.to_string())
    }

    // Optional text; blank counts as absent.
    pub fn optional_text(&mut self, field: &str, value: Option<&str>, max: usize) -> Option<String> {
        let value = value.map(str::trim).filter(|value| !value.is_empty())?;
        if value.chars().count() > max {
            self.reject(
                field,
                format!("{} must be at most {max} characters", label(field)),
            );
            return None;
        }
        Some(value.to_string())
    }

    // Required email, trimmed and lower-cased.
    pub fn email(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
            self.reject(field, "Email is required");
            return None;
        };
        if !is_valid_email(value) {
            self.reject(field, "Please provide a valid email address");
            return None;
        }
        Some(value.to_lowercase())
    }

    pub fn optional_email(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        let value = value.map(str::trim).filter(|value| !value.is_empty())?;
        self.email(field, Some(value))
    }

    // Optional phone number; separators are stripped, a leading '+' is kept.
    pub fn optional_phone(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        let value = value.map(str::trim).filter(|value| !value.is_empty())?;
        match normalize_phone(value) {
            Some(phone) => Some(phone),
            None => {
                self.reject(field, "Please provide a valid phone number");
                None
            }
        }
    }

    pub fn non_negative(&mut self, field: &str, value: Option<f64>) -> Option<f64> {
        match value {
            Some(amount) if amount.is_finite() && amount >= 0.0 => Some(amount),
            Some(_) => {
                self.reject(field, format!("{} must be a non-negative number", label(field)));
                None
            }
            None => {
                self.reject(field, format!("{} is required", label(field)));
                None
            }
        }
    }

    pub fn optional_non_negative(&mut self, field: &str, value: Option<f64>) -> Option<f64> {
        value?;
        self.non_negative(field, value)
    }

    pub fn optional_url(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        let value = value.map(str::trim).filter(|value| !value.is_empty())?;
        if !(value.starts_with("https://") || value.starts_with("http://")) {
            self.reject(field, format!("{} must be an http(s) URL", label(field)));
            return None;
        }
        Some(value.to_string())
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                details: self.errors,
            })
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) || value.len() > 254 {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && label
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

fn normalize_phone(value: &str) -> Option<String> {
    let (prefix, rest) = match value.strip_prefix('+') {
        Some(rest) => ("+", rest),
        None => ("", value),
    };
    let mut digits = String::with_capacity(rest.len());
    for c in rest.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' | '(' | ')' => {}
            _ => return None,
        }
    }
    if !(7..=15).contains(&digits.len()) {
        return None;
    }
    Some(format!("{prefix}{digits}"))
}

// "coupon_code" -> "Coupon code"
fn label(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
