use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

const NAME_ERROR: &str = "name is required and must be between 2 and 100 characters long";
const EMAIL_ERROR: &str = "email is required and must be a valid email address";
const AGE_ERROR: &str = "age, if provided, must be an integer between 0 and 120";

#[derive(Debug)]
pub struct Validation {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Checks the client-writable fields of `input`, collecting every violation
/// instead of stopping at the first. In partial mode a field is only checked
/// when its key is present in the payload; an explicit `null` counts as
/// present and fails its check.
pub fn validate(input: &Value, partial: bool) -> Validation {
    let mut errors = Vec::new();

    if !partial || input.get("name").is_some() {
        let ok = input
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .is_some_and(|name| (2..=100).contains(&name.chars().count()));
        if !ok {
            errors.push(NAME_ERROR.to_string());
        }
    }

    if !partial || input.get("email").is_some() {
        let ok = input
            .get("email")
            .and_then(Value::as_str)
            .is_some_and(|email| EMAIL_RE.is_match(email));
        if !ok {
            errors.push(EMAIL_ERROR.to_string());
        }
    }

    if let Some(age) = input.get("age") {
        let ok = age.as_i64().is_some_and(|age| (0..=120).contains(&age));
        if !ok {
            errors.push(AGE_ERROR.to_string());
        }
    }

    Validation {
        valid: errors.is_empty(),
        errors,
    }
}
