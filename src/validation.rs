//! Input schema for the sign-in form.

use lazy_regex::{lazy_regex, Lazy, Regex};
use serde::Deserialize;
use std::collections::HashMap;

pub const INVALID_EMAIL: &str = "Invalid email";

/// Field name to message, rendered next to the matching input.
pub type FieldErrors = HashMap<String, String>;

static EMAIL_REGEX: Lazy<Regex> = lazy_regex!(r"^[A-Z0-9_'+\-.]*[A-Z0-9_+-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$"i);

/// Raw form body of the email sign-in form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserAuthForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub from: Option<String>,
}

/// Email that passed [`UserAuthForm::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidEmail(String);

impl ValidEmail {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl UserAuthForm {
    pub fn validate(&self) -> Result<ValidEmail, FieldErrors> {
        if is_valid_email(&self.email) {
            Ok(ValidEmail(self.email.clone()))
        } else {
            let mut errors = FieldErrors::new();
            errors.insert("email".to_string(), INVALID_EMAIL.to_string());
            Err(errors)
        }
    }
}

/// Syntactic email check.
///
/// Local part: `[A-Za-z0-9_'+\-.]`, not starting with `.`, ending in
/// `[A-Za-z0-9_+\-]`. Domain: dot-separated labels that start alphanumeric and
/// contain only alphanumerics or `-`, ending in an alphabetic TLD of two or
/// more letters. `..` is not allowed anywhere.
pub fn is_valid_email(input: &str) -> bool {
    // The regex engine has no lookahead, so these two stay outside the pattern.
    if input.starts_with('.') || input.contains("..") {
        return false;
    }

    EMAIL_REGEX.is_match(input)
}
