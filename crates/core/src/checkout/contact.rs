//! Contact form validation

use std::{fmt, sync::LazyLock};

use regex::Regex;
use thiserror::Error;

static EMAIL_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"));

/// Contact form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    /// Phone number, required.
    Phone,

    /// Email address, optional.
    Email,
}

impl ContactField {
    /// DOM id of the input to focus when this field is rejected.
    pub fn input_id(self) -> &'static str {
        match self {
            Self::Phone => "user-phone",
            Self::Email => "user-email",
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Phone => "teléfono",
            Self::Email => "correo electrónico",
        })
    }
}

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    /// The field is required and was left blank.
    Required,

    /// The value does not look like an email address.
    InvalidEmail,
}

/// A rejected contact form field.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("{}", validation_message(.field, .reason))]
pub struct ValidationError {
    /// Field to focus
    pub field: ContactField,

    /// What is wrong with it
    pub reason: ValidationReason,
}

impl ValidationError {
    /// User-facing message.
    pub fn message(&self) -> String {
        validation_message(&self.field, &self.reason)
    }
}

#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "thiserror format arguments borrow the fields"
)]
fn validation_message(field: &ContactField, reason: &ValidationReason) -> String {
    match reason {
        ValidationReason::Required => format!("Completá el campo {field}."),
        ValidationReason::InvalidEmail => format!("Ingresá un {field} válido."),
    }
}

/// Checkout contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    /// Phone number to call back
    pub phone: String,

    /// Email address
    pub email: Option<String>,
}

impl ContactForm {
    /// Form with only a phone number.
    pub fn with_phone(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            email: None,
        }
    }

    /// Check the fields in display order, stopping at the first rejection.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the field to focus.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.phone.trim().is_empty() {
            return Err(ValidationError {
                field: ContactField::Phone,
                reason: ValidationReason::Required,
            });
        }

        if let Some(email) = self.email() {
            let matches = EMAIL_PATTERN
                .as_ref()
                .is_ok_and(|pattern| pattern.is_match(email));

            if !matches {
                return Err(ValidationError {
                    field: ContactField::Email,
                    reason: ValidationReason::InvalidEmail,
                });
            }
        }

        Ok(())
    }

    /// Trimmed phone number.
    pub fn phone(&self) -> &str {
        self.phone.trim()
    }

    /// Trimmed email, `None` when blank.
    pub fn email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}
