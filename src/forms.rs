//! Forms
//!
//! Client-side validation for the checkout, login and signup forms. Validation collects every
//! failing field so the UI can show each message inline.

use std::fmt;

use thiserror::Error;

/// Minimum password length accepted by login and signup.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Minimum trimmed length of a signup name.
pub const MIN_NAME_LEN: usize = 2;

/// A form field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Customer or account name
    Name,

    /// Phone number
    Phone,

    /// Email address
    Email,

    /// Password
    Password,

    /// Password confirmation
    ConfirmPassword,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
        })
    }
}

/// A single failing field and the message to show next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field that failed
    pub field: Field,

    /// Message for the user
    pub message: &'static str,
}

/// One or more form fields failed validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{} invalid field(s): {}", .errors.len(), join_messages(.errors))]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    /// All failing fields, in form order.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// The message for a specific field, if it failed.
    pub fn message_for(&self, field: Field) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| format!("{}: {}", error.field, error.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Default)]
struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn push(&mut self, field: Field, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                errors: self.errors,
            })
        }
    }
}

/// Letters and whitespace only, non-empty after trimming.
pub fn is_valid_name(name: &str) -> bool {
    let name = name.trim();

    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
}

/// Digits only, non-empty after trimming.
pub fn is_valid_phone(phone: &str) -> bool {
    let phone = phone.trim();

    !phone.is_empty() && phone.chars().all(|c| c.is_ascii_digit())
}

/// `local@domain.tld`: no whitespace, one `@`, and a dot inside the domain.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();

    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .rsplit_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

/// Checkout details.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    /// Customer name
    pub name: String,

    /// Customer phone number
    pub phone: String,
}

impl CheckoutForm {
    /// Create a checkout form.
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }

    /// Validate both fields.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every invalid field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Collector::default();

        if !is_valid_name(&self.name) {
            errors.push(Field::Name, "Name should contain letters only.");
        }

        if !is_valid_phone(&self.phone) {
            errors.push(Field::Phone, "Phone should contain numbers only.");
        }

        errors.finish()
    }
}

/// Login details.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Account email
    pub email: String,

    /// Account password
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl LoginForm {
    /// Validate email and password.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every invalid field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Collector::default();

        if self.email.trim().is_empty() {
            errors.push(Field::Email, "Email is required");
        } else if !is_valid_email(&self.email) {
            errors.push(Field::Email, "Please enter a valid email address");
        }

        check_password(&mut errors, &self.password);

        errors.finish()
    }
}

/// Signup details.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    /// Full name
    pub name: String,

    /// Account email
    pub email: String,

    /// Chosen password
    pub password: String,

    /// Password typed a second time
    pub confirm_password: String,
}

impl fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl SignupForm {
    /// Validate every signup field.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every invalid field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Collector::default();
        let name = self.name.trim();

        if name.is_empty() {
            errors.push(Field::Name, "Full name is required");
        } else if name.chars().count() < MIN_NAME_LEN {
            errors.push(Field::Name, "Full name must be at least 2 characters");
        }

        if self.email.trim().is_empty() {
            errors.push(Field::Email, "Email is required");
        } else if !is_valid_email(&self.email) {
            errors.push(Field::Email, "Please enter a valid email address");
        }

        check_password(&mut errors, &self.password);

        if self.confirm_password.is_empty() {
            errors.push(Field::ConfirmPassword, "Please confirm your password");
        } else if self.password != self.confirm_password {
            errors.push(Field::ConfirmPassword, "Passwords do not match");
        }

        errors.finish()
    }
}

fn check_password(errors: &mut Collector, password: &str) {
    if password.is_empty() {
        errors.push(Field::Password, "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(Field::Password, "Password must be at least 6 characters");
    }
}
