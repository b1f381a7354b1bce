//! Authentication primitives: login credentials and registration input.
//!
//! Inbound payload parsing stays outside the domain; these constructors
//! validate raw strings before a handler talks to a service.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::{DisplayName, Email, Role, UserValidationError};

/// Minimum accepted password length for new accounts.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Longest password, in UTF-8 bytes, that bcrypt hashes without truncation.
pub const PASSWORD_MAX_BYTES: usize = 71;

/// Errors raised while validating login or registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Email was missing or malformed.
    InvalidEmail,
    /// Password was blank.
    EmptyPassword,
    /// Password is shorter than [`PASSWORD_MIN_LEN`].
    PasswordTooShort { min: usize },
    /// Password is longer than [`PASSWORD_MAX_BYTES`].
    PasswordTooLong { max: usize },
    /// Display name failed validation.
    DisplayName(UserValidationError),
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email address is not valid"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordTooLong { max } => {
                write!(f, "password must be at most {max} bytes")
            }
            Self::DisplayName(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is normalised (trimmed, lowercase).
/// - `password` is non-empty and keeps caller whitespace.
///
/// # Examples
/// ```
/// use barberbook::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ada@Example.com ", "hunter22").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = Email::new(email).map_err(|_| CredentialsValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email used for lookups.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: Email,
    password: Zeroizing<String>,
    display_name: DisplayName,
    role: Role,
}

impl Registration {
    /// Validate raw registration input. `role` defaults to [`Role::Client`].
    pub fn try_from_parts(
        email: &str,
        password: &str,
        display_name: &str,
        role: Option<Role>,
    ) -> Result<Self, CredentialsValidationError> {
        let email = Email::new(email).map_err(|_| CredentialsValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(CredentialsValidationError::PasswordTooShort {
                min: PASSWORD_MIN_LEN,
            });
        }
        if password.len() > PASSWORD_MAX_BYTES {
            return Err(CredentialsValidationError::PasswordTooLong {
                max: PASSWORD_MAX_BYTES,
            });
        }
        let display_name =
            DisplayName::new(display_name).map_err(CredentialsValidationError::DisplayName)?;
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
            display_name,
            role: role.unwrap_or(Role::Client),
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    pub fn role(&self) -> Role {
        self.role
    }
}
