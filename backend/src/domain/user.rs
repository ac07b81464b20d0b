//! User profile entity and provisioning validation.
//!
//! Profiles are created by an owner or admin and deactivated rather than
//! deleted. Passwords only pass through provisioning for validation; they are
//! handed to the authentication provider and never stored on the profile.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::role::Role;

/// Validation errors raised while building or provisioning a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyEmail,
    InvalidEmail,
    EmptyFullName,
    FullNameTooLong { max: usize },
    PhoneTooLong { max: usize },
    ContractorWithoutCompany,
    PasswordTooShort { min: usize },
    PasswordTooLong { max: usize },
    PasswordMissingLowercase,
    PasswordMissingUppercase,
    PasswordMissingDigit,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email address is not valid"),
            Self::EmptyFullName => write!(f, "full name must not be empty"),
            Self::FullNameTooLong { max } => {
                write!(f, "full name must be at most {max} characters")
            }
            Self::PhoneTooLong { max } => {
                write!(f, "phone number must be at most {max} characters")
            }
            Self::ContractorWithoutCompany => {
                write!(f, "contractor accounts must belong to a company")
            }
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordTooLong { max } => {
                write!(f, "password must be at most {max} characters")
            }
            Self::PasswordMissingLowercase => {
                write!(f, "password must include a lowercase letter")
            }
            Self::PasswordMissingUppercase => {
                write!(f, "password must include an uppercase letter")
            }
            Self::PasswordMissingDigit => write!(f, "password must include a number"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Maximum accepted e-mail length.
pub const EMAIL_MAX: usize = 254;
/// Maximum accepted full-name length.
pub const FULL_NAME_MAX: usize = 100;
/// Maximum accepted phone-number length.
pub const PHONE_MAX: usize = 20;
/// Password length bounds.
pub const PASSWORD_MIN: usize = 8;
/// Upper bound on password length.
pub const PASSWORD_MAX: usize = 128;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validate an e-mail address, returning its trimmed form.
pub fn validate_email(email: &str) -> Result<String, UserValidationError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }
    if trimmed.chars().count() > EMAIL_MAX || !email_regex().is_match(trimmed) {
        return Err(UserValidationError::InvalidEmail);
    }
    Ok(trimmed.to_owned())
}

/// Validate password complexity without retaining the value.
pub fn validate_password(password: &Zeroizing<String>) -> Result<(), UserValidationError> {
    let length = password.chars().count();
    if length < PASSWORD_MIN {
        return Err(UserValidationError::PasswordTooShort { min: PASSWORD_MIN });
    }
    if length > PASSWORD_MAX {
        return Err(UserValidationError::PasswordTooLong { max: PASSWORD_MAX });
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(UserValidationError::PasswordMissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(UserValidationError::PasswordMissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(UserValidationError::PasswordMissingDigit);
    }
    Ok(())
}

/// Input payload for [`UserProfile::new`].
#[derive(Debug, Clone)]
pub struct UserProfileDraft {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub company_id: Option<Uuid>,
}

/// Application user profile.
///
/// ## Invariants
/// - `email` is trimmed, non-empty, and shaped like an address.
/// - `full_name` is non-empty once trimmed and at most 100 characters.
/// - `company_id` is present whenever `role` is [`Role::Contractor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub is_active: bool,
    pub company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Build a validated, active profile.
    pub fn new(draft: UserProfileDraft, now: DateTime<Utc>) -> Result<Self, UserValidationError> {
        let email = validate_email(&draft.email)?;
        let full_name = draft.full_name.trim().to_owned();
        if full_name.is_empty() {
            return Err(UserValidationError::EmptyFullName);
        }
        if full_name.chars().count() > FULL_NAME_MAX {
            return Err(UserValidationError::FullNameTooLong { max: FULL_NAME_MAX });
        }
        let phone = draft
            .phone
            .map(|p| p.trim().to_owned())
            .filter(|p| !p.is_empty());
        if let Some(phone) = &phone {
            if phone.chars().count() > PHONE_MAX {
                return Err(UserValidationError::PhoneTooLong { max: PHONE_MAX });
            }
        }
        if draft.role == Role::Contractor && draft.company_id.is_none() {
            return Err(UserValidationError::ContractorWithoutCompany);
        }

        Ok(Self {
            id: draft.id,
            email,
            full_name,
            role: draft.role,
            phone,
            is_active: true,
            company_id: draft.company_id,
            created_at: now,
            updated_at: now,
        })
    }
}
