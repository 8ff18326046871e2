use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> CoreResult<Self> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(CoreError::ValidationError(format!(
                "unknown role: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: String,
    pub nic: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Validates identity fields and normalizes the email to lowercase.
    /// The password is hashed by the caller before this is constructed.
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        password_hash: String,
        phone: String,
        nic: String,
    ) -> CoreResult<Self> {
        if first_name.trim().is_empty() {
            return Err(CoreError::ValidationError("First name is required".into()));
        }
        if last_name.trim().is_empty() {
            return Err(CoreError::ValidationError("Last name is required".into()));
        }
        validate_email(&email)?;
        validate_phone(&phone)?;
        validate_nic(&nic)?;
        Ok(Self {
            id: Uuid::new_v4(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email: email.to_lowercase(),
            password_hash,
            phone,
            nic,
            role: Role::User,
            created_at: Utc::now(),
        })
    }
}

/// The authenticated caller of an operation, as established by the HTTP
/// boundary. Ownership checks live here so services stay auth-agnostic.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Owner-or-admin rule used by all booking reads and cancellation.
    pub fn can_access(&self, owner: Uuid) -> bool {
        self.user_id == owner || self.is_admin()
    }
}

pub fn validate_email(email: &str) -> CoreResult<()> {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.ends_with('.') {
        return Err(CoreError::ValidationError(
            "Please provide a valid email".into(),
        ));
    }
    Ok(())
}

/// Optional leading '+', then at least ten digits, spaces, or dashes.
pub fn validate_phone(phone: &str) -> CoreResult<()> {
    let rest = phone.strip_prefix('+').unwrap_or(phone);
    let valid = rest.len() >= 10
        && rest
            .chars()
            .all(|c| c.is_ascii_digit() || c == ' ' || c == '-');
    if !valid {
        return Err(CoreError::ValidationError(
            "Please provide a valid phone number".into(),
        ));
    }
    Ok(())
}

/// Sri Lankan NIC: nine digits followed by v/V/x/X.
pub fn validate_nic(nic: &str) -> CoreResult<()> {
    let bytes = nic.as_bytes();
    let valid = bytes.len() == 10
        && bytes[..9].iter().all(|b| b.is_ascii_digit())
        && matches!(bytes[9], b'v' | b'V' | b'x' | b'X');
    if !valid {
        return Err(CoreError::ValidationError(
            "Please provide a valid NIC".into(),
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> CoreResult<()> {
    if password.len() < 8 {
        return Err(CoreError::ValidationError(
            "Password must be at least 8 characters".into(),
        ));
    }
    Ok(())
}
