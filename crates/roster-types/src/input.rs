use thiserror::Error;

use crate::User;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("All fields are required! ({0} is blank)")]
    Blank(&'static str),
}

/// Fields an operator supplies when creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl UserInput {
    /// Trims username and email and rejects blank fields. The password is
    /// kept exactly as typed.
    pub fn new(username: &str, email: &str, password: &str) -> Result<Self, InputError> {
        Ok(Self {
            username: required("username", username)?.trim().to_string(),
            email: required("email", email)?.trim().to_string(),
            password: required("password", password)?.to_string(),
        })
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, InputError> {
    if value.trim().is_empty() {
        return Err(InputError::Blank(field));
    }
    Ok(value)
}

/// Partial update of the mutable user fields. Id, creation time and posts
/// are not representable here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UserUpdate {
    /// Builds an update from prompt answers, where a blank answer means "keep".
    pub fn from_answers(username: &str, email: &str, password: &str) -> Self {
        Self {
            username: optional(username).map(|v| v.trim().to_string()),
            email: optional(email).map(|v| v.trim().to_string()),
            password: optional(password).map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password.is_none()
    }

    pub fn apply_to(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(password) = &self.password {
            user.password = password.clone();
        }
    }
}

fn optional(value: &str) -> Option<&str> {
    (!value.trim().is_empty()).then_some(value)
}
