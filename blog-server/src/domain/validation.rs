//! Field-level validation.
//!
//! Every write path runs its payload through one of the `validate_*`
//! functions before touching a repository. Failures are collected per field
//! so the client sees all problems at once, rendered as
//! `{"field": ["message", ...]}`.

use crate::domain::blog::{CreateBlogRequest, NewBlog};
use crate::domain::user::{LoginUserRequest, NewUser, RegisterUserRequest};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";

const USERNAME_MAX_LEN: usize = 150;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// `Ok(())` when nothing was collected, otherwise the whole map as an error.
    pub fn into_result(self) -> Result<(), crate::domain::DomainError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(crate::domain::DomainError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Checks presence and non-blankness, returning the trimmed value.
fn required_text(errors: &mut FieldErrors, field: &str, value: Option<String>) -> String {
    match value {
        None => {
            errors.add(field, REQUIRED);
            String::new()
        }
        Some(v) if v.trim().is_empty() => {
            errors.add(field, BLANK);
            String::new()
        }
        Some(v) => v.trim().to_string(),
    }
}

pub fn validate_new_blog(req: CreateBlogRequest) -> Result<NewBlog, crate::domain::DomainError> {
    let mut errors = FieldErrors::default();

    let title = required_text(&mut errors, "title", req.title);
    let description = required_text(&mut errors, "description", req.description);

    errors.into_result()?;
    Ok(NewBlog { title, description })
}

pub fn validate_registration(
    req: RegisterUserRequest,
) -> Result<NewUser, crate::domain::DomainError> {
    let mut errors = FieldErrors::default();

    let username = required_text(&mut errors, "username", req.username);
    if !username.is_empty() {
        if username.chars().count() > USERNAME_MAX_LEN {
            errors.add(
                "username",
                format!(
                    "Ensure this field has no more than {} characters.",
                    USERNAME_MAX_LEN
                ),
            );
        }
        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
        {
            errors.add(
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        }
    }

    let email = required_text(&mut errors, "email", req.email);
    if !email.is_empty() && !looks_like_email(&email) {
        errors.add("email", "Enter a valid email address.");
    }

    // Passwords are not trimmed.
    let password = match req.password {
        None => {
            errors.add("password", REQUIRED);
            String::new()
        }
        Some(p) if p.is_empty() => {
            errors.add("password", BLANK);
            String::new()
        }
        Some(p) => p,
    };

    errors.into_result()?;
    Ok(NewUser {
        username,
        email,
        password,
    })
}

pub fn validate_login(req: LoginUserRequest) -> Result<(String, String), crate::domain::DomainError> {
    let mut errors = FieldErrors::default();

    let username = required_text(&mut errors, "username", req.username);
    let password = match req.password {
        Some(p) if !p.is_empty() => p,
        Some(_) => {
            errors.add("password", BLANK);
            String::new()
        }
        None => {
            errors.add("password", REQUIRED);
            String::new()
        }
    };

    errors.into_result()?;
    Ok((username, password))
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !value.chars().any(char::is_whitespace)
}
