//! User (library patron) model and related types

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::collections::Changeset;

/// Library user, identified by an opaque id such as `U001`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: String,
    /// Full name
    pub name: String,
    /// Contact information (email, phone, ...)
    pub contact: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            contact: contact.into(),
        }
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ID: {}, Name: {}, Contact: {}", self.id, self.name, self.contact)
    }
}

impl From<CreateUser> for User {
    fn from(user: CreateUser) -> Self {
        User::new(user.id, user.name, user.contact.unwrap_or_default())
    }
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateUser {
    #[validate(length(min = 1, message = "User id is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub contact: Option<String>,
}

impl CreateUser {
    /// Strip surrounding whitespace so blank fields fail validation
    pub fn trimmed(self) -> Self {
        Self {
            id: self.id.trim().to_string(),
            name: self.name.trim().to_string(),
            contact: self.contact.map(|c| c.trim().to_string()),
        }
    }
}

/// Editable user fields (the id is fixed once created)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UserChanges {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub contact: Option<String>,
}

impl UserChanges {
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.map(|n| n.trim().to_string()),
            contact: self.contact.map(|c| c.trim().to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.contact.is_none()
    }
}

impl Changeset<User> for UserChanges {
    fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(contact) = self.contact {
            user.contact = contact;
        }
    }
}

/// User query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    /// Case-insensitive name substring
    pub name: Option<String>,
}
