//! Users repository backed by a [`RecordList`]

use crate::{
    collections::RecordList,
    error::{AppError, AppResult},
    models::user::{User, UserChanges},
};

use super::books::contains_ci;

#[derive(Debug, Clone, Default)]
pub struct UsersRepository {
    users: RecordList<User>,
}

impl UsersRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.users.len()
    }

    /// Get user by ID
    pub fn get_by_id(&self, id: &str) -> Option<&User> {
        self.users.find(|user| user.id == id)
    }

    pub fn exists(&self, id: &str) -> bool {
        self.get_by_id(id).is_some()
    }

    /// Users whose name contains `name`, in insertion order
    pub fn search_by_name(&self, name: &str) -> Vec<User> {
        self.users
            .iter()
            .filter(|user| contains_ci(&user.name, name))
            .cloned()
            .collect()
    }

    pub fn list(&self) -> Vec<User> {
        self.users.to_vec()
    }

    /// Append a new user. Fails if the id is taken.
    pub fn create(&mut self, user: User) -> AppResult<User> {
        if self.exists(&user.id) {
            return Err(AppError::Conflict(format!(
                "A user with id {} already exists",
                user.id
            )));
        }
        self.users.push(user.clone());
        Ok(user)
    }

    pub fn update(&mut self, id: &str, changes: UserChanges) -> AppResult<User> {
        if !self.users.update(|user| user.id == id, changes) {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        self.get_by_id(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    pub fn delete(&mut self, id: &str) -> AppResult<User> {
        self.users
            .remove(|user| user.id == id)
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }
}

impl FromIterator<User> for UsersRepository {
    fn from_iter<I: IntoIterator<Item = User>>(iter: I) -> Self {
        Self {
            users: iter.into_iter().collect(),
        }
    }
}
