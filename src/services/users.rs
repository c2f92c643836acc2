//! User management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, User, UserChanges, UserQuery},
    repository::SharedRepository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: SharedRepository,
}

impl UsersService {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }

    /// List users, optionally filtered by a name substring
    pub async fn search_users(&self, query: &UserQuery) -> AppResult<Vec<User>> {
        let repo = self.repository.read().await;
        let users = match &query.name {
            Some(name) => repo.users.search_by_name(name),
            None => repo.users.list(),
        };
        Ok(users)
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: &str) -> AppResult<User> {
        self.repository
            .read()
            .await
            .users
            .get_by_id(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Register a new user
    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        let user = user.trimmed();
        user.validate()?;

        let created = self.repository.write().await.users.create(user.into())?;
        tracing::info!("User registered: {}", created);
        Ok(created)
    }

    /// Update editable fields of a user
    pub async fn update_user(&self, id: &str, changes: UserChanges) -> AppResult<User> {
        let changes = changes.trimmed();
        changes.validate()?;
        if changes.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }

        let updated = self.repository.write().await.users.update(id, changes)?;
        tracing::info!("User updated: {}", updated);
        Ok(updated)
    }

    /// Delete a user. Refused while the user holds active loans.
    pub async fn delete_user(&self, id: &str) -> AppResult<User> {
        let mut repo = self.repository.write().await;

        let active = repo.loans.active_for_user(id).len();
        if active > 0 {
            tracing::warn!("Refusing to delete user {}: {} active loan(s)", id, active);
            return Err(AppError::BusinessRule(
                "Cannot delete the user because they have active loans".to_string(),
            ));
        }

        let removed = repo.users.delete(id)?;
        tracing::info!("User deleted: {}", removed);
        Ok(removed)
    }
}
