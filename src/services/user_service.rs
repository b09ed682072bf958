use crate::models::{PageRequest, Pagination, User, UserFilter, UserInput, UserPage};
use crate::repositories::user_repository::{RepositoryError, UserRepository};
use crate::services::export::CsvExport;
use crate::services::validation::{validate_user_input, FieldError};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
    #[error("Invalid user ID")]
    InvalidIdentifier,
    #[error("User not found")]
    UserNotFound,
    #[error("User with this email already exists")]
    EmailTaken,
    #[error("No users found to export")]
    EmptyResult,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

#[derive(Debug, Clone, Default)]
pub struct ListUsersQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_users(&self, query: ListUsersQuery) -> Result<UserPage, UserServiceError> {
        let request = PageRequest::new(query.page, query.limit);
        let filter = UserFilter::from_search(query.search.as_deref());

        let (users, total) = self
            .repository
            .find_many(&filter, request.skip(), request.limit())
            .await?;

        Ok(UserPage {
            users,
            pagination: Pagination::new(request, total),
        })
    }

    pub async fn get_user(&self, id: &str) -> Result<User, UserServiceError> {
        let id = parse_id(id)?;
        self.repository
            .find_by_id(&id)
            .await?
            .ok_or(UserServiceError::UserNotFound)
    }

    pub async fn create_user(&self, input: UserInput) -> Result<User, UserServiceError> {
        let new_user = validate_user_input(&input).map_err(UserServiceError::Validation)?;

        // Fast path; the store's unique index is still the authority
        if self.repository.find_by_email(&new_user.email).await?.is_some() {
            return Err(UserServiceError::EmailTaken);
        }

        match self.repository.insert(&new_user, Utc::now()).await {
            Ok(user) => {
                tracing::info!("Created user {}", user.id);
                Ok(user)
            }
            Err(RepositoryError::AlreadyExists) => {
                tracing::warn!("Concurrent create lost the email uniqueness race");
                Err(UserServiceError::EmailTaken)
            }
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn update_user(&self, id: &str, input: UserInput) -> Result<User, UserServiceError> {
        let new_user = validate_user_input(&input).map_err(UserServiceError::Validation)?;
        let id = parse_id(id)?;

        // Check if email is already taken by another user
        if let Some(existing_user) = self.repository.find_by_email(&new_user.email).await? {
            if existing_user.id != id {
                return Err(UserServiceError::EmailTaken);
            }
        }

        match self
            .repository
            .update_by_id(&id, &new_user, Utc::now())
            .await
        {
            Ok(Some(user)) => {
                tracing::info!("Updated user {}", user.id);
                Ok(user)
            }
            Ok(None) => Err(UserServiceError::UserNotFound),
            Err(RepositoryError::AlreadyExists) => {
                tracing::warn!("Concurrent update of {} lost the email uniqueness race", id);
                Err(UserServiceError::EmailTaken)
            }
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), UserServiceError> {
        let id = parse_id(id)?;

        if !self.repository.delete_by_id(&id).await? {
            return Err(UserServiceError::UserNotFound);
        }

        tracing::info!("Deleted user {}", id);
        Ok(())
    }

    /// Every user ordered by name, ready to be rendered as CSV.
    pub async fn export_users(&self) -> Result<CsvExport, UserServiceError> {
        let users = self.repository.find_all_by_name().await?;

        if users.is_empty() {
            return Err(UserServiceError::EmptyResult);
        }

        Ok(CsvExport::new(users))
    }
}

/// Identifiers are UUIDs; anything else is rejected before reaching the store.
fn parse_id(id: &str) -> Result<String, UserServiceError> {
    Uuid::parse_str(id.trim())
        .map(|uuid| uuid.to_string())
        .map_err(|_| UserServiceError::InvalidIdentifier)
}
