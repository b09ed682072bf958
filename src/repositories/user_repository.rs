use crate::models::{NewUser, User, UserFilter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("User already exists")]
    AlreadyExists,
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Persistence boundary for user records.
///
/// Implementations must enforce email uniqueness themselves and report a
/// violation as [`RepositoryError::AlreadyExists`]; callers treat their own
/// pre-checks as advisory only.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    /// Page of matching records, newest first, plus the total match count.
    async fn find_many(
        &self,
        filter: &UserFilter,
        skip: i64,
        limit: i64,
    ) -> RepositoryResult<(Vec<User>, i64)>;
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>>;
    /// Case-insensitive lookup.
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    /// Every record, ordered by name ascending.
    async fn find_all_by_name(&self) -> RepositoryResult<Vec<User>>;
    async fn insert(&self, user: &NewUser, now: DateTime<Utc>) -> RepositoryResult<User>;
    async fn update_by_id(
        &self,
        id: &str,
        user: &NewUser,
        now: DateTime<Utc>,
    ) -> RepositoryResult<Option<User>>;
    /// Returns whether a record was removed.
    async fn delete_by_id(&self, id: &str) -> RepositoryResult<bool>;
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, name, email, phone, address, created_at, updated_at";

/// Builds a case-insensitive REGEXP pattern matching `term` literally
/// anywhere in the value.
fn contains_pattern(term: &str) -> String {
    format!("(?i){}", regex::escape(term))
}

fn map_write_error(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            RepositoryError::AlreadyExists
        }
        _ => RepositoryError::Database(err),
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_many(
        &self,
        filter: &UserFilter,
        skip: i64,
        limit: i64,
    ) -> RepositoryResult<(Vec<User>, i64)> {
        let Some(term) = filter.search.as_deref() else {
            let users = sqlx::query_as::<_, User>(&format!(
                r#"
                SELECT {USER_COLUMNS}
                FROM users
                ORDER BY created_at DESC, rowid DESC
                LIMIT ? OFFSET ?
                "#
            ))
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?;

            let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
                .fetch_one(&self.pool)
                .await?;

            return Ok((users, total));
        };

        // REGEXP is registered on every connection by `db::create_pool`
        let pattern = contains_pattern(term);

        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE name REGEXP ? OR email REGEXP ?
            ORDER BY created_at DESC, rowid DESC
            LIMIT ? OFFSET ?
            "#
        ))
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE name REGEXP ? OR email REGEXP ?",
        )
        .bind(&pattern)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok((users, total))
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ? COLLATE NOCASE"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_all_by_name(&self) -> RepositoryResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY name ASC, rowid ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn insert(&self, user: &NewUser, now: DateTime<Utc>) -> RepositoryResult<User> {
        let id = Uuid::new_v4().to_string();

        let created = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, name, email, phone, address, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(created)
    }

    async fn update_by_id(
        &self,
        id: &str,
        user: &NewUser,
        now: DateTime<Utc>,
    ) -> RepositoryResult<Option<User>> {
        let updated = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = ?, email = ?, phone = ?, address = ?, updated_at = ?
            WHERE id = ?
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(updated)
    }

    async fn delete_by_id(&self, id: &str) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
