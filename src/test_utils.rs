pub mod test_helpers {
    use crate::models::User;
    use chrono::{DateTime, Utc};
    use sqlx::{
        sqlite::{SqliteConnectOptions, SqlitePoolOptions},
        SqlitePool,
    };
    use std::str::FromStr;
    use tempfile::NamedTempFile;
    use uuid::Uuid;

    /// Create a new in-memory SQLite database for testing
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.with_regexp();

        // A single long-lived connection keeps the in-memory database alive
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        crate::db::run_migrations(&pool).await?;

        Ok(pool)
    }

    /// Create a temporary file-based SQLite database for testing
    /// Useful when several connections must see the same data
    pub async fn create_test_db_file() -> Result<(SqlitePool, NamedTempFile), sqlx::Error> {
        let temp_file = NamedTempFile::new().map_err(sqlx::Error::Io)?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| sqlx::Error::Configuration("Invalid database path".into()))?;
        let database_url = format!("sqlite://{}", db_path);

        let pool = crate::db::create_pool(&database_url).await?;
        crate::db::run_migrations(&pool).await?;

        Ok((pool, temp_file))
    }

    /// Insert a user row directly, bypassing validation and the service layer
    pub async fn insert_test_user(
        pool: &SqlitePool,
        name: &str,
        email: &str,
        created_at: DateTime<Utc>,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, phone, address, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, name, email, phone, address, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .bind(email)
        .bind("+15550000000")
        .bind("1 Test Street")
        .bind(created_at)
        .bind(created_at)
        .fetch_one(pool)
        .await
    }

    /// Insert `count` users named "User 01".."User NN", each created one
    /// second after the previous one
    pub async fn seed_users(pool: &SqlitePool, count: usize) -> Result<Vec<User>, sqlx::Error> {
        let start = Utc::now() - chrono::Duration::days(1);
        let mut users = Vec::with_capacity(count);
        for i in 1..=count {
            let created_at = start + chrono::Duration::seconds(i as i64);
            let user = insert_test_user(
                pool,
                &format!("User {:02}", i),
                &format!("user{:02}@example.com", i),
                created_at,
            )
            .await?;
            users.push(user);
        }
        Ok(users)
    }
}

// Re-export commonly used test functions at module level for convenience
// Note: This is test-only code. Panic on error is acceptable in tests.
#[cfg(test)]
pub async fn create_test_pool() -> sqlx::SqlitePool {
    match test_helpers::create_test_db().await {
        Ok(pool) => pool,
        Err(e) => panic!("Failed to create test pool: {}", e),
    }
}
