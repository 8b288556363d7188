use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::info;

use super::CredentialStore;
use crate::config::DatabaseSettings;
use crate::error::{AuthError, Result};
use crate::models::User;

/// PostgreSQL-backed credential store (`users` table)
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool and apply pending migrations.
    pub async fn connect(settings: &DatabaseSettings) -> std::result::Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
            .connect(&settings.url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!(
            max_connections = settings.max_connections,
            "Database pool ready, migrations applied"
        );

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, full_name, password_hash, role_code, created_at, created_by
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, full_name, password_hash, role_code, created_at, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.password_hash)
        .bind(&user.role_code)
        .bind(user.created_at)
        .bind(&user.created_by)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AuthError::Conflict(format!("email {} is already registered", user.email))
            }
            _ => AuthError::from(e),
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database_settings() -> Option<DatabaseSettings> {
        std::env::var("DATABASE_URL").ok().map(|url| DatabaseSettings {
            url,
            max_connections: 2,
            acquire_timeout_secs: 5,
        })
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing at a disposable PostgreSQL"]
    async fn test_insert_find_and_conflict() {
        let Some(settings) = database_settings() else {
            return;
        };
        let store = PgCredentialStore::connect(&settings)
            .await
            .expect("database should be reachable");

        let email = format!("{}@example.com", uuid::Uuid::new_v4());
        let user = User::new_customer(&email, "Alice", "$argon2id$placeholder".to_string());

        store.insert(&user).await.expect("first insert");
        let found = store
            .find_by_identifier(&email)
            .await
            .expect("lookup")
            .expect("record exists");
        assert_eq!(found.id, user.id);
        assert_eq!(found.role_code, "customer");

        let duplicate = User::new_customer(&email, "Alice", "$argon2id$placeholder".to_string());
        assert!(matches!(
            store.insert(&duplicate).await,
            Err(AuthError::Conflict(_))
        ));
    }
}
