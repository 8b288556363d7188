/// Credential persistence
///
/// The session service reaches storage only through [`CredentialStore`].
/// Two adapters ship with the service: an in-memory map for tests and local
/// development, and PostgreSQL for deployed environments.
use async_trait::async_trait;

use crate::error::Result;
use crate::models::User;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCredentialStore;
pub use postgres::PgCredentialStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a record by its unique identifier (email).
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>>;

    /// Persist a new record. Fails with `AuthError::Conflict` if the
    /// identifier is already taken.
    async fn insert(&self, user: &User) -> Result<()>;
}
