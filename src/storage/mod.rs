mod memory;
mod repository;

pub use memory::*;
pub use repository::*;

use anyhow::Result;
use async_trait::async_trait;

/// SQL migration for initial schema
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");

/// Key holding the business profile JSON object.
pub const PROFILE_KEY: &str = "profile";
/// Key holding the transaction JSON array, newest first.
pub const TRANSACTIONS_KEY: &str = "transactions";
/// Key holding the UI theme preference.
pub const THEME_KEY: &str = "theme";
/// Key holding the login stub.
pub const SESSION_KEY: &str = "session";

/// String key-value persistence used by the ledger store.
///
/// Values are opaque strings (JSON documents in practice). Each `set` must
/// replace the value for its key atomically.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;

    /// Remove every key.
    async fn clear(&self) -> Result<()>;
}
