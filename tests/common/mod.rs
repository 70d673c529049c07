// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use cashtrack::application::LedgerStore;
use cashtrack::storage::Repository;
use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

/// Helper to create a ledger backed by a temporary SQLite database
pub async fn test_ledger() -> Result<(LedgerStore<Repository>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let ledger = open_ledger(&temp_dir).await?;
    Ok((ledger, temp_dir))
}

/// Open (or re-open) the ledger stored in `temp_dir`
pub async fn open_ledger(temp_dir: &TempDir) -> Result<LedgerStore<Repository>> {
    let db_path = temp_dir.path().join("test.db");
    let repo = Repository::init_path(db_path.to_str().unwrap()).await?;
    Ok(LedgerStore::initialize(repo).await?)
}

/// A ledger that has passed login and profile setup
pub async fn ready_ledger() -> Result<(LedgerStore<Repository>, TempDir)> {
    let (mut ledger, temp) = test_ledger().await?;
    ledger.login("owner@example.com").await?;
    ledger.set_profile("Iya Basira Provisions", "Retail").await?;
    Ok((ledger, temp))
}

/// Midday UTC on the given date
pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}
