pub mod application;
pub mod cli;
pub mod domain;
pub mod storage;

pub use application::{LedgerError, LedgerStore};
pub use domain::*;
pub use storage::{KeyValueStore, MemoryStore, Repository};
