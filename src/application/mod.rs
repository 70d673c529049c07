// Application layer: the ledger store that shells drive, and report rendering.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
