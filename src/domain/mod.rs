mod gate;
mod ledger;
mod money;
mod month;
mod profile;
mod transaction;

pub use gate::*;
pub use ledger::*;
pub use money::*;
pub use month::*;
pub use profile::*;
pub use transaction::*;
