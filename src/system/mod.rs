pub mod collector;
pub mod ledger;
pub mod process;
pub mod snapshot;
