//! tally-domain
//!
//! Pure domain models for the receipt ledger (records, kinds, amounts, date ranges).
//! No I/O, no transport, no storage. Only data types and their parsing rules.

pub mod amount;
pub mod date;
pub mod extraction;
pub mod kind;
pub mod record;
pub mod user;

pub use amount::*;
pub use date::*;
pub use extraction::*;
pub use kind::*;
pub use record::*;
pub use user::*;
