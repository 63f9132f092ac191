//! tally-core
//!
//! Services for the receipt ledger: filtering, extraction, ingestion and export.
//! Depends on tally-domain. Transport, storage backends and rendering are reached
//! only through the traits declared here.

pub mod archive;
pub mod error;
pub mod export_service;
pub mod extraction;
pub mod filter;
pub mod ingestion_service;
pub mod storage;
pub mod transport;

pub use error::CoreError;
pub use export_service::*;
pub use extraction::*;
pub use filter::*;
pub use ingestion_service::*;
pub use storage::*;
pub use transport::*;
