#![doc(test(attr(deny(warnings))))]

//! Tally is a chat assistant that records expenses from receipt photos and
//! exports a date-filtered history as a rendered document.
//!
//! The chat platform, the OCR service and the ledger file are collaborators
//! reached through the traits in `tally_core`; this crate wires them to the
//! conversation state machines and ships a console front end.

pub mod bot;
pub mod cli;
pub mod conversation;
pub mod errors;
pub mod extract;
pub mod render;
pub mod utils;

pub use bot::{BotSettings, TallyBot};
pub use errors::BotError;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with `directive` and emits a startup info log.
pub fn init(directive: &str) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(directive);
        tracing::info!("Tally tracing initialized.");
    });
}
