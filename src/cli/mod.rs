//! Console front end: the terminal acts as the chat platform.

mod console_transport;
pub mod output;
mod shell;

pub use console_transport::ConsoleTransport;
pub use shell::{parse_console_line, run_cli, ConsoleInput, ParseError, SCRIPT_ENV, USER_ENV};
