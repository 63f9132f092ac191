use colored::Colorize;
use std::fmt;

/// Message categories used by the console output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Bot,
    Document,
    Info,
    Warning,
    Error,
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    let label = match kind {
        MessageKind::Bot => "bot",
        MessageKind::Document => "document",
        MessageKind::Info => "info",
        MessageKind::Warning => "warning",
        MessageKind::Error => "error",
    };
    // Multi-line bot messages keep their line breaks under one label.
    let formatted = text
        .lines()
        .map(|line| format!("{label}> {line}"))
        .collect::<Vec<_>>()
        .join("\n");

    match kind {
        MessageKind::Bot => formatted.bright_cyan().to_string(),
        MessageKind::Document => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    println!("{}", apply_style(kind, message));
}

pub fn bot(message: impl fmt::Display) {
    print(MessageKind::Bot, message);
}

pub fn document(message: impl fmt::Display) {
    print(MessageKind::Document, message);
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

/// Turns colour off, e.g. when stdout is consumed by scripts.
pub fn disable_color() {
    colored::control::set_override(false);
}
