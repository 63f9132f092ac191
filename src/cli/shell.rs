use std::{
    borrow::Cow,
    env, fmt,
    io::{self, BufRead},
    path::Path,
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;
use tally_config::{resolve_home_dir, ConfigManager};
use tally_core::{FileRef, IncomingMessage, MessageContent};
use tally_domain::UserId;

use super::{output, ConsoleTransport};
use crate::{errors::BotError, TallyBot};

/// Set to read plain lines from stdin instead of the line editor.
pub const SCRIPT_ENV: &str = "TALLY_CLI_SCRIPT";
/// Chat identity used by the console; defaults to `console`.
pub const USER_ENV: &str = "TALLY_USER";

const COMPLETIONS: [&str; 10] = [
    "/start", "/help", "/pdf", "/history", "/scan", "/cancel", "/photo", "/document", "/user",
    "/quit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CliMode {
    Interactive,
    Script,
}

enum LoopControl {
    Continue,
    Exit,
}

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    Message(MessageContent),
    SwitchUser(UserId),
    Quit,
    Skip,
}

struct ConsoleSession {
    bot: TallyBot,
    transport: ConsoleTransport,
    user: UserId,
}

pub fn run_cli() -> Result<(), BotError> {
    let mode = if env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let manager = ConfigManager::with_base_dir(resolve_home_dir())?;
    let config = manager.load()?;
    crate::init(&config.log_filter);
    if mode == CliMode::Script {
        output::disable_color();
    }

    let user = env::var(USER_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "console".to_string());
    let mut session = ConsoleSession {
        bot: TallyBot::from_config(&config, manager.home())?,
        transport: ConsoleTransport::new(config.resolve_outbox_dir(manager.home())),
        user: UserId::new(user),
    };
    tracing::info!(home = %manager.home().display(), "console session started");

    match mode {
        CliMode::Interactive => run_interactive(&mut session),
        CliMode::Script => run_script(&mut session),
    }
}

fn run_interactive(session: &mut ConsoleSession) -> Result<(), BotError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(&COMPLETIONS)));
    editor.bind_sequence(KeyEvent::from('\t'), Cmd::Complete);
    output::info("Type /help for commands, /quit to leave.");

    loop {
        let prompt = format!("{}> ", session.user);
        match editor.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                if let LoopControl::Exit = handle_line(session, trimmed) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                output::info("Exiting.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn run_script(session: &mut ConsoleSession) -> Result<(), BotError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if let LoopControl::Exit = handle_line(session, &line) {
            break;
        }
    }
    Ok(())
}

fn handle_line(session: &mut ConsoleSession, line: &str) -> LoopControl {
    let input = match parse_console_line(line) {
        Ok(input) => input,
        Err(err) => {
            output::warning(&err);
            return LoopControl::Continue;
        }
    };

    match input {
        ConsoleInput::Skip => {}
        ConsoleInput::Quit => return LoopControl::Exit,
        ConsoleInput::SwitchUser(user) => {
            output::info(format!("Now chatting as {user}."));
            session.user = user;
        }
        ConsoleInput::Message(content) => {
            let message = IncomingMessage {
                user: session.user.clone(),
                content,
            };
            if let Err(err) = session.bot.handle(&session.transport, message) {
                output::error(err);
            }
        }
    }
    LoopControl::Continue
}

/// Maps a console line onto a chat event. Console-only commands take
/// shell-quoted arguments; everything else is sent as text.
pub fn parse_console_line(line: &str) -> Result<ConsoleInput, ParseError> {
    let trimmed = line.trim();
    let Some(first) = trimmed.split_whitespace().next() else {
        return Ok(ConsoleInput::Skip);
    };

    match first.to_ascii_lowercase().as_str() {
        "/quit" | "/exit" => Ok(ConsoleInput::Quit),
        "/photo" | "/photos" => {
            let paths = arguments(trimmed)?;
            if paths.is_empty() {
                return Err(ParseError::new("usage: /photo <path>..."));
            }
            Ok(ConsoleInput::Message(MessageContent::Photos(
                paths.iter().map(|path| file_ref(path)).collect(),
            )))
        }
        "/document" => match arguments(trimmed)?.as_slice() {
            [path] => {
                let file = file_ref(path);
                Ok(ConsoleInput::Message(MessageContent::Document {
                    file_name: file.display_name().to_string(),
                    file,
                }))
            }
            _ => Err(ParseError::new("usage: /document <path>")),
        },
        "/user" => match arguments(trimmed)?.as_slice() {
            [id] => Ok(ConsoleInput::SwitchUser(UserId::new(id.as_str()))),
            _ => Err(ParseError::new("usage: /user <id>")),
        },
        _ => Ok(ConsoleInput::Message(MessageContent::Text(
            trimmed.to_string(),
        ))),
    }
}

fn arguments(line: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = split(line).map_err(|err| ParseError::new(err.to_string()))?;
    if !tokens.is_empty() {
        tokens.remove(0);
    }
    Ok(tokens)
}

fn file_ref(path: &str) -> FileRef {
    match Path::new(path).file_name().and_then(|name| name.to_str()) {
        Some(name) => FileRef::named(path, name),
        None => FileRef::new(path),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    message: String,
}

impl ParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(names: &[&str]) -> Self {
        let mut commands: Vec<String> = names.iter().map(|name| name.to_string()).collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        if !prefix.starts_with('/') || prefix.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let needle = prefix.to_ascii_lowercase();
        let candidates = self
            .commands
            .iter()
            .filter(|name| name.starts_with(&needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        let _ = ctx;
        Ok(ValidationResult::Valid(None))
    }
}
