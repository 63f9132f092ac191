//! Message dispatcher: routes each inbound message to a command, the user's
//! pending dialog, or the ingestion pipeline.

use std::{path::Path, sync::Arc};

use strsim::levenshtein;
use tally_config::Config;
use tally_core::{
    ChatTransport, DocumentRenderer, ExportService, ExtractionAdapter, IncomingMessage,
    IngestReport, IngestionPipeline, MessageContent, ReceiptExtractor, RecordStore,
};
use tally_domain::UserId;
use tally_storage_json::JsonRecordStore;
use tracing::{debug, error, info};

use crate::{
    conversation::{
        classify_upload,
        export_dialog::KIND_PROMPT,
        upload_dialog::{UPLOAD_PROMPT, UPLOAD_REPROMPT},
        Dialog, DialogOptions, ExportDialog, ExportStep, SessionTable, UploadPayload,
    },
    errors::BotError,
    extract::{CommandExtractor, UnconfiguredExtractor},
    render::SvgRenderer,
};

pub const HELP_TEXT: &str = "Send /scan to add receipts (a zip file or photos), \
/history to export your history for a date range as an SVG image (/pdf works too), \
or /cancel to stop the current step.";
pub const CANCELLED: &str = "Cancelled.";
pub const NOTHING_TO_CANCEL: &str = "There is nothing to cancel.";

const COMMANDS: [&str; 6] = ["/start", "/help", "/pdf", "/history", "/scan", "/cancel"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Help,
    Export,
    Scan,
    Cancel,
}

impl Command {
    fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        // Group chats address commands as `/pdf@botname`.
        let word = word.split('@').next().unwrap_or(word).to_ascii_lowercase();
        match word.as_str() {
            "/start" | "/help" => Some(Command::Help),
            "/pdf" | "/history" => Some(Command::Export),
            "/scan" => Some(Command::Scan),
            "/cancel" => Some(Command::Cancel),
            _ => None,
        }
    }
}

/// Dispatcher-level settings taken from [`Config`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BotSettings {
    pub dialog: DialogOptions,
}

impl From<&Config> for BotSettings {
    fn from(config: &Config) -> Self {
        Self {
            dialog: DialogOptions {
                strict_kind_selection: config.strict_kind_selection,
            },
        }
    }
}

pub struct TallyBot {
    ingestion: IngestionPipeline,
    exporter: ExportService,
    sessions: SessionTable,
    settings: BotSettings,
}

impl TallyBot {
    pub fn new(ingestion: IngestionPipeline, exporter: ExportService, settings: BotSettings) -> Self {
        Self {
            ingestion,
            exporter,
            sessions: SessionTable::new(),
            settings,
        }
    }

    /// Wires the JSON store, SVG renderer and configured extractor under `home`.
    pub fn from_config(config: &Config, home: &Path) -> Result<Self, BotError> {
        let extractor: Arc<dyn ReceiptExtractor> = match config
            .extractor_argv()
            .and_then(CommandExtractor::new)
        {
            Some(command) => Arc::new(command),
            None => Arc::new(UnconfiguredExtractor),
        };
        let store: Arc<dyn RecordStore> =
            Arc::new(JsonRecordStore::new(config.resolve_data_file(home))?);
        Ok(Self::with_components(
            store,
            extractor,
            Arc::new(SvgRenderer::new()),
            config,
            home,
        ))
    }

    pub fn with_components(
        store: Arc<dyn RecordStore>,
        extractor: Arc<dyn ReceiptExtractor>,
        renderer: Arc<dyn DocumentRenderer>,
        config: &Config,
        home: &Path,
    ) -> Self {
        let ingestion = IngestionPipeline::new(store.clone(), ExtractionAdapter::new(extractor))
            .with_image_extensions(config.image_extensions.clone());
        let exporter = ExportService::new(store, renderer, config.resolve_export_dir(home));
        Self::new(ingestion, exporter, BotSettings::from(config))
    }

    pub fn sessions(&self) -> &SessionTable {
        &self.sessions
    }

    /// Handles one inbound message. Failures inside a step are reported to
    /// the user and logged; only a failure to report them is returned.
    pub fn handle(
        &mut self,
        transport: &dyn ChatTransport,
        message: IncomingMessage,
    ) -> Result<(), BotError> {
        let IncomingMessage { user, content } = message;
        debug!(user = %user, "incoming message");

        if let MessageContent::Text(text) = &content {
            if let Some(command) = Command::parse(text) {
                return self.run_command(transport, &user, command);
            }
        }

        match self.sessions.take(&user) {
            Some(Dialog::Export(state)) => self.continue_export(transport, &user, state, &content),
            Some(Dialog::Upload) => self.continue_upload(transport, &user, &content),
            None => self.handle_idle(transport, &user, &content),
        }
    }

    fn run_command(
        &mut self,
        transport: &dyn ChatTransport,
        user: &UserId,
        command: Command,
    ) -> Result<(), BotError> {
        match command {
            Command::Help => transport.send_message(user, HELP_TEXT).map_err(BotError::from),
            Command::Cancel => {
                let reply = if self.sessions.take(user).is_some() {
                    CANCELLED
                } else {
                    NOTHING_TO_CANCEL
                };
                transport.send_message(user, reply).map_err(BotError::from)
            }
            Command::Export => {
                if self.sessions.begin(user, Dialog::Export(ExportDialog::begin())).is_some() {
                    debug!(user = %user, "replaced pending dialog");
                }
                let options = ExportDialog::kind_options();
                let sent = transport.send_choices(user, KIND_PROMPT, &options);
                self.report(transport, user, "starting the export", sent.map_err(BotError::from))
            }
            Command::Scan => {
                self.sessions.begin(user, Dialog::Upload);
                let sent = transport.send_message(user, UPLOAD_PROMPT);
                self.report(transport, user, "starting the upload", sent.map_err(BotError::from))
            }
        }
    }

    fn continue_export(
        &mut self,
        transport: &dyn ChatTransport,
        user: &UserId,
        state: ExportDialog,
        content: &MessageContent,
    ) -> Result<(), BotError> {
        let stage = export_stage(&state);
        let MessageContent::Text(text) = content else {
            // Uploads mid-dialog are still ingested; the dialog keeps waiting.
            self.sessions.begin(user, Dialog::Export(state));
            return self.handle_idle(transport, user, content);
        };

        match state.advance(text, self.settings.dialog) {
            ExportStep::Prompt {
                next,
                reply,
                rejected,
            } => {
                if rejected {
                    debug!(user = %user, stage, "input rejected, prompting again");
                }
                self.sessions.begin(user, Dialog::Export(next));
                let sent = transport.send_message(user, reply);
                self.report(transport, user, stage, sent.map_err(BotError::from))
            }
            ExportStep::Completed(request) => {
                info!(user = %user, kind = %request.kind, range = %request.range, "export requested");
                let result = self
                    .exporter
                    .export(transport, user, &request)
                    .map(|_| ())
                    .map_err(BotError::from);
                self.report(transport, user, "generating the export", result)
            }
        }
    }

    fn continue_upload(
        &mut self,
        transport: &dyn ChatTransport,
        user: &UserId,
        content: &MessageContent,
    ) -> Result<(), BotError> {
        match classify_upload(content, self.ingestion.image_extensions()) {
            Some(payload) => {
                let result = self.ingest(transport, user, payload).map(|_| ());
                self.report(transport, user, "processing receipts", result)
            }
            None => {
                self.sessions.begin(user, Dialog::Upload);
                transport
                    .send_message(user, UPLOAD_REPROMPT)
                    .map_err(BotError::from)
            }
        }
    }

    fn handle_idle(
        &mut self,
        transport: &dyn ChatTransport,
        user: &UserId,
        content: &MessageContent,
    ) -> Result<(), BotError> {
        match content {
            MessageContent::Text(text) if text.trim_start().starts_with('/') => {
                let reply = unknown_command_reply(text);
                transport.send_message(user, &reply).map_err(BotError::from)
            }
            MessageContent::Text(_) => transport.send_message(user, HELP_TEXT).map_err(BotError::from),
            _ => match classify_upload(content, self.ingestion.image_extensions()) {
                Some(payload) => {
                    let result = self.ingest(transport, user, payload).map(|_| ());
                    self.report(transport, user, "processing receipts", result)
                }
                None => transport
                    .send_message(user, UPLOAD_REPROMPT)
                    .map_err(BotError::from),
            },
        }
    }

    fn ingest(
        &self,
        transport: &dyn ChatTransport,
        user: &UserId,
        payload: UploadPayload,
    ) -> Result<IngestReport, BotError> {
        let report = match payload {
            UploadPayload::Archive(file) => {
                let bytes = transport.download_file(&file)?;
                self.ingestion.ingest_archive(transport, user, &bytes)?
            }
            UploadPayload::Images(files) => self.ingestion.ingest_files(transport, user, &files)?,
        };
        Ok(report)
    }

    /// Logs a failed stage and tells the user, without internal detail beyond
    /// the error summary.
    fn report(
        &self,
        transport: &dyn ChatTransport,
        user: &UserId,
        stage: &str,
        result: Result<(), BotError>,
    ) -> Result<(), BotError> {
        let Err(err) = result else {
            return Ok(());
        };
        error!(user = %user, stage, error = %err, "conversation step failed");
        transport.send_message(user, &format!("An error occurred while {}: {}", stage, err))?;
        Ok(())
    }
}

fn export_stage(state: &ExportDialog) -> &'static str {
    match state {
        ExportDialog::AwaitingKindSelection => "processing your selection",
        ExportDialog::AwaitingStartDate { .. } => "reading the start date",
        ExportDialog::AwaitingEndDate { .. } => "reading the end date",
    }
}

fn unknown_command_reply(text: &str) -> String {
    let word = text.split_whitespace().next().unwrap_or(text).to_ascii_lowercase();
    let mut reply = format!("Unknown command `{}`.", word);
    let closest = COMMANDS
        .iter()
        .map(|name| (levenshtein(name, &word), *name))
        .min_by_key(|(distance, _)| *distance);
    if let Some((distance, name)) = closest {
        if distance <= 2 {
            reply.push_str(&format!(" Did you mean {}?", name));
        }
    }
    reply.push(' ');
    reply.push_str(HELP_TEXT);
    reply
}
