//! Extraction service adapters.

use std::{
    io::{self, ErrorKind, Write},
    process::{ChildStdin, Command, Stdio},
    thread,
};

use serde::Deserialize;
use tally_core::{CoreError, ReceiptExtractor, ReceiptImage};
use tally_domain::RawExtraction;
use tracing::debug;

pub const NOT_CONFIGURED: &str = "Receipt scanning is not configured.";

/// Runs an external program per image.
///
/// The image bytes are written to the program's stdin and its stdout must hold
/// one JSON value: a `{date, amount, category}` object, `{"error": "..."}`, or
/// `null` when the image is not a receipt. The image name is exported as
/// `TALLY_IMAGE_NAME`.
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    program: String,
    args: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExtractorReply {
    Failure { error: String },
    Record(RawExtraction),
}

impl CommandExtractor {
    pub fn new(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl ReceiptExtractor for CommandExtractor {
    fn extract(&self, image: &ReceiptImage) -> Result<Option<RawExtraction>, CoreError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("TALLY_IMAGE_NAME", &image.name)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                CoreError::Extraction(format!("could not start `{}`: {}", self.program, err))
            })?;

        // stdin is fed from its own thread while stdout and stderr drain.
        let stdin = child.stdin.take();
        let bytes = image.bytes.as_slice();
        let (output, written) = thread::scope(|scope| {
            let writer = scope.spawn(move || write_image(stdin, bytes));
            (child.wait_with_output(), writer.join())
        });
        let output = output?;
        written.map_err(|_| CoreError::Extraction("image writer thread panicked".into()))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("`{}` exited with {}", self.program, output.status)
            } else {
                stderr
            };
            return Err(CoreError::Extraction(message));
        }
        debug!(image = %image.name, bytes = output.stdout.len(), "extractor replied");
        parse_reply(&output.stdout)
    }
}

fn write_image(stdin: Option<ChildStdin>, bytes: &[u8]) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(bytes) {
        // The program may legitimately exit without reading the image.
        Err(err) if err.kind() == ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

/// Decodes an extractor's stdout. Blank output counts as "not a receipt".
pub fn parse_reply(stdout: &[u8]) -> Result<Option<RawExtraction>, CoreError> {
    let text = String::from_utf8_lossy(stdout);
    if text.trim().is_empty() {
        return Ok(None);
    }
    let reply: Option<ExtractorReply> = serde_json::from_str(text.trim()).map_err(|err| {
        CoreError::Extraction(format!("unreadable extractor reply: {}", err))
    })?;
    match reply {
        None => Ok(None),
        Some(ExtractorReply::Record(raw)) => Ok(Some(raw)),
        Some(ExtractorReply::Failure { error }) => Err(CoreError::Extraction(error)),
    }
}

/// Placeholder used when no extraction program is configured; every image fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredExtractor;

impl ReceiptExtractor for UnconfiguredExtractor {
    fn extract(&self, _image: &ReceiptImage) -> Result<Option<RawExtraction>, CoreError> {
        Err(CoreError::Extraction(NOT_CONFIGURED.to_string()))
    }
}
