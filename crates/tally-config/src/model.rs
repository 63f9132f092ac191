use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Runtime settings for the bot. Paths left unset resolve under the home directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Ledger document. Defaults to `<home>/data/expense_record.json`.
    pub data_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Scratch directory for rendered exports. Defaults to `<home>/exports`.
    pub export_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Where the console transport keeps delivered documents. Defaults to `<home>/outbox`.
    pub outbox_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Program plus arguments run once per receipt image.
    pub extractor_command: Option<Vec<String>>,

    #[serde(default = "Config::default_image_extensions")]
    pub image_extensions: Vec<String>,

    #[serde(default)]
    pub strict_kind_selection: bool,

    #[serde(default = "Config::default_log_filter")]
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            export_dir: None,
            outbox_dir: None,
            extractor_command: None,
            image_extensions: Self::default_image_extensions(),
            strict_kind_selection: false,
            log_filter: Self::default_log_filter(),
        }
    }
}

impl Config {
    pub fn default_image_extensions() -> Vec<String> {
        vec!["png".into(), "jpg".into(), "jpeg".into()]
    }

    pub fn default_log_filter() -> String {
        "tally_bot=info".into()
    }

    pub fn resolve_data_file(&self, home: &Path) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(|| home.join("data").join("expense_record.json"))
    }

    pub fn resolve_export_dir(&self, home: &Path) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| home.join("exports"))
    }

    pub fn resolve_outbox_dir(&self, home: &Path) -> PathBuf {
        self.outbox_dir
            .clone()
            .unwrap_or_else(|| home.join("outbox"))
    }

    /// The extractor argv, if one is configured with at least a program name.
    pub fn extractor_argv(&self) -> Option<&[String]> {
        self.extractor_command
            .as_deref()
            .filter(|argv| argv.first().map_or(false, |program| !program.trim().is_empty()))
    }
}
