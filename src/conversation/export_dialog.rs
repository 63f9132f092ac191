//! History export dialog.
//!
//! The dialog walks `AwaitingKindSelection → AwaitingStartDate →
//! AwaitingEndDate` and finishes with an [`ExportRequest`]. Every state owns
//! the answers confirmed so far, so a rejected input re-enters the same state
//! without losing them. The state machine is pure: it returns the reply to
//! send and leaves delivery to the caller.

use chrono::NaiveDate;
use tally_core::ExportRequest;
use tally_domain::{parse_user_date, DateRange, KindSelection, RecordKind};

pub const KIND_PROMPT: &str = "Select Income or Expense";
pub const START_PROMPT: &str = "Please enter the start date in yyyy-mm-dd format.";
pub const END_PROMPT: &str = "Please enter the end date in yyyy-mm-dd format.";
pub const INVALID_START: &str =
    "Invalid date format. Please enter the start date in yyyy-mm-dd format.";
pub const INVALID_END: &str = "Invalid date format. Please enter the end date in yyyy-mm-dd format.";
pub const END_BEFORE_START: &str =
    "End date must be after the start date. Please enter the end date again.";
pub const UNKNOWN_KIND: &str = "Please choose one of: Income, Expense.";

/// Behaviour switches for the dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DialogOptions {
    /// Re-prompt when the kind answer is neither `Income` nor `Expense`
    /// instead of carrying the text forward.
    pub strict_kind_selection: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportDialog {
    AwaitingKindSelection,
    AwaitingStartDate {
        kind: KindSelection,
    },
    AwaitingEndDate {
        kind: KindSelection,
        start: NaiveDate,
    },
}

/// Outcome of feeding one message to the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStep {
    /// Send `reply` and wait in `next`. `rejected` marks a re-prompt of the
    /// same step after invalid input.
    Prompt {
        next: ExportDialog,
        reply: &'static str,
        rejected: bool,
    },
    /// Terminal: the request is ready to run.
    Completed(ExportRequest),
}

impl ExportDialog {
    pub fn begin() -> Self {
        ExportDialog::AwaitingKindSelection
    }

    /// Answers offered with [`KIND_PROMPT`].
    pub fn kind_options() -> Vec<&'static str> {
        RecordKind::labels()
    }

    pub fn advance(self, input: &str, options: DialogOptions) -> ExportStep {
        match self {
            ExportDialog::AwaitingKindSelection => {
                let kind = KindSelection::from_input(input);
                if options.strict_kind_selection && !kind.is_known() {
                    return reprompt(ExportDialog::AwaitingKindSelection, UNKNOWN_KIND);
                }
                advance_to(ExportDialog::AwaitingStartDate { kind }, START_PROMPT)
            }
            ExportDialog::AwaitingStartDate { kind } => match parse_user_date(input) {
                Ok(start) => advance_to(ExportDialog::AwaitingEndDate { kind, start }, END_PROMPT),
                Err(_) => reprompt(ExportDialog::AwaitingStartDate { kind }, INVALID_START),
            },
            ExportDialog::AwaitingEndDate { kind, start } => {
                let end = match parse_user_date(input) {
                    Ok(end) => end,
                    Err(_) => {
                        return reprompt(ExportDialog::AwaitingEndDate { kind, start }, INVALID_END)
                    }
                };
                match DateRange::new(start, end) {
                    Ok(range) => ExportStep::Completed(ExportRequest { kind, range }),
                    Err(_) => reprompt(ExportDialog::AwaitingEndDate { kind, start }, END_BEFORE_START),
                }
            }
        }
    }
}

fn advance_to(next: ExportDialog, reply: &'static str) -> ExportStep {
    ExportStep::Prompt {
        next,
        reply,
        rejected: false,
    }
}

fn reprompt(same: ExportDialog, reply: &'static str) -> ExportStep {
    ExportStep::Prompt {
        next: same,
        reply,
        rejected: true,
    }
}
