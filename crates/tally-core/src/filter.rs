use tally_domain::{parse_ledger_line, DateRange, LedgerEntry};
use tracing::warn;

/// Projects stored lines that fall inside `range`, keeping their order.
///
/// Lines that cannot be parsed are skipped and logged; they never reach the user.
pub fn filter_ledger<S: AsRef<str>>(lines: &[S], range: &DateRange) -> Vec<LedgerEntry> {
    lines
        .iter()
        .filter_map(|line| {
            let line = line.as_ref();
            match parse_ledger_line(line) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!(record = line, error = %err, "skipping malformed record");
                    None
                }
            }
        })
        .filter(|entry| range.contains(entry.date))
        .collect()
}
