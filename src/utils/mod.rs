/// Installs the global tracing subscriber. `directive` seeds the filter and
/// `RUST_LOG` adds to it. Logs go to stderr so chat output stays clean.
/// Callers go through [`crate::init`], which runs this once per process.
pub fn init_tracing(directive: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let mut filter = EnvFilter::from_default_env();
    match directive.parse() {
        Ok(parsed) => filter = filter.add_directive(parsed),
        Err(err) => eprintln!("ignoring invalid log filter `{directive}`: {err}"),
    }

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
