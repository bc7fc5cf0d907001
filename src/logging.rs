//! Logging (tracing) setup for the `tau` binary.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Default filter when `--verbose` is not given.
pub const DEFAULT_LEVEL: &str = "warn";

/// Filter used with `--verbose`.
pub const VERBOSE_LEVEL: &str = "debug";

/// Pick the filter directive: `RUST_LOG` wins, then the verbose flag.
pub fn filter_directive(verbose: bool, rust_log: Option<String>) -> String {
	rust_log
		.filter(|value| !value.trim().is_empty())
		.unwrap_or_else(|| {
			if verbose { VERBOSE_LEVEL } else { DEFAULT_LEVEL }.to_string()
		})
}

/// Install the global subscriber. Logs go to stderr so stdout only carries
/// command output and the `executing:` lines.
pub fn init(verbose: bool) {
	let directive = filter_directive(verbose, std::env::var("RUST_LOG").ok());
	let filter = EnvFilter::try_new(&directive).unwrap_or_else(|err| {
		eprintln!("warning: ignoring invalid log filter {directive:?}: {err}");
		EnvFilter::new(DEFAULT_LEVEL)
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(std::io::stderr().is_terminal())
		.with_target(verbose)
		.without_time()
		.init();
}
