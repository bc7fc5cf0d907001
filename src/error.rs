use std::path::PathBuf;

/// Library-level structured errors for tau.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum TauError {
	#[error("Config file not found: {path}")]
	ConfigNotFound { path: PathBuf },

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid regex pattern in rule {rule:?}: {pattern}")]
	InvalidRegex {
		rule: String,
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Rule {name:?} is defined more than once")]
	DuplicateRule { name: String },

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,

	#[error("Cannot transform an empty path")]
	EmptyPath,

	#[error("No matches found for {path:?}")]
	NoMatch { path: String },

	#[error("Rule {rule:?} turned {path:?} into unusable name {new_name:?}: {reason}")]
	InvalidTarget {
		rule: String,
		path: String,
		new_name: String,
		reason: &'static str,
	},

	#[error("Could not parse command {command:?}: {reason}")]
	Tokenize {
		command: String,
		reason: &'static str,
	},

	#[error("No command to execute")]
	EmptyCommand,

	#[error("Command not found: {command}")]
	CommandNotFound { command: String },

	#[error("Command execution failed: {command}")]
	CommandFailed {
		command: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Command {command} exited unsuccessfully ({})", exit_description(.code))]
	NonZeroExit { command: String, code: Option<i32> },
}

impl TauError {
	/// Whether this error comes from loading configuration, which is always fatal.
	pub fn is_config_error(&self) -> bool {
		matches!(
			self,
			TauError::ConfigNotFound { .. }
				| TauError::ConfigReadError { .. }
				| TauError::ConfigParseError { .. }
				| TauError::InvalidRegex { .. }
				| TauError::DuplicateRule { .. }
				| TauError::HomeDirectoryNotFound
		)
	}

	/// Exit code of the child process, for errors caused by one.
	pub fn exit_code(&self) -> Option<i32> {
		match self {
			TauError::NonZeroExit { code, .. } => *code,
			_ => None,
		}
	}
}

fn exit_description(code: &Option<i32>) -> String {
	match code {
		Some(code) => format!("exit code: {code}"),
		None => "terminated by signal".to_string(),
	}
}

/// Result type alias using TauError.
pub type Result<T> = std::result::Result<T, TauError>;
