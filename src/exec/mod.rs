//! Command execution for tau.
//!
//! This module handles:
//! - Splitting command templates into words
//! - `$source`/`$target` placeholder substitution
//! - Executing commands with inherited stdio

pub mod tokenize;

use crate::error::{Result, TauError};
use std::fmt;
use std::process::{Command, ExitStatus, Stdio};

/// Replaced by the path of the file as given.
pub const SOURCE_PLACEHOLDER: &str = "$source";

/// Replaced by the new basename.
pub const TARGET_PLACEHOLDER: &str = "$target";

/// What to do when there is no command to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyCommandPolicy {
	/// Succeed without spawning anything.
	#[default]
	Skip,
	/// Fail with [`TauError::EmptyCommand`].
	Reject,
}

/// Executor settings, fixed for a whole run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecOptions {
	pub empty_command: EmptyCommandPolicy,

	/// Print the command instead of running it.
	pub dry_run: bool,
}

/// A command template together with the names to substitute into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionRequest<'a> {
	pub command_template: &'a str,
	pub source_path: &'a str,
	pub new_name: &'a str,
}

/// A fully substituted command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
	pub program: String,
	pub args: Vec<String>,
}

/// The result of a successful [`Executor::execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
	/// The command was empty and the policy allowed it.
	Skipped,
	/// Dry run: the command that would have been executed.
	DryRun(CommandLine),
	/// The command ran and exited successfully.
	Completed(CommandLine),
}

impl ExecutionRequest<'_> {
	/// Split the template and substitute placeholders.
	///
	/// Returns `None` when the template holds no words at all.
	/// The program word is never substituted.
	pub fn command_line(&self) -> Result<Option<CommandLine>> {
		let mut words = tokenize::split(self.command_template)?.into_iter();

		let Some(program) = words.next() else {
			return Ok(None);
		};

		let args = words
			.map(|word| substitute_placeholders(&word, self.source_path, self.new_name))
			.collect();

		Ok(Some(CommandLine { program, args }))
	}
}

impl CommandLine {
	/// Program followed by its arguments.
	pub fn words(&self) -> Vec<&str> {
		std::iter::once(self.program.as_str())
			.chain(self.args.iter().map(String::as_str))
			.collect()
	}
}

impl fmt::Display for CommandLine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&tokenize::render(&self.words()))
	}
}

/// Replace `$source` and `$target` in a single left-to-right pass.
///
/// Substituted text is never scanned again, so values containing the markers stay as they are.
pub fn substitute_placeholders(word: &str, source: &str, target: &str) -> String {
	let mut out = String::with_capacity(word.len());
	let mut rest = word;

	while let Some(pos) = rest.find('$') {
		out.push_str(&rest[..pos]);
		let tail = &rest[pos..];
		if let Some(after) = tail.strip_prefix(SOURCE_PLACEHOLDER) {
			out.push_str(source);
			rest = after;
		} else if let Some(after) = tail.strip_prefix(TARGET_PLACEHOLDER) {
			out.push_str(target);
			rest = after;
		} else {
			out.push('$');
			rest = &tail[1..];
		}
	}

	out.push_str(rest);
	out
}

/// Runs command templates for renamed files.
#[derive(Debug, Clone, Default)]
pub struct Executor {
	options: ExecOptions,
}

impl Executor {
	pub fn new(options: ExecOptions) -> Self {
		Executor { options }
	}

	pub fn options(&self) -> ExecOptions {
		self.options
	}

	/// Substitute, print and run a command, blocking until it exits.
	///
	/// A non-zero exit is an error; the caller decides whether it is fatal.
	pub fn execute(&self, request: &ExecutionRequest<'_>) -> Result<ExecOutcome> {
		let Some(line) = request.command_line()? else {
			return match self.options.empty_command {
				EmptyCommandPolicy::Skip => {
					tracing::warn!(
						"nothing to execute for {:?} (new name {:?})",
						request.source_path,
						request.new_name
					);
					Ok(ExecOutcome::Skipped)
				}
				EmptyCommandPolicy::Reject => Err(TauError::EmptyCommand),
			};
		};

		if self.options.dry_run {
			println!("would execute: {line}");
			return Ok(ExecOutcome::DryRun(line));
		}

		println!("executing: {line}");
		let status = execute_command(&line.program, &line.args)?;
		tracing::debug!(program = %line.program, %status, "command finished");

		if !status.success() {
			return Err(TauError::NonZeroExit {
				command: line.program,
				code: status.code(),
			});
		}

		Ok(ExecOutcome::Completed(line))
	}
}

/// Execute a command with proper stdio handling.
///
/// This function:
/// - Passes stdin, stdout, stderr through to the child process
/// - Returns the exit status of the child process
pub fn execute_command(program: &str, args: &[String]) -> Result<ExitStatus> {
	let mut cmd = Command::new(program);
	cmd.args(args)
		.stdin(Stdio::inherit())
		.stdout(Stdio::inherit())
		.stderr(Stdio::inherit());

	let status = cmd.status().map_err(|source| {
		if source.kind() == std::io::ErrorKind::NotFound {
			TauError::CommandNotFound {
				command: program.to_string(),
			}
		} else {
			TauError::CommandFailed {
				command: program.to_string(),
				source,
			}
		}
	})?;

	Ok(status)
}
