//! Per-file rename-and-execute loop.
//!
//! Each file goes `Pending -> Transformed -> Executed`, or fails at the transform or
//! the execute step. Files are handled one at a time and never retried.

use crate::error::{Result, TauError};
use crate::exec::{EmptyCommandPolicy, ExecOutcome, ExecutionRequest, Executor};
use crate::rules::{RuleTable, Transformed};

/// How failures affect the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
	/// One file; any failure aborts the run.
	SingleFile,
	/// Any number of files; failures are reported and the run continues.
	Batch,
}

impl Mode {
	/// Empty-command policy for this mode, unless the config overrides it.
	pub fn empty_command_policy(self, allow_empty: Option<bool>) -> EmptyCommandPolicy {
		match allow_empty {
			Some(true) => EmptyCommandPolicy::Skip,
			Some(false) => EmptyCommandPolicy::Reject,
			None => match self {
				Mode::SingleFile => EmptyCommandPolicy::Reject,
				Mode::Batch => EmptyCommandPolicy::Skip,
			},
		}
	}
}

/// A file to rename and the command template to run for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
	pub file: String,
	pub command: String,
}

impl Job {
	pub fn new(file: impl Into<String>, command: impl Into<String>) -> Self {
		Job {
			file: file.into(),
			command: command.into(),
		}
	}
}

/// The step a file failed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
	Transform,
	Execute,
}

/// Where a file ended up.
#[derive(Debug)]
pub enum FileOutcome {
	/// Renamed and the command exited successfully.
	Executed(Transformed),
	/// Renamed, but there was no command to run.
	Skipped(Transformed),
	/// Renamed and the command was printed, not run.
	DryRun(Transformed),
	Failed { stage: Stage, error: TauError },
}

impl FileOutcome {
	pub fn is_failure(&self) -> bool {
		matches!(self, FileOutcome::Failed { .. })
	}

	/// The computed rename, if the transform step succeeded.
	pub fn transformed(&self) -> Option<&Transformed> {
		match self {
			FileOutcome::Executed(t) | FileOutcome::Skipped(t) | FileOutcome::DryRun(t) => Some(t),
			FileOutcome::Failed { .. } => None,
		}
	}
}

#[derive(Debug)]
pub struct FileReport {
	pub file: String,
	pub outcome: FileOutcome,
}

/// Outcomes for every file of a run, in processing order.
#[derive(Debug, Default)]
pub struct BatchReport {
	pub files: Vec<FileReport>,
}

impl BatchReport {
	pub fn succeeded(&self) -> usize {
		self.files.len() - self.failed()
	}

	pub fn failed(&self) -> usize {
		self.failures().count()
	}

	pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
		self.files.iter().filter(|report| report.outcome.is_failure())
	}
}

/// Runs the transform and execute steps over a list of jobs.
#[derive(Debug)]
pub struct Driver<'a> {
	rules: &'a RuleTable,
	executor: Executor,
	mode: Mode,
}

impl<'a> Driver<'a> {
	pub fn new(rules: &'a RuleTable, executor: Executor, mode: Mode) -> Self {
		Driver {
			rules,
			executor,
			mode,
		}
	}

	pub fn mode(&self) -> Mode {
		self.mode
	}

	/// Transform one file and run its command.
	pub fn process(&self, job: &Job) -> FileOutcome {
		let transformed = match self.rules.transform(&job.file) {
			Ok(transformed) => transformed,
			Err(error) => {
				return FileOutcome::Failed {
					stage: Stage::Transform,
					error,
				};
			}
		};

		let request = ExecutionRequest {
			command_template: &job.command,
			source_path: &job.file,
			new_name: &transformed.new_name,
		};

		match self.executor.execute(&request) {
			Ok(ExecOutcome::Completed(_)) => FileOutcome::Executed(transformed),
			Ok(ExecOutcome::Skipped) => FileOutcome::Skipped(transformed),
			Ok(ExecOutcome::DryRun(_)) => FileOutcome::DryRun(transformed),
			Err(error) => FileOutcome::Failed {
				stage: Stage::Execute,
				error,
			},
		}
	}

	/// Process every job in order.
	///
	/// In single-file mode the first failure is returned as an error. In batch mode
	/// failures are logged and collected, and the run itself always succeeds.
	pub fn run(&self, jobs: &[Job]) -> Result<BatchReport> {
		let mut report = BatchReport::default();

		for job in jobs {
			let span = tracing::info_span!("file", path = %job.file);
			let _guard = span.enter();

			let outcome = self.process(job);
			match outcome {
				FileOutcome::Failed { stage, error } if self.mode == Mode::SingleFile => {
					tracing::debug!(?stage, "aborting run");
					return Err(error);
				}
				FileOutcome::Failed { stage, ref error } => {
					tracing::error!(?stage, "{:?}: {error}", job.file);
				}
				_ => tracing::debug!("done"),
			}

			report.files.push(FileReport {
				file: job.file.clone(),
				outcome,
			});
		}

		if self.mode == Mode::Batch {
			tracing::info!(
				"{} succeeded, {} failed",
				report.succeeded(),
				report.failed()
			);
		}

		Ok(report)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::RuleSpec;
	use crate::exec::ExecOptions;

	fn rules() -> RuleTable {
		RuleTable::from_specs(&[RuleSpec {
			name: "bak".to_string(),
			matcher: r"^(.+)\.bak$".to_string(),
			transform: "$1".to_string(),
		}])
		.unwrap()
	}

	fn executor(mode: Mode, dry_run: bool) -> Executor {
		Executor::new(ExecOptions {
			empty_command: mode.empty_command_policy(None),
			dry_run,
		})
	}

	#[test]
	fn test_mode_empty_command_policy() {
		assert_eq!(
			Mode::SingleFile.empty_command_policy(None),
			EmptyCommandPolicy::Reject
		);
		assert_eq!(
			Mode::Batch.empty_command_policy(None),
			EmptyCommandPolicy::Skip
		);
		assert_eq!(
			Mode::SingleFile.empty_command_policy(Some(true)),
			EmptyCommandPolicy::Skip
		);
		assert_eq!(
			Mode::Batch.empty_command_policy(Some(false)),
			EmptyCommandPolicy::Reject
		);
	}

	#[test_log::test]
	fn test_batch_continues_past_failure() {
		let rules = rules();
		let driver = Driver::new(&rules, executor(Mode::Batch, true), Mode::Batch);
		let jobs = [
			Job::new("one.bak", "mv $source $target"),
			Job::new("two.txt", "mv $source $target"),
			Job::new("dir/three.bak", "mv $source $target"),
		];

		let report = driver.run(&jobs).unwrap();

		assert_eq!(report.files.len(), 3);
		assert_eq!(report.succeeded(), 2);
		assert_eq!(report.failed(), 1);

		let failure = report.failures().next().unwrap();
		assert_eq!(failure.file, "two.txt");
		assert!(matches!(
			failure.outcome,
			FileOutcome::Failed {
				stage: Stage::Transform,
				error: TauError::NoMatch { .. }
			}
		));

		assert_eq!(
			report.files[2].outcome.transformed().unwrap().new_name,
			"three"
		);
	}

	#[test_log::test]
	fn test_single_file_failure_is_fatal() {
		let rules = rules();
		let driver = Driver::new(
			&rules,
			executor(Mode::SingleFile, true),
			Mode::SingleFile,
		);

		let result = driver.run(&[Job::new("notes.txt", "mv $source $target")]);
		assert!(matches!(result, Err(TauError::NoMatch { .. })));
	}

	#[test_log::test]
	fn test_single_file_rejects_empty_command() {
		let rules = rules();
		let driver = Driver::new(
			&rules,
			executor(Mode::SingleFile, false),
			Mode::SingleFile,
		);

		let result = driver.run(&[Job::new("notes.txt.bak", "")]);
		assert!(matches!(result, Err(TauError::EmptyCommand)));
	}

	#[test_log::test]
	fn test_batch_skips_empty_command() {
		let rules = rules();
		let driver = Driver::new(&rules, executor(Mode::Batch, false), Mode::Batch);

		let report = driver.run(&[Job::new("notes.txt.bak", "")]).unwrap();
		assert_eq!(report.failed(), 0);
		assert!(matches!(
			report.files[0].outcome,
			FileOutcome::Skipped(ref t) if t.new_name == "notes.txt"
		));
	}

	#[test_log::test]
	fn test_batch_with_no_files() {
		let rules = rules();
		let driver = Driver::new(&rules, executor(Mode::Batch, false), Mode::Batch);

		let report = driver.run(&[]).unwrap();
		assert!(report.files.is_empty());
		assert_eq!(report.succeeded(), 0);
	}

	#[cfg(unix)]
	#[test_log::test]
	fn test_batch_executes_each_matching_file() {
		let temp_dir = tempfile::tempdir().unwrap();
		let out_dir = temp_dir.path().to_string_lossy().to_string();
		let command = format!("touch {out_dir}/$target");

		let rules = rules();
		let driver = Driver::new(&rules, executor(Mode::Batch, false), Mode::Batch);
		let jobs = [
			Job::new("a.bak", command.as_str()),
			Job::new("b.txt", command.as_str()),
			Job::new("c.bak", command.as_str()),
		];

		let report = driver.run(&jobs).unwrap();

		assert_eq!(report.succeeded(), 2);
		assert!(temp_dir.path().join("a").exists());
		assert!(!temp_dir.path().join("b").exists());
		assert!(temp_dir.path().join("c").exists());
	}

	#[cfg(unix)]
	#[test_log::test]
	fn test_batch_reports_execute_failures() {
		let rules = rules();
		let driver = Driver::new(&rules, executor(Mode::Batch, false), Mode::Batch);
		let jobs = [Job::new("a.bak", "false"), Job::new("b.bak", "true")];

		let report = driver.run(&jobs).unwrap();

		assert_eq!(report.failed(), 1);
		assert!(matches!(
			report.files[0].outcome,
			FileOutcome::Failed {
				stage: Stage::Execute,
				error: TauError::NonZeroExit { .. }
			}
		));
		assert!(matches!(report.files[1].outcome, FileOutcome::Executed(_)));
	}
}
