use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tau_cli::config::{default_config_path, load_config, write_init_config};
use tau_cli::driver::{Driver, Job, Mode};
use tau_cli::exec::{ExecOptions, Executor};
use tau_cli::logging;
use tau_cli::rules::RuleTable;

#[derive(Parser)]
#[command(name = "tau")]
#[command(
	author,
	version,
	about = "CLI tool for renaming files by regex rules and running a command with the old and new names"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	subcommand: Option<Commands>,

	/// Config file to use [default: ~/.config/tau.toml]
	#[arg(long, value_name = "PATH", global = true)]
	config: Option<PathBuf>,

	/// Enable verbose logging
	#[arg(short, long, global = true)]
	verbose: bool,

	/// Print each command instead of running it
	#[arg(short = 'n', long)]
	dry_run: bool,

	/// Batch mode: run COMMAND for every FILE, continuing past failures
	#[arg(short = 'c', long = "command", value_name = "COMMAND")]
	batch_command: Option<String>,

	/// Batch mode using the `command` from the config file, if any
	#[arg(long)]
	batch: bool,

	/// Write a starter config file to the config path
	#[arg(long)]
	init: bool,

	/// Overwrite an existing config file when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// FILE and COMMAND in single-file mode, or the FILEs to process in batch mode
	#[arg(value_name = "ARGS")]
	args: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display the rules in the order they are tried
	Show,
	/// Check the config file for errors without running anything
	Validate,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();
	logging::init(cli.verbose);
	tracing::trace!("starting up");

	let config_path = match cli.config {
		Some(ref path) => path.clone(),
		None => default_config_path().context("Failed to locate default config file")?,
	};

	// Handle --init
	if cli.init {
		return handle_init(&config_path, cli.force);
	}

	// Handle subcommands
	if let Some(ref command) = cli.subcommand {
		return match command {
			Commands::Config { action } => match action {
				ConfigAction::Show => handle_config_show(&config_path),
				ConfigAction::Validate => handle_config_validate(&config_path),
			},
		};
	}

	let mode = if cli.batch || cli.batch_command.is_some() {
		Mode::Batch
	} else {
		Mode::SingleFile
	};

	handle_files(&config_path, mode, &cli)
}

fn handle_init(config_path: &Path, force: bool) -> Result<ExitCode> {
	let written = write_init_config(config_path, force)
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	if !written {
		anyhow::bail!(
			"{} already exists. Use --force to overwrite.",
			config_path.display()
		);
	}

	println!("Created {}", config_path.display());
	Ok(ExitCode::SUCCESS)
}

fn handle_config_show(config_path: &Path) -> Result<ExitCode> {
	if !config_path.exists() {
		println!("No configuration file found at {}", config_path.display());
		return Ok(ExitCode::SUCCESS);
	}

	let loaded = load_config(config_path).context("Failed to load configuration")?;
	let config = &loaded.config;

	println!("# Source: {}", loaded.path.display());
	if let Some(ref command) = config.command {
		println!("# command: {}", command);
	}
	if let Some(allow) = config.allow_empty_command {
		println!("# allow-empty-command: {}", allow);
	}
	println!("# rules: {}", config.rule_count());
	println!();

	for (i, rule) in config.ordered_rules().iter().enumerate() {
		println!("  Rule {}: {}", i + 1, rule.name);
		println!("    matcher: {}", rule.matcher);
		println!("    transform: {}", rule.transform);
		println!();
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate(config_path: &Path) -> Result<ExitCode> {
	if !config_path.exists() {
		println!("No configuration file found at {}", config_path.display());
		return Ok(ExitCode::SUCCESS);
	}

	match load_config(config_path).and_then(|loaded| RuleTable::compile(&loaded.config)) {
		Ok(rules) => {
			println!(
				"Configuration is valid: {} ({} rules)",
				config_path.display(),
				rules.len()
			);
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}

fn handle_files(config_path: &Path, mode: Mode, cli: &Cli) -> Result<ExitCode> {
	let loaded = load_config(config_path).context("Failed to load configuration")?;
	let rules = RuleTable::compile(&loaded.config).context("Failed to compile rules")?;

	let jobs: Vec<Job> = match mode {
		Mode::SingleFile => {
			let [file, command] = cli.args.as_slice() else {
				anyhow::bail!(
					"expected exactly FILE and COMMAND (use --command or --batch to process several files)"
				);
			};
			vec![Job::new(file.as_str(), command.as_str())]
		}
		Mode::Batch => {
			let command = cli
				.batch_command
				.clone()
				.or_else(|| loaded.config.command.clone())
				.unwrap_or_default();
			cli.args
				.iter()
				.map(|file| Job::new(file.as_str(), command.as_str()))
				.collect()
		}
	};

	let executor = Executor::new(ExecOptions {
		empty_command: mode.empty_command_policy(loaded.config.allow_empty_command),
		dry_run: cli.dry_run,
	});
	let driver = Driver::new(&rules, executor, mode);

	match driver.run(&jobs) {
		Ok(report) => {
			if report.failed() > 0 {
				eprintln!(
					"{} of {} files failed",
					report.failed(),
					report.files.len()
				);
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(error) => {
			// Single-file mode: mirror the child's exit code when it has one.
			if let Some(code) = error.exit_code() {
				eprintln!("error: {error}");
				return Ok(child_exit_code(code));
			}
			let file = jobs.first().map_or("", |job| job.file.as_str());
			Err::<ExitCode, _>(error).with_context(|| format!("Failed to process {file}"))
		}
	}
}

fn child_exit_code(code: i32) -> ExitCode {
	u8::try_from(code)
		.ok()
		.filter(|code| *code != 0)
		.map(ExitCode::from)
		.unwrap_or(ExitCode::FAILURE)
}
