use crate::config::types::{Config, LoadedConfig};
use crate::error::{Result, TauError};
use std::path::Path;

/// Parse a config file from the given path.
pub fn parse_config_file(path: &Path) -> Result<Config> {
	let content = std::fs::read_to_string(path).map_err(|source| {
		if source.kind() == std::io::ErrorKind::NotFound {
			TauError::ConfigNotFound {
				path: path.to_path_buf(),
			}
		} else {
			TauError::ConfigReadError {
				path: path.to_path_buf(),
				source,
			}
		}
	})?;

	parse_config_str(&content, path)
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path) -> Result<Config> {
	let config: Config =
		toml::from_str(content).map_err(|source| TauError::ConfigParseError {
			path: path.to_path_buf(),
			source,
		})?;

	// Validate the parsed config
	config.validate()?;

	Ok(config)
}

/// Load a config file and keep its path alongside it.
pub fn load_config(path: &Path) -> Result<LoadedConfig> {
	let config = parse_config_file(path)?;
	tracing::debug!(
		path = %path.display(),
		rules = config.rule_count(),
		"loaded config"
	);
	Ok(LoadedConfig {
		config,
		path: path.to_path_buf(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::types::RuleSpec;
	use std::path::PathBuf;

	fn spec(name: &str, matcher: &str, transform: &str) -> RuleSpec {
		RuleSpec {
			name: name.to_string(),
			matcher: matcher.to_string(),
			transform: transform.to_string(),
		}
	}

	#[test]
	fn test_parse_empty_config() {
		let content = "";
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert!(config.command.is_none());
		assert!(config.allow_empty_command.is_none());
		assert!(config.rules.is_empty());
		assert!(config.named.is_empty());
		assert!(config.ordered_rules().is_empty());
	}

	#[test]
	fn test_parse_settings() {
		let content = r#"
command = "mv -i $source $target"
allow-empty-command = false
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert_eq!(config.command, Some("mv -i $source $target".to_string()));
		assert_eq!(config.allow_empty_command, Some(false));
	}

	#[test]
	fn test_parse_rules_array_of_tables() {
		let content = r#"
[[rules]]
name = "strip-bak"
matcher = '^(.+)\.bak$'
transform = "$1"

[[rules]]
matcher = '^(.+)\.jpeg$'
transform = "$1.jpg"
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert_eq!(
			config.ordered_rules(),
			vec![
				spec("strip-bak", r"^(.+)\.bak$", "$1"),
				spec("rules[2]", r"^(.+)\.jpeg$", "$1.jpg"),
			]
		);
	}

	#[test]
	fn test_parse_named_tables_with_capitalized_keys() {
		let content = r#"
[episodes]
Matcher = 'S(\d+)E(\d+)'
Transform = "season-$1-episode-$2.mkv"
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert_eq!(config.rule_count(), 1);
		assert_eq!(
			config.ordered_rules(),
			vec![spec("episodes", r"S(\d+)E(\d+)", "season-$1-episode-$2.mkv")]
		);
	}

	#[test]
	fn test_named_tables_order_by_priority_then_name() {
		let content = r#"
[zebra]
matcher = "z"
transform = "z"

[alpha]
matcher = "a"
transform = "a"

[late]
matcher = "l"
transform = "l"
priority = 5

[early]
matcher = "e"
transform = "e"
priority = -1
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		let names: Vec<_> = config
			.ordered_rules()
			.into_iter()
			.map(|rule| rule.name)
			.collect();
		assert_eq!(names, vec!["early", "alpha", "zebra", "late"]);
	}

	#[test]
	fn test_listed_rules_come_before_named_tables() {
		let content = r#"
command = "echo $source"

[[rules]]
name = "listed"
matcher = "x"
transform = "y"

[named]
matcher = "x"
transform = "z"
priority = -100
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		let names: Vec<_> = config
			.ordered_rules()
			.into_iter()
			.map(|rule| rule.name)
			.collect();
		assert_eq!(names, vec!["listed", "named"]);
		assert_eq!(config.command, Some("echo $source".to_string()));
	}

	#[test]
	fn test_duplicate_rule_names() {
		let content = r#"
[[rules]]
name = "bak"
matcher = "a"
transform = "b"

[bak]
matcher = "c"
transform = "d"
"#;
		let path = PathBuf::from("test.toml");
		let result = parse_config_str(content, &path);

		match result.unwrap_err() {
			TauError::DuplicateRule { name } => assert_eq!(name, "bak"),
			other => panic!("Expected DuplicateRule error, got {other:?}"),
		}
	}

	#[test]
	fn test_missing_transform_is_parse_error() {
		let content = r#"
[[rules]]
matcher = "a"
"#;
		let path = PathBuf::from("test.toml");
		let result = parse_config_str(content, &path);

		assert!(matches!(
			result.unwrap_err(),
			TauError::ConfigParseError { .. }
		));
	}

	#[test]
	fn test_invalid_toml() {
		let path = PathBuf::from("test.toml");
		let result = parse_config_str("invalid toml [[[", &path);

		match result.unwrap_err() {
			TauError::ConfigParseError { path, .. } => {
				assert_eq!(path, PathBuf::from("test.toml"));
			}
			other => panic!("Expected ConfigParseError, got {other:?}"),
		}
	}

	#[test]
	fn test_missing_file_is_not_found() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("absent.toml");

		match parse_config_file(&path).unwrap_err() {
			TauError::ConfigNotFound { path: reported } => assert_eq!(reported, path),
			other => panic!("Expected ConfigNotFound, got {other:?}"),
		}
	}

	#[test]
	fn test_load_config_keeps_path() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("tau.toml");
		std::fs::write(
			&path,
			"[[rules]]\nmatcher = 'a'\ntransform = 'b'\n",
		)
		.unwrap();

		let loaded = load_config(&path).unwrap();
		assert_eq!(loaded.path, path);
		assert_eq!(loaded.config.rule_count(), 1);
	}
}
