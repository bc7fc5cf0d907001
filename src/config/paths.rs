use crate::error::{Result, TauError};
use std::path::{Path, PathBuf};

/// Get the path to the user's config file: `~/.config/tau.toml`.
pub fn default_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(TauError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(".config").join("tau.toml"))
}

/// Generate a commented starter config.
pub fn generate_init_template() -> String {
	r#"# tau configuration.
#
# Rules are tried in order and the first one whose `matcher` is found in the
# file's basename wins. `transform` builds the new name: `$1` or `${1}` for
# numbered groups, `$name` or `${name}` for named groups, `$$` for a literal `$`.

# Command used in batch mode when --command is not given.
# `$source` is the path as given, `$target` is the new basename.
# command = "mv -i $source $target"

# Set to true to skip files when there is no command, false to fail instead.
# allow-empty-command = true

[[rules]]
name = "strip-bak"
matcher = '^(.+)\.bak$'
transform = "$1"

[[rules]]
name = "dated-photos"
matcher = '^IMG_(?P<date>\d{8})_(?P<seq>\d+)\.(?i:jpe?g)$'
transform = "${date}-${seq}.jpg"
"#
	.to_string()
}

/// Write the starter config to `path`, creating parent directories.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn write_init_config(path: &Path, force: bool) -> std::io::Result<bool> {
	if path.exists() && !force {
		return Ok(false);
	}

	if let Some(parent) = path.parent()
		&& !parent.as_os_str().is_empty()
	{
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, generate_init_template())?;
	Ok(true)
}
