use regex::{Captures, Regex};
use std::fmt;

/// Expand a transform template against a match.
///
/// Follows the regex crate's convention: `$1`/`${1}` and `$name`/`${name}` are
/// replaced by the group's text, `$$` is a literal `$`, and a group that does not
/// exist or did not participate expands to the empty string.
pub fn expand(captures: &Captures<'_>, template: &str) -> String {
	let mut out = String::new();
	captures.expand(template, &mut out);
	out
}

/// Check that an expanded name is usable as a basename.
pub fn validate_target(new_name: &str) -> Result<(), &'static str> {
	if new_name.is_empty() {
		return Err("transform produced an empty name");
	}
	if new_name == "." || new_name == ".." {
		return Err("transform produced a relative directory name");
	}
	if new_name.chars().any(std::path::is_separator) {
		return Err("transform produced a name containing a path separator");
	}
	Ok(())
}

/// A problem with a transform template that does not prevent loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateIssue {
	/// `$1abc` reads as the group named `1abc`, not group 1 followed by `abc`.
	Ambiguous { reference: String },

	/// The template refers to a group the pattern does not define.
	MissingGroup { reference: String },
}

impl fmt::Display for TemplateIssue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TemplateIssue::Ambiguous { reference } => {
				let digits: String = reference.chars().take_while(char::is_ascii_digit).collect();
				let rest = &reference[digits.len()..];
				write!(
					f,
					"`${reference}` is read as the group named `{reference}`; use `${{{digits}}}{rest}` if group {digits} was meant"
				)
			}
			TemplateIssue::MissingGroup { reference } => {
				write!(
					f,
					"`${reference}` refers to a group the pattern does not define and will expand to nothing"
				)
			}
		}
	}
}

/// A group reference found in a template.
#[derive(Debug, PartialEq, Eq)]
struct GroupRef<'t> {
	name: &'t str,
	braced: bool,
}

/// Find group references the same way `Captures::expand` reads them.
fn group_references(template: &str) -> Vec<GroupRef<'_>> {
	let bytes = template.as_bytes();
	let mut refs = Vec::new();
	let mut i = 0;

	while i < bytes.len() {
		if bytes[i] != b'$' {
			i += 1;
			continue;
		}
		match bytes.get(i + 1) {
			Some(b'$') => i += 2,
			Some(b'{') => match template[i + 2..].find('}') {
				Some(len) => {
					refs.push(GroupRef {
						name: &template[i + 2..i + 2 + len],
						braced: true,
					});
					i += len + 3;
				}
				None => i += 1,
			},
			_ => {
				let start = i + 1;
				let mut end = start;
				while end < bytes.len() && (bytes[end] == b'_' || bytes[end].is_ascii_alphanumeric()) {
					end += 1;
				}
				if end > start {
					refs.push(GroupRef {
						name: &template[start..end],
						braced: false,
					});
				}
				i = end.max(i + 1);
			}
		}
	}

	refs
}

/// Report template references that will not do what they look like.
pub fn lint_template(regex: &Regex, template: &str) -> Vec<TemplateIssue> {
	let mut issues = Vec::new();

	for group in group_references(template) {
		let name = group.name;
		let starts_with_digit = name.starts_with(|c: char| c.is_ascii_digit());
		let all_digits = !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit());

		if !group.braced && starts_with_digit && !all_digits {
			issues.push(TemplateIssue::Ambiguous {
				reference: name.to_string(),
			});
			continue;
		}

		let defined = if all_digits {
			name.parse::<usize>()
				.is_ok_and(|index| index < regex.captures_len())
		} else {
			regex.capture_names().flatten().any(|n| n == name)
		};

		if !defined {
			let reference = if group.braced {
				format!("{{{name}}}")
			} else {
				name.to_string()
			};
			issues.push(TemplateIssue::MissingGroup { reference });
		}
	}

	issues
}
