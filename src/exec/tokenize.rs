//! Shell-like splitting of command templates.
//!
//! Splitting is done by the `shlex` crate and follows POSIX shell word splitting, without
//! any expansion:
//! - unquoted space, tab and newline separate words; `\r` is an ordinary character
//! - `'...'` keeps everything literally
//! - `"..."` keeps everything except `\"`, `\\`, `\$` and `` \` ``, which drop the
//!   backslash, and backslash-newline, which is removed; other backslashes are kept
//! - an unquoted `\` escapes the next character, and backslash-newline is removed
//! - adjacent pieces join into one word, so `a"b c"d` is `ab cd` and `""` is an empty word
//! - a `#` at the start of a word begins a comment that runs to the end of the line
//!
//! Other metacharacters such as `|`, `;`, `>` and `*` are ordinary characters.

use crate::error::{Result, TauError};
use std::borrow::Cow;

/// Split a command line into words.
pub fn split(command: &str) -> Result<Vec<String>> {
	let mut lexer = shlex::Shlex::new(command);
	let words: Vec<String> = lexer.by_ref().collect();

	if lexer.had_error {
		return Err(TauError::Tokenize {
			command: command.to_string(),
			reason: "unterminated quote or trailing backslash",
		});
	}
	Ok(words)
}

/// Quote a word for display if it would not read back as a single word.
///
/// Words containing a NUL byte cannot be shell-quoted and are shown in Rust string syntax.
pub fn quote_for_display(word: &str) -> Cow<'_, str> {
	shlex::try_quote(word).unwrap_or_else(|_| Cow::Owned(format!("{word:?}")))
}

/// Render words as a single display line.
pub fn render<S: AsRef<str>>(words: &[S]) -> String {
	words
		.iter()
		.map(|word| quote_for_display(word.as_ref()))
		.collect::<Vec<_>>()
		.join(" ")
}
