use std::sync::LazyLock;

use regex::Regex;

static BOOLEAN_WORDS: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)^(true|false|yes|no|on|off)$").expect("valid pattern"));

static NUMERIC_LOOKALIKE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[\d.]+$").expect("valid pattern"));

static ENV_SUBSTITUTION: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\$\{?\w+\}?").expect("valid pattern"));

/// Characters a bare YAML scalar must not start with.
const RESTRICTED_START: [char; 12] = [
	'"', '\'', '*', '&', '!', '?', '-', '<', '>', '%', '@', '`',
];

/// Characters that make an unquoted scalar structurally ambiguous.
const DANGEROUS_CHARS: [char; 10] = [':', '#', '{', '}', '[', ']', ',', '/', '|', '!'];

/// Format a string with the minimal quoting that keeps it unambiguous.
///
/// Stock YAML dumpers quote aggressively (IP addresses, Unix paths); the
/// generated files should read like hand-written configs, so values stay
/// bare unless an unquoted rendition would collapse into a native type
/// (`true`, `8080`) or break the syntax. Already-quoted values pass
/// through untouched; embedded double quotes are escaped.
pub fn smart_quote(raw: &str) -> String {
	if is_wrapped(raw, '"') || is_wrapped(raw, '\'') {
		return raw.to_string();
	}

	let needs_quotes = raw.trim().is_empty()
		|| BOOLEAN_WORDS.is_match(raw)
		|| NUMERIC_LOOKALIKE.is_match(raw)
		|| raw.contains(DANGEROUS_CHARS)
		|| raw.starts_with(RESTRICTED_START)
		|| raw.starts_with(' ')
		|| raw.ends_with(' ')
		|| ENV_SUBSTITUTION.is_match(raw);

	if needs_quotes {
		format!("\"{}\"", raw.replace('"', "\\\""))
	} else {
		raw.to_string()
	}
}

fn is_wrapped(value: &str, quote: char) -> bool {
	value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote)
}
