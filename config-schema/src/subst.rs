use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::{EnvMap, SchemaNode};

static UNRESOLVED_PATH_VAR: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\{[A-Z0-9_]+\}").expect("valid pattern"));

static UNRESOLVED_CONTENT_VAR: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\$\{[A-Z0-9_]+\}").expect("valid pattern"));

/// Substitute `{VAR}` placeholders in a filesystem path template.
///
/// Remnants that still look like placeholders after substitution are
/// logged and left in place; an unresolved path segment is a template
/// authoring problem, not a reason to abort the run.
pub fn resolve_path_vars(path_template: &str, env: &EnvMap) -> String {
	let mut resolved = path_template.to_string();

	for (key, value) in env {
		let placeholder = format!("{{{key}}}");
		if resolved.contains(&placeholder) {
			resolved = resolved.replace(&placeholder, value);
		}
	}

	if UNRESOLVED_PATH_VAR.is_match(&resolved) {
		warn!("Unresolved placeholders in path: {resolved}");
	}

	resolved
}

/// Substitute `${VAR}` placeholders in raw file content or a string value,
/// `envsubst`-style.
pub fn resolve_content_vars(content: &str, env: &EnvMap) -> String {
	let mut resolved = content.to_string();

	for (key, value) in env {
		let placeholder = format!("${{{key}}}");
		if resolved.contains(&placeholder) {
			resolved = resolved.replace(&placeholder, value);
		}
	}

	if let Some(unresolved) = UNRESOLVED_CONTENT_VAR.find(&resolved) {
		warn!(
			"Unresolved variable placeholder {} in content.",
			unresolved.as_str()
		);
	}

	resolved
}

/// Rewrite `${VAR}` placeholders inside every `default_value` of a schema
/// tree, recursing through nested objects and arrays.
///
/// Only `default_value` is touched: `regex` placeholders, descriptions and
/// keys stay verbatim. Non-string leaves pass through unchanged, and empty
/// string defaults are left alone.
pub fn substitute_env_in_default_values(nodes: &mut [SchemaNode], env: &EnvMap) {
	for node in nodes {
		if let Some(value) = node.default_value.as_mut() {
			let is_empty_string = matches!(value, Value::String(s) if s.is_empty());
			if !is_empty_string {
				resolve_value_strings(value, env);
			}
		}

		substitute_env_in_default_values(&mut node.children, env);
	}
}

fn resolve_value_strings(value: &mut Value, env: &EnvMap) {
	match value {
		Value::String(s) => *s = resolve_content_vars(s, env),
		Value::Array(items) => {
			for item in items {
				resolve_value_strings(item, env);
			}
		}
		Value::Object(map) => {
			for (_, item) in map.iter_mut() {
				resolve_value_strings(item, env);
			}
		}
		_ => {}
	}
}
