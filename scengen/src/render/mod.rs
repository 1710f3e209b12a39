mod ini;
mod quote;
mod yaml;

pub use ini::generate_ini_from_schema;
pub use quote::smart_quote;
pub use yaml::generate_yaml_from_schema;

use config_schema::SchemaNode;
use serde_json::Value;

use crate::AppConfig;

pub(crate) const BANNER_WIDTH: usize = 42;

/// Presentation knobs shared by both renderers, extracted once from the
/// orchestrator config.
#[derive(Clone, Debug)]
pub struct RenderOptions {
	/// Fully formatted override marker, always starting with a comment
	/// character.
	pub hint_marker: String,

	/// Blank lines between top-level YAML sections.
	pub top_level_spacing: usize,
}

impl RenderOptions {
	pub fn from_config(config: &AppConfig) -> Self {
		Self {
			hint_marker: normalize_hint_style(&config.override_hint_style),
			top_level_spacing: config.top_level_spacing,
		}
	}
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self::from_config(&AppConfig::default())
	}
}

/// Hint styles may omit the comment character; prefix `# ` so the marker
/// never breaks the generated file.
fn normalize_hint_style(style: &str) -> String {
	let trimmed = style.trim();

	if trimmed.starts_with('#') || trimmed.starts_with(';') {
		style.to_string()
	} else {
		format!("# {style}")
	}
}

/// The ` # <=== [Override]` suffix for a rendered key line, or nothing.
pub(crate) fn override_hint(node: &SchemaNode, hint_marker: &str) -> String {
	if node.override_hint {
		format!(" {hint_marker}")
	} else {
		String::new()
	}
}

/// A highly visible block comment framing the description between lines of
/// equal signs. Long generated files are illegible without section
/// anchors.
pub(crate) fn generate_banner(description: &str, indent: usize, width: usize) -> Vec<String> {
	let prefix = "  ".repeat(indent);
	let frame = format!("{prefix}# {}", "=".repeat(width));

	let mut lines = vec![frame.clone()];

	for description_line in description.split('\n') {
		lines.push(format!("{prefix}# {description_line}"));
	}

	lines.push(frame);
	lines
}

/// Turn a node description into comment lines: a leading `#` escalates the
/// description to a banner block, anything else becomes `# ` line
/// comments.
pub(crate) fn description_comments(description: &str, indent: usize) -> Vec<String> {
	if description.is_empty() {
		return Vec::new();
	}

	if let Some(banner_text) = description.strip_prefix('#') {
		return generate_banner(banner_text.trim_start_matches(' '), indent, BANNER_WIDTH);
	}

	let prefix = "  ".repeat(indent);

	description
		.split('\n')
		.map(|line| format!("{prefix}# {line}"))
		.collect()
}

/// Disable a rendered block by commenting out its data lines.
///
/// Nodes that are not required still render, but inert: every non-blank
/// line after the description block gets `# ` inserted at its original
/// indent, so the structure stays readable and can be uncommented by
/// hand. Nodes carrying conditions are left active.
pub(crate) fn apply_disabled_commenting(
	node_lines: Vec<String>,
	required: bool,
	has_conditions: bool,
	description_line_count: usize,
) -> Vec<String> {
	if required || has_conditions {
		return node_lines;
	}

	let flat: Vec<&str> = node_lines.iter().flat_map(|line| line.split('\n')).collect();

	flat
		.into_iter()
		.enumerate()
		.map(|(position, line)| {
			if position < description_line_count || line.trim().is_empty() {
				line.to_string()
			} else {
				let indent = line.len() - line.trim_start_matches(' ').len();
				format!("{}# {}", &line[..indent], &line[indent..])
			}
		})
		.collect()
}

/// Plain textual form of a scalar JSON value. Containers fall back to
/// compact JSON; the renderers only reach that case through malformed
/// value maps.
pub(crate) fn value_to_string(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::Bool(b) => b.to_string(),
		Value::Number(n) => n.to_string(),
		Value::String(s) => s.clone(),
		container => serde_json::to_string(container).unwrap_or_default(),
	}
}
