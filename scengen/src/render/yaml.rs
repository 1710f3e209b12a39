use config_schema::{NodeType, SchemaNode};
use serde_json::{Map, Value};

use crate::{
	GenError,
	render::{
		RenderOptions, apply_disabled_commenting, description_comments, override_hint, smart_quote,
		value_to_string,
	},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TypeHint {
	Bool,
	Number,
	None,
}

/// Compile a schema tree into YAML text lines.
///
/// The tree is rendered manually instead of being dumped through a
/// generic serializer: comments, banners, override hints and the
/// commented-out rendering of optional nodes all live between the data
/// lines, which no plain dumper can produce.
pub fn generate_yaml_from_schema(
	nodes: &[SchemaNode],
	options: &RenderOptions,
) -> Result<Vec<String>, GenError> {
	render_nodes(nodes, 0, options)
}

fn render_nodes(
	nodes: &[SchemaNode],
	indent: usize,
	options: &RenderOptions,
) -> Result<Vec<String>, GenError> {
	let mut lines = Vec::new();
	let mut is_first = true;

	for node in nodes {
		if !node.is_enabled() {
			continue;
		}

		if indent == 0 {
			if !is_first {
				lines.extend((0..options.top_level_spacing).map(|_| String::new()));
			}
			is_first = false;
		}

		lines.extend(render_node(node, indent, options)?);
	}

	Ok(lines)
}

fn render_node(
	node: &SchemaNode,
	indent: usize,
	options: &RenderOptions,
) -> Result<Vec<String>, GenError> {
	let is_object = node.has_type(NodeType::Object);
	let is_list = node.has_type(NodeType::List);

	// The validator rejects this upfront; rendering checks again so a
	// malformed tree can never silently produce half a document.
	if is_object && is_list {
		return Err(GenError::NodeTypeConflict {
			key: node.key.clone(),
		});
	}

	let prefix = "  ".repeat(indent);
	let mut node_lines = description_comments(&node.description, indent);
	let description_line_count = node_lines.len();

	let line_content = format!("{prefix}{}:", node.key);
	let hint = override_hint(node, &options.hint_marker);

	let mut value = node.resolved_value();
	if (is_object || is_list) && matches!(&value, Some(Value::String(s)) if s.is_empty()) {
		value = None;
	}

	if is_list {
		node_lines.extend(render_list_node(node, value.as_ref(), indent, options, &line_content, &hint)?);
	} else if is_object {
		node_lines.extend(render_object_node(node, value.as_ref(), indent, options, &line_content, &hint)?);
	} else {
		node_lines.extend(render_scalar_node(node, value, indent, &line_content, &hint));
	}

	Ok(apply_disabled_commenting(
		node_lines,
		node.required,
		node.has_blocking_conditions(),
		description_line_count,
	))
}

fn render_list_node(
	node: &SchemaNode,
	value: Option<&Value>,
	indent: usize,
	options: &RenderOptions,
	line_content: &str,
	hint: &str,
) -> Result<Vec<String>, GenError> {
	let mut lines = Vec::new();

	if !node.children.is_empty() {
		if let Some(Value::Array(items)) = value
			&& !items.is_empty()
		{
			lines.push(format!(
				"{line_content}{hint}{}",
				format_list_value(items, indent)
			));
		} else {
			// No literal list value: the children describe the single item
			// shape, so render them and bend the block into an array entry.
			lines.push(format!("{line_content}{hint}"));
			let child_lines = render_nodes(&node.children, indent + 1, options)?;
			lines.extend(apply_list_prefix(child_lines));
		}
	} else {
		let empty = Value::Array(Vec::new());
		let formatted = format_value(value.unwrap_or(&empty), indent, TypeHint::None);

		if formatted.starts_with('\n') {
			lines.push(format!("{line_content}{hint}{formatted}"));
		} else {
			lines.push(format!("{line_content} {formatted}{hint}"));
		}
	}

	Ok(lines)
}

fn render_object_node(
	node: &SchemaNode,
	value: Option<&Value>,
	indent: usize,
	options: &RenderOptions,
	line_content: &str,
	hint: &str,
) -> Result<Vec<String>, GenError> {
	let mut lines = Vec::new();

	let explicit_default_is_empty = match &node.default_value {
		None => true,
		Some(Value::String(s)) => s.is_empty(),
		Some(_) => false,
	};

	if !node.children.is_empty() && explicit_default_is_empty {
		lines.push(format!("{line_content}{hint}"));
		lines.extend(render_nodes(&node.children, indent + 1, options)?);
	} else {
		let empty = Value::Object(Map::new());
		let formatted = format_value(value.unwrap_or(&empty), indent, TypeHint::None);

		if formatted.starts_with('\n') {
			lines.push(format!("{line_content}{hint}{formatted}"));
		} else {
			lines.push(format!("{line_content} {formatted}{hint}"));
		}
	}

	Ok(lines)
}

fn render_scalar_node(
	node: &SchemaNode,
	value: Option<Value>,
	indent: usize,
	line_content: &str,
	hint: &str,
) -> Vec<String> {
	let type_hint = if node.has_type(NodeType::Bool) {
		TypeHint::Bool
	} else if node.has_type(NodeType::Number) {
		TypeHint::Number
	} else {
		TypeHint::None
	};

	let value = value.unwrap_or_else(|| match type_hint {
		TypeHint::Bool => Value::Bool(false),
		TypeHint::Number => Value::Number(0.into()),
		TypeHint::None => Value::String(String::new()),
	});

	let formatted = format_value(&value, indent, type_hint);
	let mut lines = Vec::new();

	if formatted.contains('\n') {
		if formatted.starts_with(" |") || formatted.starts_with(" >") {
			// Hints go after the block indicator, not after the content.
			let (indicator, body) = formatted.split_once('\n').expect("contains a newline");
			lines.push(format!("{line_content}{indicator}{hint}\n{body}"));
		} else {
			lines.push(format!("{line_content}{hint}{formatted}"));
		}
	} else {
		lines.push(format!("{line_content} {formatted}{hint}"));
	}

	lines
}

/// Inject the `- ` array bullet into the first data line of a rendered
/// child block and realign the rest.
///
/// Comment lines ahead of the first item keep their indent; every line
/// after the bullet gains two spaces so it lines up under the entry.
fn apply_list_prefix(child_lines: Vec<String>) -> Vec<String> {
	let mut lines = Vec::new();
	let mut item_started = false;

	for line in child_lines {
		if line.trim().is_empty() {
			continue;
		}

		let is_comment = line.trim_start().starts_with('#');

		if !item_started && !is_comment {
			let indent = line.len() - line.trim_start_matches(' ').len();
			lines.push(format!("{}- {}", &line[..indent], &line[indent..]));
			item_started = true;
		} else if !item_started && is_comment {
			lines.push(line);
		} else {
			lines.push(format!("  {line}"));
		}
	}

	lines
}

/// Format a value into YAML text. Structural results start with a newline
/// and carry their own indentation; scalar results are single fragments.
fn format_value(value: &Value, indent_level: usize, type_hint: TypeHint) -> String {
	if value.is_null() {
		return String::new();
	}

	match type_hint {
		TypeHint::Bool => return value_to_string(value).to_lowercase(),
		TypeHint::Number => return value_to_string(value),
		TypeHint::None => {}
	}

	match value {
		Value::Object(map) => format_dict_value(map, indent_level),
		Value::Array(items) => format_list_value(items, indent_level),
		Value::String(s) if s.contains('\n') => block_scalar(s, indent_level),
		Value::String(s) => smart_quote(s),
		other => value_to_string(other),
	}
}

/// Render a literal dictionary default by hand, preserving insertion
/// order and applying the same quoting rules as schema-driven nodes.
fn format_dict_value(map: &Map<String, Value>, indent_level: usize) -> String {
	if map.is_empty() {
		return "{}".to_string();
	}

	let prefix = "  ".repeat(indent_level + 1);
	let mut lines: Vec<String> = Vec::new();

	for (key, value) in map {
		let formatted_key = smart_quote(key);

		match value {
			Value::Object(_) | Value::Array(_) => {
				let child = format_value(value, indent_level + 1, TypeHint::None);
				if child.starts_with('\n') {
					lines.push(format!("{prefix}{formatted_key}:{child}"));
				} else {
					lines.push(format!("{prefix}{formatted_key}: {child}"));
				}
			}
			Value::String(s) if s.contains('\n') => {
				push_block_scalar_entry(&mut lines, &prefix, &format!("{formatted_key}:"), s);
			}
			scalar => lines.push(format!("{prefix}{formatted_key}: {}", format_scalar(scalar))),
		}
	}

	format!("\n{}", lines.join("\n"))
}

/// Render a literal list default. Container items are dumped as plain
/// blocks and realigned behind the bullet.
fn format_list_value(items: &[Value], indent_level: usize) -> String {
	if items.is_empty() {
		return "[]".to_string();
	}

	let prefix = "  ".repeat(indent_level + 1);
	let mut lines: Vec<String> = Vec::new();

	for item in items {
		match item {
			Value::Object(_) | Value::Array(_) => {
				let item_lines = dump_plain(item);
				if let Some((first, rest)) = item_lines.split_first() {
					lines.push(format!("{prefix}- {first}"));
					for line in rest {
						lines.push(format!("{prefix}  {line}"));
					}
				}
			}
			Value::String(s) if s.contains('\n') => {
				push_block_scalar_entry(&mut lines, &prefix, "-", s);
			}
			scalar => lines.push(format!("{prefix}- {}", format_scalar(scalar))),
		}
	}

	format!("\n{}", lines.join("\n"))
}

/// Plain block rendering of a container at column zero, used for items
/// inside literal list defaults.
fn dump_plain(value: &Value) -> Vec<String> {
	match value {
		Value::Object(map) if map.is_empty() => vec!["{}".to_string()],
		Value::Object(map) => {
			let mut lines = Vec::new();
			for (key, item) in map {
				let formatted_key = smart_quote(key);
				match item {
					Value::Object(_) | Value::Array(_) => {
						lines.push(format!("{formatted_key}:"));
						for line in dump_plain(item) {
							lines.push(format!("  {line}"));
						}
					}
					scalar => lines.push(format!("{formatted_key}: {}", format_scalar(scalar))),
				}
			}
			lines
		}
		Value::Array(items) if items.is_empty() => vec!["[]".to_string()],
		Value::Array(items) => {
			let mut lines = Vec::new();
			for item in items {
				match item {
					Value::Object(_) | Value::Array(_) => {
						let nested = dump_plain(item);
						if let Some((first, rest)) = nested.split_first() {
							lines.push(format!("- {first}"));
							for line in rest {
								lines.push(format!("  {line}"));
							}
						}
					}
					scalar => lines.push(format!("- {}", format_scalar(scalar))),
				}
			}
			lines
		}
		scalar => vec![format_scalar(scalar)],
	}
}

fn format_scalar(value: &Value) -> String {
	match value {
		// Newlines cannot survive a plain scalar; fall back to an escaped
		// double-quoted form.
		Value::String(s) if s.contains('\n') => {
			serde_json::to_string(s).unwrap_or_else(|_| smart_quote(s))
		}
		Value::String(s) => smart_quote(s),
		other => value_to_string(other),
	}
}

/// Emit a multi-line string as a block scalar: ` |-`/` |`/` |+` chosen by
/// the trailing-newline count, content indented one level past the key.
fn block_scalar(text: &str, indent_level: usize) -> String {
	let trailing_newlines = text.len() - text.trim_end_matches('\n').len();
	let indicator = match trailing_newlines {
		0 => "|-",
		1 => "|",
		_ => "|+",
	};

	let mut content: Vec<&str> = text.split('\n').collect();
	if trailing_newlines > 0 && content.last() == Some(&"") {
		content.pop();
	}

	let prefix = "  ".repeat(indent_level + 1);
	let body: Vec<String> = content
		.iter()
		.map(|line| {
			if line.is_empty() {
				String::new()
			} else {
				format!("{prefix}{line}")
			}
		})
		.collect();

	format!(" {indicator}\n{}", body.join("\n"))
}

/// Append `entry: |-` plus its indented content lines, for block scalars
/// living inside literal dict/list defaults.
fn push_block_scalar_entry(lines: &mut Vec<String>, prefix: &str, entry: &str, text: &str) {
	let block = block_scalar(text, 0);
	let (indicator, body) = block.split_once('\n').expect("block scalars span lines");

	lines.push(format!("{prefix}{entry}{indicator}"));

	for line in body.split('\n') {
		if line.is_empty() {
			lines.push(String::new());
		} else {
			lines.push(format!("{prefix}  {line}"));
		}
	}
}
