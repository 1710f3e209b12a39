use config_schema::SchemaNode;
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::render::{
	RenderOptions, apply_disabled_commenting, description_comments, override_hint, smart_quote,
	value_to_string,
};

/// Compile an INI-shaped schema tree into Ansible inventory text lines.
///
/// INI files are flat: the four recognised root nodes map to fixed
/// section kinds, emitted in a fixed order regardless of schema order.
/// Every group block ends with a blank separator line.
pub fn generate_ini_from_schema(nodes: &[SchemaNode], options: &RenderOptions) -> Vec<String> {
	let mut lines = Vec::new();

	render_global_vars(nodes, &mut lines);
	render_groups(nodes, &options.hint_marker, &mut lines);
	render_aggregations(nodes, &mut lines);
	render_group_vars(nodes, &options.hint_marker, &mut lines);

	lines
}

/// The `[all:vars]` section: the `global_vars` node's resolved dict value
/// flattened into `key=value` lines.
fn render_global_vars(nodes: &[SchemaNode], lines: &mut Vec<String>) {
	for node in section_roots(nodes, "global_vars") {
		lines.extend(description_comments(&node.description, 0));
		lines.push("[all:vars]".to_string());

		if let Some(Value::Object(vars)) = node.resolved_value() {
			for (key, value) in &vars {
				lines.push(format!("{key}={}", smart_quote(&value_to_string(value))));
			}
		}

		lines.push(String::new());
	}
}

/// The `[<group>]` sections: one block per group child, hosts from the
/// resolved value map or a synthetic example row built from the child
/// schemas.
fn render_groups(nodes: &[SchemaNode], hint_marker: &str, lines: &mut Vec<String>) {
	for node in section_roots(nodes, "groups") {
		lines.extend(description_comments(&node.description, 0));

		let groups_value = resolved_map(node);
		let (schema_map, ordered) = ordered_keys(node, &groups_value);

		for group_key in &ordered {
			let group_schema = schema_map.get(group_key.as_str()).copied();
			if group_schema.is_some_and(|schema| !schema.is_enabled()) {
				continue;
			}

			let hosts = groups_value
				.get(group_key)
				.and_then(Value::as_array)
				.cloned()
				.unwrap_or_default();

			let mut block = group_schema
				.map(|schema| description_comments(&schema.description, 0))
				.unwrap_or_default();
			let description_line_count = block.len();

			let hint = group_schema
				.map(|schema| override_hint(schema, hint_marker))
				.unwrap_or_default();
			block.push(format!("[{group_key}]{hint}"));
			block.extend(render_hosts(
				&hosts,
				group_schema.map(|schema| schema.children.as_slice()).unwrap_or_default(),
			));

			push_section(lines, block, group_schema, description_line_count);
		}
	}
}

/// The `[<group>:children]` sections grouping groups under a parent name.
fn render_aggregations(nodes: &[SchemaNode], lines: &mut Vec<String>) {
	for node in section_roots(nodes, "aggregations") {
		lines.extend(description_comments(&node.description, 0));

		let aggregations_value = resolved_map(node);
		let (schema_map, ordered) = ordered_keys(node, &aggregations_value);

		for aggregation_key in &ordered {
			let child_schema = schema_map.get(aggregation_key.as_str()).copied();
			if child_schema.is_some_and(|schema| !schema.is_enabled()) {
				continue;
			}

			let mut block = child_schema
				.map(|schema| description_comments(&schema.description, 0))
				.unwrap_or_default();
			let description_line_count = block.len();

			block.push(format!("[{aggregation_key}:children]"));

			// Member names come from the child's own resolved value, then
			// the parent map entry, then the child schema keys.
			let mut members = child_schema
				.and_then(SchemaNode::resolved_value)
				.filter(has_content);
			if members.is_none() {
				members = aggregations_value
					.get(aggregation_key)
					.cloned()
					.filter(has_content);
			}

			match members {
				Some(Value::Array(items)) => {
					for item in &items {
						block.push(value_to_string(item));
					}
				}
				Some(other) => block.push(value_to_string(&other)),
				None => {
					if let Some(schema) = child_schema {
						for child in &schema.children {
							if !child.key.is_empty() {
								block.push(child.key.clone());
							}
						}
					}
				}
			}

			push_section(lines, block, child_schema, description_line_count);
		}
	}
}

/// The `[<group>:vars]` sections: child schema values, the group's own
/// dict default and the parent `group_vars` map merged in that order,
/// later sources winning.
fn render_group_vars(nodes: &[SchemaNode], hint_marker: &str, lines: &mut Vec<String>) {
	for node in section_roots(nodes, "group_vars") {
		lines.extend(description_comments(&node.description, 0));

		let group_vars_value = resolved_map(node);
		let (schema_map, ordered) = ordered_keys(node, &group_vars_value);

		for group_key in &ordered {
			let group_schema = schema_map.get(group_key.as_str()).copied();
			if group_schema.is_some_and(|schema| !schema.is_enabled()) {
				continue;
			}

			let mut block = group_schema
				.map(|schema| description_comments(&schema.description, 0))
				.unwrap_or_default();
			let description_line_count = block.len();

			let hint = group_schema
				.map(|schema| override_hint(schema, hint_marker))
				.unwrap_or_default();
			block.push(format!("[{group_key}:vars]{hint}"));

			let mut vars: IndexMap<String, Value> = IndexMap::new();

			if let Some(schema) = group_schema {
				for child in &schema.children {
					if child.key.is_empty() {
						continue;
					}
					if let Some(value) = child.resolved_value() {
						vars.insert(child.key.clone(), value);
					}
				}

				if let Some(Value::Object(own)) = schema.resolved_value() {
					for (key, value) in own {
						vars.insert(key, value);
					}
				}
			}

			if let Some(Value::Object(parent)) = group_vars_value.get(group_key) {
				for (key, value) in parent {
					vars.insert(key.clone(), value.clone());
				}
			}

			for (key, value) in &vars {
				block.push(format!("{key}={}", smart_quote(&value_to_string(value))));
			}

			push_section(lines, block, group_schema, description_line_count);
		}
	}
}

/// Enabled root nodes for one section kind. A root that is not required
/// (and carries no conditions) is dropped from INI output entirely; the
/// per-group commenting happens one level below.
fn section_roots<'a>(
	nodes: &'a [SchemaNode],
	section_key: &'a str,
) -> impl Iterator<Item = &'a SchemaNode> {
	nodes.iter().filter(move |node| {
		node.key == section_key
			&& node.is_enabled()
			&& (node.required || node.has_blocking_conditions())
	})
}

fn push_section(
	lines: &mut Vec<String>,
	block: Vec<String>,
	schema: Option<&SchemaNode>,
	description_line_count: usize,
) {
	let (required, has_conditions) = schema
		.map(|s| (s.required, s.has_blocking_conditions()))
		.unwrap_or((true, false));

	lines.extend(apply_disabled_commenting(
		block,
		required,
		has_conditions,
		description_line_count,
	));
	lines.push(String::new());
}

/// Host lines for one `[group]` block: plain strings pass through the
/// quoter; dicts become `<hostname> key=value ...` rows. With no hosts
/// but declared child schemas, a placeholder example row is generated
/// from the child defaults and regex placeholders.
fn render_hosts(hosts: &[Value], item_schemas: &[SchemaNode]) -> Vec<String> {
	let synthetic_row;
	let hosts = if hosts.is_empty() && !item_schemas.is_empty() {
		let mut example = Map::new();

		for schema in item_schemas {
			let placeholder = match (&schema.default_value, &schema.regex) {
				(None, Some(regex)) if !regex.is_empty() => Value::String(format!("\"{regex}\"")),
				(Some(default), _) => default.clone(),
				_ => Value::String(String::new()),
			};
			example.insert(schema.key.clone(), placeholder);
		}

		synthetic_row = vec![Value::Object(example)];
		synthetic_row.as_slice()
	} else {
		hosts
	};

	let mut host_lines = Vec::new();

	for host in hosts {
		match host {
			Value::String(name) => host_lines.push(smart_quote(name)),
			Value::Object(fields) => {
				let hostname = fields
					.get("hostname")
					.map(value_to_string)
					.filter(|name| !name.is_empty());
				let Some(primary) = hostname.or_else(|| fields.keys().next().cloned()) else {
					continue;
				};
				if primary.is_empty() {
					continue;
				}

				let has_hostname = fields.contains_key("hostname");
				let mut parts = vec![smart_quote(&primary)];

				for (key, value) in fields {
					if key == "hostname" || (!has_hostname && *key == primary) {
						continue;
					}
					parts.push(format!(
						"{}={}",
						smart_quote(key),
						smart_quote(&value_to_string(value))
					));
				}

				host_lines.push(parts.join(" "));
			}
			_ => {}
		}
	}

	host_lines
}

fn resolved_map(node: &SchemaNode) -> Map<String, Value> {
	match node.resolved_value() {
		Some(Value::Object(map)) => map,
		_ => Map::new(),
	}
}

/// The section key order: schema children first, then any extra keys only
/// present in the resolved value map, appended at the end.
fn ordered_keys<'a>(
	node: &'a SchemaNode,
	value_map: &Map<String, Value>,
) -> (IndexMap<&'a str, &'a SchemaNode>, Vec<String>) {
	let mut schema_map: IndexMap<&str, &SchemaNode> = IndexMap::new();
	for child in &node.children {
		schema_map.insert(child.key.as_str(), child);
	}

	let mut ordered: Vec<String> = schema_map.keys().map(|key| (*key).to_string()).collect();
	for key in value_map.keys() {
		if !ordered.iter().any(|existing| existing == key) {
			ordered.push(key.clone());
		}
	}

	(schema_map, ordered)
}

fn has_content(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::String(s) => !s.is_empty(),
		Value::Array(items) => !items.is_empty(),
		Value::Object(map) => !map.is_empty(),
		Value::Number(_) => true,
	}
}
