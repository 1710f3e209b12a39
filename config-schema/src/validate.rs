use serde_json::Value;

use crate::NodeType;

const INI_ROOT_KEYS: [&str; 4] = ["aggregations", "groups", "group_vars", "global_vars"];

/// Validate a schema document against the structural rules.
///
/// Works on the raw JSON value rather than on parsed [`SchemaNode`]s so
/// that shape errors and legacy fields can be reported instead of
/// aborting the parse. Returns every violation as a human-readable
/// message; an empty list means the document is well-formed. Validation
/// performs no I/O and is idempotent.
///
/// Files named `*.ini.json` are additionally checked against the INI
/// section rules, keyed by node depth.
///
/// [`SchemaNode`]: crate::SchemaNode
pub fn validate_schema(data: &Value, file_path: &str) -> Vec<String> {
	let is_ini = file_path.ends_with(".ini.json");
	let mut errors = Vec::new();

	match data {
		Value::Array(items) => {
			for item in items {
				let node_path = display_key(item);
				validate_node(item, file_path, &node_path, is_ini, &mut errors);
			}
		}
		other => {
			let node_path = display_key(other);
			validate_node(other, file_path, &node_path, is_ini, &mut errors);
		}
	}

	errors
}

fn display_key(node: &Value) -> String {
	match node.get("key").and_then(Value::as_str) {
		Some(key) if !key.is_empty() => key.to_string(),
		_ => "UNKNOWN".to_string(),
	}
}

fn string_list<'a>(node: &'a Value, field: &str) -> Vec<&'a str> {
	node
		.get(field)
		.and_then(Value::as_array)
		.map(|items| items.iter().filter_map(Value::as_str).collect())
		.unwrap_or_default()
}

fn contains_type(types: &[&str], kind: NodeType) -> bool {
	types.contains(&kind.as_str())
}

fn validate_node(
	node: &Value,
	file_path: &str,
	node_path: &str,
	is_ini: bool,
	errors: &mut Vec<String>,
) {
	let Some(fields) = node.as_object() else {
		errors.push(format!(
			"[{file_path}] Error: Node '{node_path}' is not an object."
		));
		return;
	};

	let key = fields.get("key").and_then(Value::as_str).unwrap_or("");

	if key.is_empty() {
		errors.push(format!(
			"[{file_path}] Error: Node '{node_path}' missing 'key' attribute."
		));
	}

	if fields.contains_key("type") {
		errors.push(format!(
			"[{file_path}] Error: Node '{node_path}': legacy 'type' field found, use 'multi_type'."
		));
	}

	if fields.contains_key("item_type") {
		errors.push(format!(
			"[{file_path}] Error: Node '{node_path}': legacy 'item_type' field found, use 'item_multi_type'."
		));
	}

	match fields.get("multi_type") {
		Some(Value::Array(items)) if !items.is_empty() => {}
		Some(Value::Array(_)) | None => errors.push(format!(
			"[{file_path}] Error: Node '{node_path}' missing 'multi_type' attribute."
		)),
		Some(_) => errors.push(format!(
			"[{file_path}] Error: Node '{node_path}': 'multi_type' must be a list."
		)),
	}

	if fields
		.get("item_multi_type")
		.is_some_and(|v| !v.is_array())
	{
		errors.push(format!(
			"[{file_path}] Error: Node '{node_path}': 'item_multi_type' must be a list."
		));
	}

	let multi_type = string_list(node, "multi_type");
	let item_multi_type = string_list(node, "item_multi_type");
	let children = node
		.get("children")
		.and_then(Value::as_array)
		.map(Vec::as_slice)
		.unwrap_or_default();

	let is_object = contains_type(&multi_type, NodeType::Object);
	let is_list = contains_type(&multi_type, NodeType::List);

	if is_object && is_list {
		errors.push(format!(
			"[{file_path}] Error: Node '{key}' 'multi_type' cannot contain both 'object' and 'list'."
		));
	}

	if is_list && item_multi_type.is_empty() {
		errors.push(format!(
			"[{file_path}] Error: Node '{key}' 'multi_type' contains 'list' but 'item_multi_type' is empty."
		));
	}

	if is_object && !item_multi_type.is_empty() {
		errors.push(format!(
			"[{file_path}] Error: Node '{key}' 'multi_type' contains 'object' but 'item_multi_type' is not empty."
		));
	}

	if is_list && !children.is_empty() && !contains_type(&item_multi_type, NodeType::Object) {
		errors.push(format!(
			"[{file_path}] Error: Node '{key}' has 'children' but 'item_multi_type' does not contain 'object'."
		));
	}

	if is_ini {
		validate_ini_node(
			file_path,
			node_path,
			key,
			&multi_type,
			&item_multi_type,
			children,
			errors,
		);
	}

	for child in children {
		let child_key = child.get("key").and_then(Value::as_str).unwrap_or("");
		let child_path = format!("{node_path}.{child_key}");
		validate_node(child, file_path, &child_path, is_ini, errors);
	}
}

/// INI-specific rules, keyed by depth in the section tree: root keys name
/// the section kind, children name groups, grandchildren carry the values.
fn validate_ini_node(
	file_path: &str,
	node_path: &str,
	key: &str,
	multi_type: &[&str],
	item_multi_type: &[&str],
	children: &[Value],
	errors: &mut Vec<String>,
) {
	let parts: Vec<&str> = node_path.split('.').collect();

	match parts.as_slice() {
		[_root] => {
			if !INI_ROOT_KEYS.contains(&key) {
				errors.push(format!(
					"{file_path} [{node_path}]: invalid INI root key '{key}'. Must be one of {INI_ROOT_KEYS:?}."
				));
			} else if !contains_type(multi_type, NodeType::Object) {
				errors.push(format!(
					"{file_path} [{node_path}]: INI root node '{key}' must have 'multi_type' containing 'object'."
				));
			}
		}
		[section @ ("groups" | "aggregations"), _group] => {
			if !contains_type(multi_type, NodeType::List) {
				errors.push(format!(
					"{file_path} [{node_path}]: node under INI '{section}' must have 'multi_type' containing 'list'."
				));
			}
			if !contains_type(item_multi_type, NodeType::Object) {
				errors.push(format!(
					"{file_path} [{node_path}]: node under INI '{section}' must have 'item_multi_type' containing 'object'."
				));
			}

			if *section == "groups" && !children.is_empty() {
				let has_hostname = children
					.iter()
					.any(|c| c.get("key").and_then(Value::as_str) == Some("hostname"));
				if !has_hostname {
					errors.push(format!(
						"{file_path} [{node_path}]: node under INI 'groups' must contain a 'hostname' child key."
					));
				}
			}
		}
		["group_vars", _group] => {
			if !contains_type(multi_type, NodeType::Object) {
				errors.push(format!(
					"{file_path} [{node_path}]: node under INI 'group_vars' must have 'multi_type' containing 'object'."
				));
			}
		}
		["aggregations", _group, _entry] => {
			if !contains_type(multi_type, NodeType::Object) {
				errors.push(format!(
					"{file_path} [{node_path}]: child node under INI 'aggregations' list must have 'multi_type' containing 'object'."
				));
			}
		}
		_ => {}
	}
}
