use indexmap::IndexMap;
use serde_json::Value;

use crate::{OverrideStrategy, SchemaNode};

/// Deep-merge an ordered list of override nodes onto a base list.
///
/// Overrides whose `key` matches a base sibling mutate that sibling in
/// place; the rest are appended at the end in the order they appear.
/// Base sibling order is always preserved. Overlays must be applied in
/// scenario application order: the merge is order-sensitive, and only
/// associative while no `replace` strategy intervenes.
pub fn merge_nodes(base: Vec<SchemaNode>, overrides: Vec<SchemaNode>) -> Vec<SchemaNode> {
	let mut merged = base;
	let mut by_key: IndexMap<String, usize> = merged
		.iter()
		.enumerate()
		.filter(|(_, node)| !node.key.is_empty())
		.map(|(position, node)| (node.key.clone(), position))
		.collect();

	for override_node in overrides {
		if override_node.key.is_empty() {
			continue;
		}

		if let Some(&position) = by_key.get(&override_node.key) {
			merge_single_node(&mut merged[position], override_node);
		} else {
			by_key.insert(override_node.key.clone(), merged.len());
			merged.push(override_node);
		}
	}

	merged
}

/// Merge the attributes of an override node into a matching base node.
///
/// Scalar attributes replace the base when the override actually carries
/// them; `required`, `is_override` and `regex_enable` replace
/// unconditionally. The children composition is governed by the
/// override's `override_strategy`, and only by it: `replace` swaps the
/// child list wholesale, `merge` recurses. The base node is marked with
/// `override_hint` so the renderers can annotate the overridden key.
fn merge_single_node(base: &mut SchemaNode, override_node: SchemaNode) {
	let SchemaNode {
		key: _,
		multi_type,
		item_multi_type,
		description,
		default_value,
		required,
		override_strategy,
		override_hint: _,
		is_override,
		regex_enable,
		regex,
		condition,
		children,
	} = override_node;

	if !multi_type.is_empty() {
		base.multi_type = multi_type;
	}

	if !item_multi_type.is_empty() {
		base.item_multi_type = item_multi_type;
	}

	if !description.is_empty() {
		base.description = description;
	}

	if default_value.is_some() {
		base.default_value = default_value;
	}

	base.required = required;
	base.override_strategy = override_strategy;
	base.is_override = is_override;
	base.regex_enable = regex_enable;

	if regex.as_deref().is_some_and(|r| !r.is_empty()) {
		base.regex = regex;
	}

	if condition.as_ref().is_some_and(has_content) {
		base.condition = condition;
	}

	match override_strategy {
		OverrideStrategy::Replace => base.children = children,
		OverrideStrategy::Merge => {
			let existing = std::mem::take(&mut base.children);
			base.children = merge_nodes(existing, children);
		}
	}

	base.override_hint = true;
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
