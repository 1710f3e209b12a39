#[cfg(feature = "schemars")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The semantic types a node can declare in `multi_type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
	Object,
	List,
	String,
	Bool,
	Number,
}

impl NodeType {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Object => "object",
			Self::List => "list",
			Self::String => "string",
			Self::Bool => "bool",
			Self::Number => "number",
		}
	}
}

/// How the children of an overriding node are composed onto the base node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum OverrideStrategy {
	#[default]
	Merge,
	Replace,
}

/// One key of a generated configuration file.
///
/// Schema documents are JSON files containing either a single node object
/// or an ordered array of them. Unknown fields are ignored here; the
/// validator reports them against the raw JSON instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(default)]
pub struct SchemaNode {
	/// Identifier within the parent; unique among siblings.
	pub key: String,

	/// Semantic types of the value. `object` and `list` are mutually
	/// exclusive.
	pub multi_type: Vec<String>,

	/// For `list` nodes, the types of the list items.
	pub item_multi_type: Vec<String>,

	/// Human comment. A leading `#` escalates it to a banner block.
	pub description: String,

	/// Concrete value; structural for `object`/`list`, scalar otherwise.
	pub default_value: Option<Value>,

	/// Nodes that are not required and carry no value are dropped from
	/// the output; not-required nodes with a value render commented out.
	pub required: bool,

	pub override_strategy: OverrideStrategy,

	/// When set, the rendered key line gets an inline override marker.
	pub override_hint: bool,

	pub is_override: bool,

	pub regex_enable: bool,

	/// Textual placeholder used when `default_value` is absent.
	pub regex: Option<String>,

	/// Reserved condition block. A non-empty `conditions` array inhibits
	/// the not-required commenting pass.
	pub condition: Option<Value>,

	pub children: Vec<SchemaNode>,
}

impl Default for SchemaNode {
	fn default() -> Self {
		Self {
			key: String::new(),
			multi_type: Vec::new(),
			item_multi_type: Vec::new(),
			description: String::new(),
			default_value: None,
			required: true,
			override_strategy: OverrideStrategy::default(),
			override_hint: false,
			is_override: false,
			regex_enable: false,
			regex: None,
			condition: None,
			children: Vec::new(),
		}
	}
}

impl SchemaNode {
	pub fn has_type(&self, kind: NodeType) -> bool {
		self.multi_type.iter().any(|t| t == kind.as_str())
	}

	pub fn item_has_type(&self, kind: NodeType) -> bool {
		self.item_multi_type.iter().any(|t| t == kind.as_str())
	}

	/// The value a renderer should emit for this node: `default_value`,
	/// falling back to the `regex` placeholder when the default is absent.
	pub fn resolved_value(&self) -> Option<Value> {
		if self.default_value.is_some() {
			return self.default_value.clone();
		}

		self.regex.as_ref().map(|r| Value::String(r.clone()))
	}

	/// Whether the node survives into the output at all. A node that is
	/// not required and has neither a default nor a regex placeholder
	/// contributes nothing and is stripped.
	pub fn is_enabled(&self) -> bool {
		self.required || self.default_value.is_some() || self.regex.is_some()
	}

	/// Whether the node carries a non-empty `conditions` list inside its
	/// `condition` block.
	pub fn has_blocking_conditions(&self) -> bool {
		self
			.condition
			.as_ref()
			.and_then(|c| c.get("conditions"))
			.and_then(Value::as_array)
			.is_some_and(|conds| !conds.is_empty())
	}

	pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
		serde_json::from_value(value)
	}

	/// Parse a schema document: either a single node object or an ordered
	/// array of nodes.
	pub fn list_from_value(value: Value) -> Result<Vec<Self>, serde_json::Error> {
		if value.is_array() {
			serde_json::from_value(value)
		} else {
			Ok(vec![Self::from_value(value)?])
		}
	}

	pub fn to_value(&self) -> Value {
		serde_json::to_value(self).expect("schema nodes always serialize")
	}
}
