use std::{fmt, path::Path};

#[cfg(feature = "schemars")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{GenError, fs};

/// The orchestrator configuration driving a generation run.
///
/// The on-disk spellings `senario_env_key` and `senarios` are part of the
/// file format and preserved for compatibility with existing configs.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(default)]
pub struct AppConfig {
	/// Marker appended to rendered keys that a scenario overrode.
	pub override_hint_style: String,

	/// Name of the env var carrying the user-selected scenario value.
	#[serde(rename = "senario_env_key")]
	pub scenario_env_key: String,

	/// Blank lines between top-level YAML sections.
	pub top_level_spacing: usize,

	/// Env vars that every run requires, regardless of active scenarios.
	pub default_env_vars: Vec<EnvVarDef>,

	#[serde(rename = "senarios")]
	pub scenarios: Vec<ScenarioConfig>,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			override_hint_style: "# <=== [Override]".to_string(),
			scenario_env_key: "SCENARIO_TYPE".to_string(),
			top_level_spacing: 2,
			default_env_vars: Vec::new(),
			scenarios: Vec::new(),
		}
	}
}

impl AppConfig {
	pub fn from_file(path: &Path) -> Result<Self, GenError> {
		let raw = fs::load_json(path)?;

		serde_json::from_value(raw).map_err(|e| GenError::DeserializationError {
			file: path.to_path_buf(),
			error: e.to_string(),
		})
	}

	/// Check that every scenario trigger is logically sound: `default` and
	/// `user` triggers carry no conditions, `env` triggers carry at least
	/// one.
	pub fn validate_scenarios(&self) -> Result<(), GenError> {
		for scenario in &self.scenarios {
			let trigger = &scenario.trigger;

			match trigger.source {
				TriggerSource::Default | TriggerSource::User => {
					if !trigger.conditions.is_empty() {
						return Err(GenError::InvalidConfig(format!(
							"scenario '{}': source '{}' must not have 'conditions'",
							scenario.value, trigger.source
						)));
					}
				}
				TriggerSource::Env => {
					if trigger.conditions.is_empty() {
						return Err(GenError::InvalidConfig(format!(
							"scenario '{}': source 'env' must have 'conditions'",
							scenario.value
						)));
					}
				}
			}
		}

		Ok(())
	}
}

/// One overlay scenario: a template tree plus the trigger deciding when it
/// applies.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(default)]
pub struct ScenarioConfig {
	/// The scenario name, matched against the user selection env var.
	pub value: String,

	/// Root directory of the scenario's template tree.
	pub path: String,

	pub trigger: ScenarioTrigger,

	pub required_env_vars: Vec<EnvVarDef>,

	/// Smaller number = higher precedence: scenarios apply in descending
	/// priority order, so the smallest number lands last and wins.
	pub priority: i64,
}

impl Default for ScenarioConfig {
	fn default() -> Self {
		Self {
			value: String::new(),
			path: String::new(),
			trigger: ScenarioTrigger::default(),
			required_env_vars: Vec::new(),
			priority: 999,
		}
	}
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(default)]
pub struct ScenarioTrigger {
	pub source: TriggerSource,
	pub logic: TriggerLogic,
	pub conditions: Vec<TriggerCondition>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum TriggerSource {
	User,
	#[default]
	Default,
	Env,
}

impl fmt::Display for TriggerSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::User => f.write_str("user"),
			Self::Default => f.write_str("default"),
			Self::Env => f.write_str("env"),
		}
	}
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum TriggerLogic {
	#[default]
	And,
	Or,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(default)]
pub struct TriggerCondition {
	/// Env var to inspect; absent vars evaluate against the empty string.
	pub key: String,

	/// Regex searched (not anchored) against the env var value.
	pub regex: String,
}

/// A required environment variable, written either as a bare string or as
/// a `{key, description}` object.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(from = "EnvVarSpec")]
pub struct EnvVarDef {
	pub key: String,
	pub description: String,
}

#[derive(Deserialize)]
#[cfg_attr(feature = "schemars", derive(JsonSchema))]
#[serde(untagged)]
enum EnvVarSpec {
	Name(String),
	Full {
		#[serde(default)]
		key: String,
		#[serde(default)]
		description: String,
	},
}

impl From<EnvVarSpec> for EnvVarDef {
	fn from(spec: EnvVarSpec) -> Self {
		match spec {
			EnvVarSpec::Name(key) => Self {
				key,
				description: String::new(),
			},
			EnvVarSpec::Full { key, description } => Self { key, description },
		}
	}
}
