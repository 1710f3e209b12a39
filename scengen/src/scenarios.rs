use std::path::Path;

use config_schema::{EnvMap, validate_schema};
use indexmap::IndexSet;
use regex::Regex;
use tracing::warn;
use walkdir::WalkDir;

use crate::{AppConfig, GenError, ScenarioConfig, ScenarioTrigger, TriggerLogic, TriggerSource, fs};

/// Priority assigned to `default`-triggered scenarios: applied first,
/// lowest precedence, so every other layer overrides the base.
pub const DEFAULT_SCENARIO_PRIORITY: i64 = 9999;

/// A detached snapshot of the process environment, so substitution and
/// trigger evaluation never touch `std::env` mid-run.
pub fn load_env() -> EnvMap {
	std::env::vars().collect()
}

/// Evaluate every scenario trigger against the environment and return the
/// active scenarios in application order.
///
/// Ordering is by `priority` descending (stable), which is the single
/// source of precedence truth: the base (9999) applies first, and the
/// smallest number applies last, overwriting everything before it.
pub fn determine_active_scenarios(config: &AppConfig, env: &EnvMap) -> Vec<ScenarioConfig> {
	let user_selection = env.get(&config.scenario_env_key);
	let mut active = Vec::new();

	for scenario in &config.scenarios {
		let is_active = match scenario.trigger.source {
			TriggerSource::Default => true,
			TriggerSource::User => user_selection.is_some_and(|selected| *selected == scenario.value),
			TriggerSource::Env => evaluate_env_trigger(&scenario.trigger, env),
		};

		if is_active {
			let mut scenario = scenario.clone();

			if scenario.trigger.source == TriggerSource::Default {
				scenario.priority = DEFAULT_SCENARIO_PRIORITY;
			}

			active.push(scenario);
		}
	}

	active.sort_by_key(|scenario| std::cmp::Reverse(scenario.priority));
	active
}

fn evaluate_env_trigger(trigger: &ScenarioTrigger, env: &EnvMap) -> bool {
	if trigger.conditions.is_empty() {
		return false;
	}

	let mut matches = trigger.conditions.iter().map(|condition| {
		let value = env.get(&condition.key).map(String::as_str).unwrap_or("");

		match Regex::new(&condition.regex) {
			Ok(pattern) => pattern.is_match(value),
			Err(e) => {
				warn!("Invalid trigger regex `{}`: {e}", condition.regex);
				false
			}
		}
	});

	match trigger.logic {
		TriggerLogic::And => matches.all(|matched| matched),
		TriggerLogic::Or => matches.any(|matched| matched),
	}
}

/// Assert that every env var declared as required is actually present.
///
/// Path resolution and default substitution depend entirely on the
/// environment, so failing up front beats silently generating corrupt
/// files that break services later.
pub fn validate_required_env_vars(
	config: &AppConfig,
	active_scenarios: &[ScenarioConfig],
	env: &EnvMap,
) -> Result<(), GenError> {
	let declared = config
		.default_env_vars
		.iter()
		.chain(active_scenarios.iter().flat_map(|sc| sc.required_env_vars.iter()));

	let mut missing: IndexSet<String> = IndexSet::new();

	for var in declared {
		if !var.key.is_empty() && !env.contains_key(&var.key) {
			missing.insert(var.key.clone());
		}
	}

	if missing.is_empty() {
		Ok(())
	} else {
		Err(GenError::MissingEnvVars(missing.into_iter().collect()))
	}
}

/// Validate every schema document under the given scenarios' template
/// trees, returning the collected error messages.
///
/// `config.json` is the orchestrator's own file and is skipped; any other
/// `*.json` that fails to parse is itself a validation error.
pub fn validate_scenario_templates(scenarios: &[ScenarioConfig]) -> Vec<String> {
	let mut template_dirs: IndexSet<&str> = IndexSet::new();

	for scenario in scenarios {
		if !scenario.path.is_empty() && Path::new(&scenario.path).exists() {
			template_dirs.insert(scenario.path.as_str());
		}
	}

	let mut errors = Vec::new();

	for dir in template_dirs {
		for entry in WalkDir::new(dir).sort_by_file_name() {
			let entry = match entry {
				Ok(entry) => entry,
				Err(e) => {
					errors.push(format!("{dir}: {e}"));
					continue;
				}
			};

			if !entry.file_type().is_file() {
				continue;
			}

			let file_name = entry.file_name().to_string_lossy();
			if !file_name.ends_with(".json") || file_name == "config.json" {
				continue;
			}

			let path = entry.path();
			match fs::load_json(path) {
				Ok(data) => errors.extend(validate_schema(&data, &path.to_string_lossy())),
				Err(e) => errors.push(format!("{}: Invalid JSON - {e}", path.display())),
			}
		}
	}

	errors
}
