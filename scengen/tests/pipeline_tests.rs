use std::{
	fs,
	path::{Path, PathBuf},
};

use config_schema::EnvMap;
use pretty_assertions::assert_eq;
use scengen::{
	AppConfig, GenError,
	collector::collect_scenario_files,
	generate::generate_output_files,
	render::RenderOptions,
	scenarios::determine_active_scenarios,
};
use serde_json::json;
use tempfile::TempDir;

fn write_file(root: &Path, relative: &str, content: &str) {
	let path = root.join(relative);
	fs::create_dir_all(path.parent().expect("files live in directories"))
		.expect("fixture dirs are creatable");
	fs::write(path, content).expect("fixture files are writable");
}

fn env_map(pairs: &[(&str, &str)]) -> EnvMap {
	pairs
		.iter()
		.map(|(k, v)| (k.to_string(), v.to_string()))
		.collect()
}

/// A three-layer setup: `base` is always on, `p5` and `p1` trigger off
/// `TEST_TRIGGER`.
fn layered_config(root: &Path) -> AppConfig {
	let template = |name: &str| root.join("template").join(name).to_string_lossy().into_owned();

	serde_json::from_value(json!({
		"senarios": [
			{ "value": "base", "path": template("base"), "trigger": { "source": "default" } },
			{
				"value": "p5",
				"path": template("p5"),
				"priority": 5,
				"trigger": {
					"source": "env",
					"conditions": [{ "key": "TEST_TRIGGER", "regex": "active" }]
				}
			},
			{
				"value": "p1",
				"path": template("p1"),
				"priority": 1,
				"trigger": {
					"source": "env",
					"conditions": [{ "key": "TEST_TRIGGER", "regex": "active" }]
				}
			}
		]
	}))
	.expect("test config parses")
}

fn generate(config: &AppConfig, env: &EnvMap, output_root: &Path) -> Result<(), GenError> {
	let active = determine_active_scenarios(config, env);
	let file_map = collect_scenario_files(&active);

	generate_output_files(&file_map, env, &RenderOptions::from_config(config), output_root)
}

#[test]
fn overlays_apply_in_priority_order() {
	let tmp = TempDir::new().expect("tempdir");
	let root = tmp.path();

	write_file(
		root,
		"template/base/conf/app.yml.json",
		&json!([
			{ "key": "shared_key", "multi_type": ["string"], "default_value": "from_base" },
			{ "key": "base_only", "multi_type": ["string"], "default_value": "kept" }
		])
		.to_string(),
	);
	write_file(
		root,
		"template/p5/conf/app.yml.json",
		&json!([{ "key": "shared_key", "multi_type": ["string"], "default_value": "from_p5" }])
			.to_string(),
	);
	write_file(
		root,
		"template/p1/conf/app.yml.json",
		&json!([{ "key": "shared_key", "multi_type": ["string"], "default_value": "from_p1" }])
			.to_string(),
	);

	let config = layered_config(root);
	let env = env_map(&[("TEST_TRIGGER", "active")]);

	let active = determine_active_scenarios(&config, &env);
	let priorities: Vec<i64> = active.iter().map(|sc| sc.priority).collect();
	assert_eq!(priorities, [9999, 5, 1]);

	let output_root = root.join("out");
	generate(&config, &env, &output_root).expect("generation succeeds");

	let rendered = fs::read_to_string(output_root.join("conf/app.yml")).expect("output exists");

	assert_eq!(
		rendered,
		"shared_key: from_p1 # <=== [Override]\n\n\nbase_only: kept\n"
	);
}

#[test]
fn raw_templates_copy_with_content_substitution() {
	let tmp = TempDir::new().expect("tempdir");
	let root = tmp.path();

	write_file(root, "template/base/motd.txt", "Welcome ${GREET_USER}!\n");

	let config = layered_config(root);
	let env = env_map(&[("GREET_USER", "ops")]);
	let output_root = root.join("out");

	generate(&config, &env, &output_root).expect("generation succeeds");

	let copied = fs::read_to_string(output_root.join("motd.txt")).expect("output exists");
	assert_eq!(copied, "Welcome ops!\n");
}

#[test]
fn a_last_raw_layer_shadows_earlier_schemas() {
	let tmp = TempDir::new().expect("tempdir");
	let root = tmp.path();

	write_file(
		root,
		"template/base/settings.yml.json",
		&json!([{ "key": "from_schema", "multi_type": ["string"], "default_value": "x" }])
			.to_string(),
	);
	write_file(root, "template/p1/settings.yml", "handwritten: true\n");

	let config = layered_config(root);
	let env = env_map(&[("TEST_TRIGGER", "active")]);
	let output_root = root.join("out");

	generate(&config, &env, &output_root).expect("generation succeeds");

	let copied = fs::read_to_string(output_root.join("settings.yml")).expect("output exists");
	assert_eq!(copied, "handwritten: true\n");
}

#[test]
fn a_schema_over_an_earlier_raw_file_is_a_conflict() {
	let tmp = TempDir::new().expect("tempdir");
	let root = tmp.path();

	write_file(root, "template/base/settings.yml", "handwritten: true\n");
	write_file(
		root,
		"template/p1/settings.yml.json",
		&json!([{ "key": "from_schema", "multi_type": ["string"], "default_value": "x" }])
			.to_string(),
	);
	write_file(
		root,
		"template/base/conf/app.yml.json",
		&json!([{ "key": "untouched", "multi_type": ["string"], "default_value": "still here" }])
			.to_string(),
	);

	let config = layered_config(root);
	let env = env_map(&[("TEST_TRIGGER", "active")]);
	let output_root = root.join("out");

	let error = generate(&config, &env, &output_root).unwrap_err();
	assert!(matches!(error, GenError::GenerationConflicts(1)));

	// The conflicting destination is skipped, the rest still generates.
	assert!(!output_root.join("settings.yml").exists());
	let rendered = fs::read_to_string(output_root.join("conf/app.yml")).expect("output exists");
	assert_eq!(rendered, "untouched: still here\n");
}

#[test]
fn existing_outputs_are_never_overwritten() {
	let tmp = TempDir::new().expect("tempdir");
	let root = tmp.path();

	write_file(
		root,
		"template/base/conf/app.yml.json",
		&json!([{ "key": "fresh", "multi_type": ["string"], "default_value": "value" }])
			.to_string(),
	);

	let config = layered_config(root);
	let env = env_map(&[]);
	let output_root = root.join("out");

	write_file(&output_root, "conf/app.yml", "# manual edit\n");

	generate(&config, &env, &output_root).expect("skipping is not an error");

	let untouched = fs::read_to_string(output_root.join("conf/app.yml")).expect("output exists");
	assert_eq!(untouched, "# manual edit\n");
}

#[test]
fn destination_paths_resolve_env_placeholders() {
	let tmp = TempDir::new().expect("tempdir");
	let root = tmp.path();

	write_file(
		root,
		"template/base/by-env/{DEPLOY_ENV}.yml.json",
		&json!([{ "key": "environment", "multi_type": ["string"], "default_value": "${DEPLOY_ENV}" }])
			.to_string(),
	);

	let config = layered_config(root);
	let env = env_map(&[("DEPLOY_ENV", "prod")]);
	let output_root = root.join("out");

	generate(&config, &env, &output_root).expect("generation succeeds");

	let rendered =
		fs::read_to_string(output_root.join("by-env/prod.yml")).expect("resolved path exists");
	assert_eq!(rendered, "environment: prod\n");
}

#[test]
fn collection_order_is_deterministic() {
	let tmp = TempDir::new().expect("tempdir");
	let root = tmp.path();

	for name in ["zulu", "alpha", "mike"] {
		write_file(
			root,
			&format!("template/base/conf/{name}.yml.json"),
			&json!([{ "key": name, "multi_type": ["string"], "default_value": "x" }]).to_string(),
		);
	}
	write_file(root, "template/base/.hidden.yml.json", "[]");

	let config = layered_config(root);
	let active = determine_active_scenarios(&config, &env_map(&[]));

	let first: Vec<String> = collect_scenario_files(&active).keys().cloned().collect();
	let second: Vec<String> = collect_scenario_files(&active).keys().cloned().collect();

	assert_eq!(first, second);
	assert_eq!(
		first,
		["conf/alpha.yml", "conf/mike.yml", "conf/zulu.yml"]
	);
}

#[test]
fn sources_accumulate_in_scenario_application_order() {
	let tmp = TempDir::new().expect("tempdir");
	let root = tmp.path();

	for scenario in ["base", "p5", "p1"] {
		write_file(
			root,
			&format!("template/{scenario}/conf/app.yml.json"),
			&json!([{ "key": "k", "multi_type": ["string"], "default_value": scenario }])
				.to_string(),
		);
	}

	let config = layered_config(root);
	let active = determine_active_scenarios(&config, &env_map(&[("TEST_TRIGGER", "active")]));
	let file_map = collect_scenario_files(&active);

	let sources: Vec<PathBuf> = file_map
		.get("conf/app.yml")
		.expect("destination collected")
		.iter()
		.map(|source| source.path.clone())
		.collect();

	assert_eq!(
		sources,
		[
			root.join("template/base/conf/app.yml.json"),
			root.join("template/p5/conf/app.yml.json"),
			root.join("template/p1/conf/app.yml.json"),
		]
	);
}

#[test]
fn generated_yaml_parses_back_to_the_resolved_defaults() {
	let tmp = TempDir::new().expect("tempdir");
	let root = tmp.path();

	write_file(
		root,
		"template/base/conf/service.yml.json",
		&json!([{
			"key": "service",
			"multi_type": ["object"],
			"children": [
				{ "key": "name", "multi_type": ["string"], "default_value": "api" },
				{ "key": "replicas", "multi_type": ["number"], "default_value": 3 },
				{ "key": "debug", "multi_type": ["bool"], "default_value": false }
			]
		}])
		.to_string(),
	);

	let config = layered_config(root);
	let env = env_map(&[]);
	let output_root = root.join("out");

	generate(&config, &env, &output_root).expect("generation succeeds");

	let rendered =
		fs::read_to_string(output_root.join("conf/service.yml")).expect("output exists");
	let parsed: serde_yaml_ng::Value =
		serde_yaml_ng::from_str(&rendered).expect("generated YAML parses");
	let expected: serde_yaml_ng::Value =
		serde_yaml_ng::from_str("service:\n  name: api\n  replicas: 3\n  debug: false")
			.expect("literal parses");

	assert_eq!(parsed, expected);
}
