use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{error, info, warn};

use crate::{
	AppConfig, GenError,
	collector::collect_scenario_files,
	fs,
	generate::generate_output_files,
	render::RenderOptions,
	scenarios::{
		determine_active_scenarios, load_env, validate_required_env_vars,
		validate_scenario_templates,
	},
};

#[derive(Parser)]
#[command(name = "scengen")]
#[command(version, about, long_about = None)]
pub struct Cli {
	/// Path to the orchestrator config file.
	#[arg(value_name = "CONFIG", default_value = "template/scenario/config.json")]
	pub config: PathBuf,

	/// Validate every scenario template referenced by the config and exit
	/// without generating anything.
	#[arg(long)]
	pub check: bool,
}

pub fn main_entrypoint() -> Result<(), GenError> {
	let cli = Cli::parse();

	run(&cli.config, cli.check)
}

/// The full pipeline: load config, resolve active scenarios, validate
/// their templates and environment, then collect and generate every
/// output file.
pub fn run(config_path: &Path, check_only: bool) -> Result<(), GenError> {
	let app_config = AppConfig::from_file(config_path)?;
	let env = load_env();

	app_config.validate_scenarios()?;

	if check_only {
		info!(
			"Validating all scenario templates in `{}`...",
			config_path.display()
		);

		fail_on_template_errors(validate_scenario_templates(&app_config.scenarios))?;

		info!("All templates in the config are valid.");
		return Ok(());
	}

	let active_scenarios = determine_active_scenarios(&app_config, &env);

	if active_scenarios.is_empty() {
		warn!("No active scenarios found.");
	} else {
		info!("Active scenarios (in order of application):");
		for scenario in &active_scenarios {
			info!(" - {} (priority: {})", scenario.value, scenario.priority);
		}
	}

	validate_required_env_vars(&app_config, &active_scenarios, &env)?;
	fail_on_template_errors(validate_scenario_templates(&active_scenarios))?;

	let file_map = collect_scenario_files(&active_scenarios);
	let options = RenderOptions::from_config(&app_config);

	generate_output_files(&file_map, &env, &options, &fs::get_cwd())
}

fn fail_on_template_errors(errors: Vec<String>) -> Result<(), GenError> {
	if errors.is_empty() {
		return Ok(());
	}

	error!("Template validation failed:");
	for message in &errors {
		error!(" - {message}");
	}

	Err(GenError::SchemaValidation(errors))
}

#[test]
fn verify_cli() {
	use clap::CommandFactory;
	Cli::command().debug_assert();
}
