use std::path::Path;

use config_schema::{
	EnvMap, SchemaNode, merge_nodes, resolve_content_vars, resolve_path_vars,
	substitute_env_in_default_values,
};
use tracing::{error, info, warn};

use crate::{
	GenError,
	collector::{FileMap, SourceFile, SourceKind},
	fs,
	render::{RenderOptions, generate_ini_from_schema, generate_yaml_from_schema},
};

/// Resolve overrides and render every collected destination under
/// `output_root`.
///
/// A destination where a lower-precedence scenario supplies a raw file and
/// a higher-precedence one supplies a schema cannot be merged; it is
/// reported and skipped, the remaining destinations still generate, and
/// the run as a whole fails afterwards.
pub fn generate_output_files(
	file_map: &FileMap,
	env: &EnvMap,
	options: &RenderOptions,
	output_root: &Path,
) -> Result<(), GenError> {
	let mut conflicts = 0usize;

	for (destination_template, sources) in file_map {
		let relative_path = resolve_path_vars(destination_template, env);
		let output_path = output_root.join(&relative_path);

		let last_raw = sources
			.iter()
			.rposition(|source| source.kind == SourceKind::Raw);

		match last_raw {
			Some(index) if index < sources.len() - 1 => {
				error!(
					"Conflict for {relative_path}: scenario '{}' provides a raw file, but higher priority scenario '{}' provides a JSON schema. Cannot merge a schema onto a raw file.",
					sources[index].scenario,
					sources[sources.len() - 1].scenario,
				);
				conflicts += 1;
			}
			Some(_) => copy_raw_file(&sources[sources.len() - 1], &relative_path, &output_path, env)?,
			None => render_schema_file(sources, &relative_path, &output_path, env, options)?,
		}
	}

	if conflicts > 0 {
		Err(GenError::GenerationConflicts(conflicts))
	} else {
		Ok(())
	}
}

fn copy_raw_file(
	source: &SourceFile,
	relative_path: &str,
	output_path: &Path,
	env: &EnvMap,
) -> Result<(), GenError> {
	info!(
		"Generating {relative_path} from scenario (copy/template) - source: {}",
		source.scenario
	);

	let content = fs::read_text(&source.path)?;
	let content = resolve_content_vars(&content, env);

	fs::save_new_file(output_path, &content)?;

	Ok(())
}

fn render_schema_file(
	sources: &[SourceFile],
	relative_path: &str,
	output_path: &Path,
	env: &EnvMap,
	options: &RenderOptions,
) -> Result<(), GenError> {
	let is_ini = sources
		.iter()
		.any(|source| source.path.to_string_lossy().ends_with(".ini.json"))
		|| relative_path.ends_with(".ini");

	info!(
		"Generating {relative_path} from {} schema",
		if is_ini { "INI" } else { "YAML" }
	);

	let mut merged: Vec<SchemaNode> = Vec::new();

	for source in sources {
		match fs::load_schema_nodes(&source.path) {
			Ok(nodes) => merged = merge_nodes(merged, nodes),
			// One broken overlay file should not take the whole
			// destination down with it.
			Err(e) => warn!("Skipping schema source {}: {e}", source.path.display()),
		}
	}

	substitute_env_in_default_values(&mut merged, env);

	let lines = if is_ini {
		generate_ini_from_schema(&merged, options)
	} else {
		generate_yaml_from_schema(&merged, options)?
	};

	let content = format!("{}\n", lines.join("\n").trim());

	fs::save_new_file(output_path, &content)?;

	Ok(())
}
