use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use walkdir::WalkDir;

use crate::ScenarioConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
	/// A schema document to merge and render.
	Json,
	/// A template copied verbatim after content substitution.
	Raw,
}

/// One template file contributing to an output destination.
#[derive(Clone, Debug)]
pub struct SourceFile {
	pub path: PathBuf,
	pub kind: SourceKind,
	pub scenario: String,
}

/// Destination relative path (possibly still holding `{VAR}` placeholders)
/// mapped to its contributing sources, in scenario application order.
pub type FileMap = IndexMap<String, Vec<SourceFile>>;

/// Walk the active scenarios' template trees and group files by the output
/// path they target.
///
/// Several layers targeting the same file (`base/app.yml.json` +
/// `prod/app.yml.json` -> `app.yml`) end up in one entry, ordered
/// base-first so they can be merged sequentially. The walk is sorted, so
/// identical trees always produce an identically ordered map. Dot-files
/// are skipped.
pub fn collect_scenario_files(active_scenarios: &[ScenarioConfig]) -> FileMap {
	let mut file_map = FileMap::new();

	for scenario in active_scenarios {
		if scenario.path.is_empty() {
			continue;
		}

		let root = Path::new(&scenario.path);
		if !root.exists() {
			continue;
		}

		let entries = WalkDir::new(root)
			.sort_by_file_name()
			.into_iter()
			.filter_map(Result::ok);

		for entry in entries {
			if !entry.file_type().is_file() {
				continue;
			}

			if entry.file_name().to_string_lossy().starts_with('.') {
				continue;
			}

			let relative = entry
				.path()
				.strip_prefix(root)
				.expect("walked paths start with their root")
				.to_string_lossy()
				.into_owned();

			let (destination, kind) = destination_for(&relative);

			file_map.entry(destination).or_default().push(SourceFile {
				path: entry.into_path(),
				kind,
				scenario: scenario.value.clone(),
			});
		}
	}

	file_map
}

/// Map a scenario-relative source path to its output path: JSON schema
/// suffixes are stripped (`app.yml.json` -> `app.yml`, `hosts.ini.json` ->
/// `hosts.ini`), anything else is copied as-is.
fn destination_for(relative: &str) -> (String, SourceKind) {
	if relative.ends_with(".ini.json") || relative.ends_with(".yml.json") {
		let stripped = relative
			.strip_suffix(".json")
			.expect("checked suffix above")
			.to_string();
		(stripped, SourceKind::Json)
	} else {
		(relative.to_string(), SourceKind::Raw)
	}
}
