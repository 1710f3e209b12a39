use std::{
	env::current_dir,
	fs::{File, create_dir_all, read_to_string},
	io::{self, Write},
	path::{Path, PathBuf},
};

use config_schema::SchemaNode;
use serde_json::Value;
use tracing::warn;

use crate::GenError;

pub fn read_text(path: &Path) -> Result<String, GenError> {
	read_to_string(path).map_err(|e| GenError::ReadError {
		path: path.to_path_buf(),
		source: e,
	})
}

pub fn load_json(path: &Path) -> Result<Value, GenError> {
	let contents = read_text(path)?;

	serde_json::from_str(&contents).map_err(|e| GenError::DeserializationError {
		file: path.to_path_buf(),
		error: e.to_string(),
	})
}

/// Load a schema document: a single node object or an ordered list of them.
pub fn load_schema_nodes(path: &Path) -> Result<Vec<SchemaNode>, GenError> {
	let data = load_json(path)?;

	SchemaNode::list_from_value(data).map_err(|e| GenError::DeserializationError {
		file: path.to_path_buf(),
		error: e.to_string(),
	})
}

/// Write generated content to a new file, creating parent directories on
/// demand.
///
/// Generation is a scaffolding operation: if the target already exists it
/// may carry manual edits, so the write is skipped with a warning instead
/// of overwriting. Returns whether the file was actually written.
pub fn save_new_file(path: &Path, content: &str) -> Result<bool, GenError> {
	if path.exists() {
		warn!("File {} already exists. Skipping.", path.display());
		return Ok(false);
	}

	create_parent_dirs(path)?;

	let mut file = match File::create_new(path) {
		Ok(file) => file,
		// Racing another writer is benign for a single-operator tool.
		Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
			warn!("File {} already exists. Skipping.", path.display());
			return Ok(false);
		}
		Err(e) => {
			return Err(GenError::WriteError {
				path: path.to_path_buf(),
				source: e,
			});
		}
	};

	file
		.write_all(content.as_bytes())
		.map_err(|e| GenError::WriteError {
			path: path.to_path_buf(),
			source: e,
		})?;

	Ok(true)
}

pub(crate) fn create_parent_dirs(path: &Path) -> Result<(), GenError> {
	let Some(parent) = path.parent() else {
		return Ok(());
	};

	if parent.as_os_str().is_empty() {
		return Ok(());
	}

	create_dir_all(parent).map_err(|e| GenError::DirCreation {
		path: parent.to_path_buf(),
		source: e,
	})
}

pub(crate) fn get_cwd() -> PathBuf {
	current_dir().expect("Could not get the cwd")
}
