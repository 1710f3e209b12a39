use std::{io, path::PathBuf};

use thiserror::Error;

/// The kinds of errors that can occur during a generation run.
#[derive(Debug, Error)]
pub enum GenError {
	// I/O errors
	#[error("Could not create the dir `{path}`: {source}")]
	DirCreation { path: PathBuf, source: io::Error },

	#[error("Failed to create or write to the file `{path}`: {source}")]
	WriteError { path: PathBuf, source: io::Error },

	#[error("Could not read the contents of `{path}`: {source}")]
	ReadError { path: PathBuf, source: io::Error },

	// Serde errors
	#[error("Error while deserializing the contents of `{file}`: {error}")]
	DeserializationError { file: PathBuf, error: String },

	// Invalid values
	#[error("Invalid orchestrator config: {0}")]
	InvalidConfig(String),

	#[error("Missing required environment variables: {}", .0.join(", "))]
	MissingEnvVars(Vec<String>),

	#[error("Template validation failed with {} error(s)", .0.len())]
	SchemaValidation(Vec<String>),

	#[error("Conflict: node '{key}' cannot be both 'object' and 'list'.")]
	NodeTypeConflict { key: String },

	#[error("Generation finished with {0} raw/schema conflict(s)")]
	GenerationConflicts(usize),

	#[error("{0}")]
	Custom(String),

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}
