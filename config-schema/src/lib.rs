#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]

mod merge;
mod node;
mod subst;
mod validate;

pub use merge::merge_nodes;
pub use node::{NodeType, OverrideStrategy, SchemaNode};
pub use subst::{resolve_content_vars, resolve_path_vars, substitute_env_in_default_values};
pub use validate::validate_schema;

/// A detached snapshot of environment variables.
///
/// Substitution and trigger evaluation work on a plain map rather than on
/// `std::env` directly, so tests can supply their own environments.
pub type EnvMap = indexmap::IndexMap<String, String>;
