#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]

pub mod cli;
pub mod collector;
pub mod config;
pub mod errors;
pub mod generate;
pub mod render;
pub mod scenarios;

pub(crate) mod fs;

#[doc(inline)]
pub use config::*;
#[doc(inline)]
pub use errors::*;
