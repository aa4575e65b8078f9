#![doc = "docsforai-core: core logic library for docsforai."]

//! This crate contains all detection, parsing, normalization and consolidation
//! logic for docsforai. The CLI crate only loads configuration and wires the
//! seams ([`tool::ToolRunner`], [`convert::HtmlConverter`],
//! [`acquire::RepositoryProvider`]) to their system implementations.
//!
//! # Usage
//! [`parse_documentation`] turns a docs directory into validated
//! [`DocumentRecord`]s; [`pipeline::build_documentation`] runs the whole
//! acquire → parse → consolidate flow for a [`config::BuildConfig`].

pub mod acquire;
pub mod adapters;
pub mod config;
pub mod consolidate;
pub mod convert;
pub mod dependencies;
pub mod detect;
pub mod error;
pub mod framework;
pub mod options;
pub mod parse;
pub mod pipeline;
pub mod prebuilt;
pub mod record;
pub mod registry;
pub mod tool;
pub mod validate;
pub mod yaml;

pub use error::DocsError;
pub use framework::{Framework, FrameworkChoice};
pub use parse::parse_documentation;
pub use record::{DocumentRecord, ParseOutcome, SkippedFile};
