//! webgen core - scaffolding for gulp/bower web applications
//!
//! This library generates a front-end project from templates compiled into the
//! binary. It is used by the `webgen` CLI, which supplies a [`ProductConfig`]
//! and the command-line options.
//!
//! # Architecture
//!
//! The pipeline runs four stages in order, with no feedback between them:
//!
//! - **Option resolution** ([`options`], [`config`]) - layered raw options
//!   resolved against a fixed schema into a [`Configuration`]
//! - **Selection** ([`selector`], [`subgen`]) - every flag-dependent decision,
//!   made once, producing an [`ArtifactPlan`]
//! - **Emission** ([`emitter`], [`templates`]) - rendering and writing files
//! - **Installation and wiring** ([`install`], [`wiring`]) - `npm`/`bower`
//!   install, then injection of installed packages into markup and stylesheets
//!
//! [`pipeline`] ties the stages together and reports through a [`Reporter`].
//!
//! # Feature Flags
//!
//! - `tui` (default): cliclack-based output in the [`tui`] module
//!
//! # Example Usage
//!
//! ```ignore
//! use webgen_core::{pipeline::CreateArgs, ProductConfig};
//!
//! let summary = webgen_core::run(&MyConfig, CreateArgs::default(), "0.1.0").await?;
//! ```

pub mod config;
pub mod emitter;
pub mod error;
pub mod install;
pub mod manifest;
pub mod options;
pub mod pipeline;
pub mod plan;
pub mod product;
pub mod report;
pub mod selector;
pub mod subgen;
pub mod templates;
pub mod wiring;

#[cfg(feature = "tui")]
pub mod tui;

pub use config::Configuration;
pub use error::{Error, Result};
pub use plan::ArtifactPlan;
pub use product::ProductConfig;
pub use report::Reporter;
pub use pipeline::{generate, run, CreateArgs, GenerationSummary, WiringOutcome};
