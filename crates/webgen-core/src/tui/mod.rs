//! Charm-style terminal output using cliclack
//!
//! This module is optional and only available when the `tui` feature is enabled.

mod reporter;

pub use reporter::TuiReporter;
