//! Resolved generator configuration
//!
//! [`Configuration`] is the typed, read-only view over [`ResolvedOptions`].
//! It is built once at startup and passed by reference to every stage.

pub mod sources;

use crate::options::{self, ResolvedOptions};

pub use sources::OptionSources;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub skip_welcome_message: bool,
    pub skip_install_message: bool,
    pub skip_install: bool,
    pub test_framework: String,
    pub babel: bool,
    pub sass: bool,
    pub twig: bool,
    pub bootstrap: bool,
    pub modernizr: bool,
    pub jquery: bool,
    /// Bootstrap v3 instead of v4
    pub legacy_bootstrap: bool,
}

impl Configuration {
    pub fn from_resolved(resolved: &ResolvedOptions) -> Self {
        Self {
            skip_welcome_message: resolved.flag(options::SKIP_WELCOME_MESSAGE),
            skip_install_message: resolved.flag(options::SKIP_INSTALL_MESSAGE),
            skip_install: resolved.flag(options::SKIP_INSTALL),
            test_framework: resolved.string(options::TEST_FRAMEWORK).to_string(),
            babel: resolved.flag(options::BABEL),
            sass: resolved.flag(options::SASS),
            twig: resolved.flag(options::TWIG),
            bootstrap: resolved.flag(options::BOOTSTRAP),
            modernizr: resolved.flag(options::MODERNIZR),
            jquery: resolved.flag(options::JQUERY),
            legacy_bootstrap: resolved.flag(options::BOOTSTRAP_3),
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::from_resolved(&options::resolve(options::SCHEMA, &Default::default()))
    }
}
