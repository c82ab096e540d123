//! Product configuration trait for CLI binaries
//!
//! The binary implements this trait to name itself and to describe what the
//! user should do once generation finishes. The pipeline is generic over it.

use crate::config::Configuration;
use std::path::Path;

/// Configuration trait for the generator binary
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (recorded in generated files)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Greeting shown unless `skip-welcome-message` is set
    fn welcome_message(&self) -> &'static str;

    /// Options file looked up in the target directory when `--config` is not given
    fn options_file(&self) -> &'static str {
        "webgen.yaml"
    }

    /// Environment variable that carries the skip-install control
    fn skip_install_env(&self) -> &'static str;

    /// URL for product documentation
    fn docs_url(&self) -> &'static str;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, dir: &Path, config: &Configuration) -> Vec<String>;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;
}
