//! webgen - scaffold a gulp/bower web application

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, FromArgMatches, Parser};
use serde_json::Value;
use std::path::{Path, PathBuf};
use webgen_core::options::{self, RawOptions};
use webgen_core::{Configuration, CreateArgs, ProductConfig};

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone)]
pub struct WebgenConfig;

impl ProductConfig for WebgenConfig {
    fn name(&self) -> &'static str {
        "webgen"
    }

    fn display_name(&self) -> &'static str {
        "webgen"
    }

    fn welcome_message(&self) -> &'static str {
        "Out of the box I include HTML5 Boilerplate, jQuery, and a gulpfile to build your app."
    }

    fn skip_install_env(&self) -> &'static str {
        "WEBGEN_SKIP_INSTALL"
    }

    fn docs_url(&self) -> &'static str {
        "https://gulpjs.com/docs/en/getting-started/quick-start"
    }

    fn cli_description(&self) -> &'static str {
        "Scaffold a gulp/bower web application"
    }

    fn next_steps(&self, dir: &Path, config: &Configuration) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        if current.as_deref() != Some(dir) && dir != Path::new(".") {
            steps.push(format!("cd {}", dir.display()));
        }
        steps.push("gulp serve".to_string());
        steps.push(format!("gulp serve:test  # {} specs", config.test_framework));
        steps.push(format!("Read the gulp docs: {}", self.docs_url()));
        steps
    }
}

#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// Project directory to generate into (defaults to the current directory)
    pub directory: Option<PathBuf>,

    /// Options file to load instead of <DIRECTORY>/webgen.yaml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Skip the welcome message
    #[arg(long)]
    pub skip_welcome_message: bool,

    /// Skip the message printed before installing dependencies
    #[arg(long)]
    pub skip_install_message: bool,

    /// Do not run npm install and bower install
    #[arg(long)]
    pub skip_install: bool,

    /// Test framework for the generated specs
    #[arg(long, value_parser = ["mocha", "jasmine"])]
    pub test_framework: Option<String>,

    /// Transpile ES2015 with Babel
    #[arg(long)]
    pub babel: Option<bool>,

    /// Use plain CSS instead of Sass
    #[arg(long)]
    pub no_sass: bool,

    /// Write index.html instead of base.html.twig
    #[arg(long)]
    pub no_twig: bool,

    /// Leave out Bootstrap
    #[arg(long)]
    pub no_bootstrap: bool,

    /// Leave out Modernizr
    #[arg(long)]
    pub no_modernizr: bool,

    /// Leave out jQuery
    #[arg(long)]
    pub no_jquery: bool,

    /// Use Bootstrap 3 instead of Bootstrap 4
    #[arg(long = "bootstrap-3")]
    pub bootstrap_3: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Options the user gave explicitly. Everything else is left to the
    /// options file and the schema defaults.
    fn raw_options(&self) -> RawOptions {
        let mut raw = RawOptions::new();
        let mut flag = |given: bool, name: &str, value: bool| {
            if given {
                raw.insert(name.to_string(), Value::Bool(value));
            }
        };

        flag(self.skip_welcome_message, options::SKIP_WELCOME_MESSAGE, true);
        flag(self.skip_install_message, options::SKIP_INSTALL_MESSAGE, true);
        flag(self.skip_install, options::SKIP_INSTALL, true);
        flag(self.no_sass, options::SASS, false);
        flag(self.no_twig, options::TWIG, false);
        flag(self.no_bootstrap, options::BOOTSTRAP, false);
        flag(self.no_modernizr, options::MODERNIZR, false);
        flag(self.no_jquery, options::JQUERY, false);
        flag(self.bootstrap_3, options::BOOTSTRAP_3, true);
        if let Some(babel) = self.babel {
            flag(true, options::BABEL, babel);
        }

        if let Some(framework) = &self.test_framework {
            raw.insert(
                options::TEST_FRAMEWORK.to_string(),
                Value::String(framework.clone()),
            );
        }
        raw
    }
}

/// Command-line interface named and described by the product
fn command<C: ProductConfig>(product: &C) -> clap::Command {
    Args::command()
        .name(product.name())
        .about(product.cli_description())
}

impl From<Args> for CreateArgs {
    fn from(args: Args) -> Self {
        CreateArgs {
            options: args.raw_options(),
            directory: args.directory,
            config_file: args.config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let config = WebgenConfig;
    let matches = command(&config).get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = webgen_core::run(&config, args.into(), CLI_VERSION)
        .await
        .context("project generation failed");

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> RawOptions {
        let mut argv = vec!["webgen"];
        argv.extend_from_slice(args);
        Args::parse_from(argv).raw_options()
    }

    #[test]
    fn test_no_flags_forwards_nothing() {
        assert!(parse(&[]).is_empty());
    }

    #[test]
    fn test_negative_flags_map_to_positive_options() {
        let raw = parse(&["--no-sass", "--no-twig", "--bootstrap-3"]);
        assert_eq!(raw.get("sass"), Some(&Value::Bool(false)));
        assert_eq!(raw.get("twig"), Some(&Value::Bool(false)));
        assert_eq!(raw.get("bootstrap-3"), Some(&Value::Bool(true)));
        assert_eq!(raw.len(), 3);
    }

    #[test]
    fn test_babel_and_test_framework_values() {
        let raw = parse(&["--babel", "false", "--test-framework", "jasmine"]);
        assert_eq!(raw.get("babel"), Some(&Value::Bool(false)));
        assert_eq!(
            raw.get("test-framework"),
            Some(&Value::String("jasmine".into()))
        );
    }

    #[test]
    fn test_directory_and_config() {
        let args = Args::parse_from(["webgen", "site", "--config", "opts.yaml", "-vv"]);
        assert_eq!(args.verbose, 2);
        let create: CreateArgs = args.into();
        assert_eq!(create.directory, Some(PathBuf::from("site")));
        assert_eq!(create.config_file, Some(PathBuf::from("opts.yaml")));
    }

    #[test]
    fn test_next_steps_leave_manual_install_to_the_instructions() {
        let config = Configuration {
            skip_install: true,
            ..Configuration::default()
        };
        let steps = WebgenConfig.next_steps(Path::new("site"), &config);
        assert_eq!(steps[0], "cd site");
        assert!(!steps.iter().any(|s| s.contains("bower install")));
        assert!(!steps.iter().any(|s| s.contains("gulp wiredep")));
        assert!(steps.contains(&"gulp serve".to_string()));
    }

    #[test]
    fn test_command_uses_product_description() {
        let cmd = command(&WebgenConfig);
        assert_eq!(cmd.get_name(), "webgen");
        assert_eq!(
            cmd.get_about().map(|about| about.to_string()),
            Some(WebgenConfig.cli_description().to_string())
        );
    }
}
