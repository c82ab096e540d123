//! The generation pipeline
//!
//! Control flows strictly forward: options are resolved once, the selector
//! builds the plan, the emitter writes it, the installer runs (unless
//! skipped) and wiring rewrites the injection blocks last.

use crate::config::{Configuration, OptionSources};
use crate::emitter::{self, EmitReport};
use crate::error::Result;
use crate::install::{InstallOptions, InstallRequest, Installer, ProcessInstaller};
use crate::manifest::DependencyManifest;
use crate::options::{self, RawOptions};
use crate::plan::{ArtifactPlan, GeneratorInfo};
use crate::product::ProductConfig;
use crate::report::{ManualSteps, Reporter};
use crate::selector::{self, Selection};
use crate::subgen;
use crate::templates::TemplateRegistry;
use crate::wiring::{self, WireReport};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Inputs gathered by the binary
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project directory to generate into (defaults to the current directory)
    pub directory: Option<PathBuf>,

    /// Options file to load instead of the product's default one
    pub config_file: Option<PathBuf>,

    /// Options given explicitly on the command line
    pub options: RawOptions,
}

/// What happened after the files were written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WiringOutcome {
    /// Installation was skipped; the user got manual instructions instead
    Skipped,
    /// The installer failed with this message; wiring did not run
    InstallFailed(String),
    Wired(Vec<WireReport>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSummary {
    pub emitted: EmitReport,
    pub wiring: WiringOutcome,
}

/// Resolve options from every source and generate into the requested directory
pub async fn run<C: ProductConfig>(
    product: &C,
    args: CreateArgs,
    cli_version: &str,
) -> Result<GenerationSummary> {
    let target = args.directory.unwrap_or_else(|| PathBuf::from("."));

    let sources = match &args.config_file {
        Some(path) => OptionSources::new().with_file(path, true)?,
        None => OptionSources::new().with_file(&target.join(product.options_file()), false)?,
    };
    let raw = sources
        .with_env(product.skip_install_env())
        .with_cli(args.options)
        .merge();
    let config = Configuration::from_resolved(&options::resolve(options::SCHEMA, &raw));
    debug!(?config, "resolved configuration");

    let reporter = default_reporter();
    let welcome = (!config.skip_welcome_message).then(|| product.welcome_message());
    reporter.intro(product.display_name(), welcome)?;

    let info = GeneratorInfo::today(product.name(), cli_version);
    generate(
        product,
        &config,
        &target,
        &info,
        &ProcessInstaller,
        reporter.as_ref(),
    )
    .await
}

#[cfg(feature = "tui")]
fn default_reporter() -> Box<dyn Reporter> {
    Box::new(crate::tui::TuiReporter::new())
}

#[cfg(not(feature = "tui"))]
fn default_reporter() -> Box<dyn Reporter> {
    Box::new(crate::report::PlainReporter)
}

/// Run every stage for an already resolved configuration
///
/// An unknown test framework or a bad plan fails before anything is written.
/// Installer failures are reported and end the run without wiring; they are
/// not returned as errors.
pub async fn generate<C: ProductConfig>(
    product: &C,
    config: &Configuration,
    target: &Path,
    info: &GeneratorInfo,
    installer: &dyn Installer,
    reporter: &dyn Reporter,
) -> Result<GenerationSummary> {
    let test_generator = subgen::lookup(&config.test_framework)?;

    let app_name = match std::env::current_dir() {
        Ok(cwd) => selector::app_name_from_dir(&cwd.join(target)),
        Err(_) => selector::app_name_from_dir(target),
    };
    let selection = Selection::from_config(config, &app_name);
    let plan = selector::build_plan(config, &selection, info, test_generator)?;
    info!(
        app = %selection.app_name,
        artifacts = plan.artifacts().len(),
        markup = %plan.markup_path.display(),
        "planned project"
    );

    reporter.start_progress("Writing project files...");
    let emitted = match emitter::emit(&plan, &TemplateRegistry::embedded(), target).await {
        Ok(report) => report,
        Err(e) => {
            reporter.stop_progress("Failed to write project files");
            return Err(e);
        }
    };
    reporter.stop_progress(&format!(
        "Created {} files in {}",
        emitted.files.len(),
        target.display()
    ));

    let wiring = install_and_wire(config, &plan, target, installer, reporter).await?;

    reporter.outro(&product.next_steps(target, config))?;

    Ok(GenerationSummary { emitted, wiring })
}

async fn install_and_wire(
    config: &Configuration,
    plan: &ArtifactPlan,
    root: &Path,
    installer: &dyn Installer,
    reporter: &dyn Reporter,
) -> Result<WiringOutcome> {
    let steps = ManualSteps::default();

    if config.skip_install {
        debug!("install skipped, wiring left to the user");
        reporter.info("Skipping dependency installation")?;
        reporter.instructions(&steps)?;
        return Ok(WiringOutcome::Skipped);
    }

    let options = InstallOptions {
        skip_message: config.skip_install_message,
    };
    let mut requests = vec![InstallRequest::project(root, options)];
    requests.extend(
        plan.bower_install_dirs
            .iter()
            .map(|dir| InstallRequest::bower(&root.join(dir), options)),
    );

    for request in &requests {
        if let Err(e) = installer.install(request).await {
            warn!(error = %e, dir = %request.dir.display(), "dependency installation failed");
            reporter.error(&e.to_string())?;
            reporter.instructions(&steps)?;
            return Ok(WiringOutcome::InstallFailed(e.to_string()));
        }
    }

    let manifest = DependencyManifest::read(&root.join("bower.json")).await?;
    let mut reports = Vec::with_capacity(plan.wiring.len());
    let mut warned = HashSet::new();
    for target in &plan.wiring {
        let report = wiring::wire(root, &manifest, target).await?;
        for package in &report.missing {
            if warned.insert(package.clone()) {
                reporter.warning(&format!("{package} is not installed, so it was not wired"))?;
            }
        }
        reporter.success(&format!(
            "Injected {} dependencies into {}",
            report.injected,
            report.path.display()
        ))?;
        reports.push(report);
    }

    Ok(WiringOutcome::Wired(reports))
}
