//! Test-framework sub-generators
//!
//! The `test-framework` option selects one delegate from a fixed table. The
//! delegate contributes its own artifacts under `test/` to the main plan.

use crate::error::{Error, Result};
use crate::manifest::DependencyManifest;
use crate::plan::{Artifact, Bindings};
use std::path::{Path, PathBuf};

/// The only input a sub-generator receives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubGeneratorParams {
    pub skip_install: bool,
}

#[derive(Debug, Default)]
pub struct SubGeneratorOutput {
    pub artifacts: Vec<Artifact>,
    /// Directory (relative to the project root) needing `bower install`
    pub bower_install_dir: Option<PathBuf>,
}

pub trait SubGenerator: Send + Sync {
    /// Name used by the `test-framework` option
    fn name(&self) -> &'static str;

    fn generate(&self, params: &SubGeneratorParams) -> Result<SubGeneratorOutput>;
}

/// Mocha with Chai assertions
pub struct Mocha;

/// Jasmine standalone runner
pub struct Jasmine;

impl SubGenerator for Mocha {
    fn name(&self) -> &'static str {
        "mocha"
    }

    fn generate(&self, params: &SubGeneratorParams) -> Result<SubGeneratorOutput> {
        let mut manifest = DependencyManifest::new("test");
        manifest.add_dependency("chai", "~3.5.0");
        manifest.add_dependency("mocha", "~3.2.0");
        runner_output(self.name(), manifest, params)
    }
}

impl SubGenerator for Jasmine {
    fn name(&self) -> &'static str {
        "jasmine"
    }

    fn generate(&self, params: &SubGeneratorParams) -> Result<SubGeneratorOutput> {
        let mut manifest = DependencyManifest::new("test");
        manifest.add_dependency("jasmine-core", "~2.5.2");
        runner_output(self.name(), manifest, params)
    }
}

fn runner_output(
    framework: &'static str,
    manifest: DependencyManifest,
    params: &SubGeneratorParams,
) -> Result<SubGeneratorOutput> {
    let (runner, spec) = match framework {
        "jasmine" => ("test/jasmine.html", "test/jasmine-spec.js"),
        _ => ("test/mocha.html", "test/mocha-spec.js"),
    };
    let manifest_path = Path::new("test/bower.json");
    Ok(SubGeneratorOutput {
        artifacts: vec![
            Artifact::json(manifest_path, manifest.to_json(manifest_path)?),
            Artifact::render(
                runner,
                "test/index.html",
                Bindings::new().with("testFramework", framework),
            ),
            Artifact::copy(spec, "test/spec/test.js"),
        ],
        bower_install_dir: (!params.skip_install).then(|| PathBuf::from("test")),
    })
}

static SUB_GENERATORS: &[&dyn SubGenerator] = &[&Mocha, &Jasmine];

/// Look up the sub-generator registered under `name`
pub fn lookup(name: &str) -> Result<&'static dyn SubGenerator> {
    SUB_GENERATORS
        .iter()
        .copied()
        .find(|g| g.name() == name)
        .ok_or_else(|| Error::UnknownTestFramework {
            name: name.to_string(),
            available: available().join(", "),
        })
}

pub fn available() -> Vec<&'static str> {
    SUB_GENERATORS.iter().map(|g| g.name()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::ArtifactSource;

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(lookup("mocha").unwrap().name(), "mocha");
        assert_eq!(lookup("jasmine").unwrap().name(), "jasmine");
    }

    #[test]
    fn test_unknown_framework() {
        let err = lookup("karma").err().unwrap();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("mocha, jasmine"));
    }

    #[test]
    fn test_skip_install_suppresses_install_dir() {
        let out = Mocha.generate(&SubGeneratorParams { skip_install: true }).unwrap();
        assert!(out.bower_install_dir.is_none());

        let out = Mocha
            .generate(&SubGeneratorParams {
                skip_install: false,
            })
            .unwrap();
        assert_eq!(out.bower_install_dir, Some(PathBuf::from("test")));
    }

    #[test]
    fn test_jasmine_manifest() {
        let out = Jasmine.generate(&SubGeneratorParams { skip_install: true }).unwrap();
        let ArtifactSource::Json(manifest) = &out.artifacts[0].source else {
            panic!("expected the test manifest first");
        };
        assert_eq!(manifest["dependencies"]["jasmine-core"], "~2.5.2");
        assert_eq!(out.artifacts[1].source.template(), Some("test/jasmine.html"));
    }
}
