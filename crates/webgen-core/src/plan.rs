//! Artifact plan types
//!
//! An [`ArtifactPlan`] is the ordered list of files the emitter writes. It is
//! built once by the selector and never mutated after emission starts.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Template variables for a single render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings(Map<String, Value>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn to_context(&self) -> tera::Context {
        let mut context = tera::Context::new();
        for (name, value) in &self.0 {
            context.insert(name.as_str(), value);
        }
        context
    }
}

/// How an artifact's bytes are produced
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactSource {
    /// Render an embedded template with bindings
    Render {
        template: &'static str,
        bindings: Bindings,
    },
    /// Copy an embedded template verbatim
    Copy { template: &'static str },
    /// Serialize a generated JSON document
    Json(Value),
}

impl ArtifactSource {
    pub fn template(&self) -> Option<&'static str> {
        match self {
            ArtifactSource::Render { template, .. } | ArtifactSource::Copy { template } => {
                Some(*template)
            }
            ArtifactSource::Json(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    /// Destination relative to the project root
    pub dest: PathBuf,
    pub source: ArtifactSource,
}

impl Artifact {
    pub fn render(template: &'static str, dest: impl Into<PathBuf>, bindings: Bindings) -> Self {
        Self {
            dest: dest.into(),
            source: ArtifactSource::Render { template, bindings },
        }
    }

    pub fn copy(template: &'static str, dest: impl Into<PathBuf>) -> Self {
        Self {
            dest: dest.into(),
            source: ArtifactSource::Copy { template },
        }
    }

    pub fn json(dest: impl Into<PathBuf>, value: Value) -> Self {
        Self {
            dest: dest.into(),
            source: ArtifactSource::Json(value),
        }
    }
}

/// One invocation of the wiring step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WiringTarget {
    /// File to rewrite, relative to the project root
    pub path: PathBuf,
    /// Package install directory, relative to the project root
    pub directory: PathBuf,
    /// Package names or path fragments never injected into this target
    pub exclude: Vec<String>,
    /// Regex stripped from each computed reference path
    pub ignore_path: String,
}

/// Static metadata about the generator itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorInfo {
    pub name: String,
    pub version: String,
    pub date: NaiveDate,
}

impl GeneratorInfo {
    pub fn today(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            date: chrono::Local::now().date_naive(),
        }
    }

    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ArtifactPlan {
    artifacts: Vec<Artifact>,
    directories: Vec<PathBuf>,
    destinations: HashSet<PathBuf>,
    /// Markup entry point, shared by the emitter and the wiring step
    pub markup_path: PathBuf,
    pub stylesheet_path: PathBuf,
    pub wiring: Vec<WiringTarget>,
    /// Extra directories (relative to the root) that need `bower install`
    pub bower_install_dirs: Vec<PathBuf>,
}

impl ArtifactPlan {
    pub fn new(markup_path: impl Into<PathBuf>, stylesheet_path: impl Into<PathBuf>) -> Self {
        Self {
            markup_path: markup_path.into(),
            stylesheet_path: stylesheet_path.into(),
            ..Self::default()
        }
    }

    /// Add an artifact. Destinations are unique within a plan.
    pub fn push(&mut self, artifact: Artifact) -> Result<()> {
        if !self.destinations.insert(artifact.dest.clone()) {
            return Err(Error::DuplicateArtifact(artifact.dest));
        }
        self.artifacts.push(artifact);
        Ok(())
    }

    pub fn extend(&mut self, artifacts: impl IntoIterator<Item = Artifact>) -> Result<()> {
        artifacts.into_iter().try_for_each(|a| self.push(a))
    }

    /// Plan an empty directory
    pub fn directory(&mut self, dir: impl Into<PathBuf>) {
        let dir = dir.into();
        if !self.directories.contains(&dir) {
            self.directories.push(dir);
        }
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    pub fn find(&self, dest: impl AsRef<Path>) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.dest == dest.as_ref())
    }

    pub fn destinations(&self) -> impl Iterator<Item = &Path> {
        self.artifacts.iter().map(|a| a.dest.as_path())
    }
}
