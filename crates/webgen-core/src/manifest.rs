//! Bower dependency manifest types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Per-package override for packages whose `main` field does not list the
/// files the project needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageOverride {
    pub main: Vec<String>,
}

/// The project's `bower.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyManifest {
    pub name: String,

    #[serde(default)]
    pub private: bool,

    /// Package name to version constraint, in declaration order
    #[serde(default)]
    dependencies: Map<String, Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, PackageOverride>,
}

impl DependencyManifest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            private: true,
            dependencies: Map::new(),
            overrides: BTreeMap::new(),
        }
    }

    pub fn add_dependency(&mut self, package: &str, version: &str) {
        self.dependencies
            .insert(package.to_string(), Value::String(version.to_string()));
    }

    pub fn add_override(&mut self, package: &str, main: &[&str]) {
        self.overrides.insert(
            package.to_string(),
            PackageOverride {
                main: main.iter().map(|s| s.to_string()).collect(),
            },
        );
    }

    /// Dependencies in declaration order. Non-string constraints read as `*`.
    pub fn dependencies(&self) -> impl Iterator<Item = (&str, &str)> {
        self.dependencies
            .iter()
            .map(|(name, version)| (name.as_str(), version.as_str().unwrap_or("*")))
    }

    pub fn dependency_names(&self) -> Vec<&str> {
        self.dependencies.keys().map(String::as_str).collect()
    }

    /// JSON form of the manifest, to be written at `path`
    pub fn to_json(&self, path: &Path) -> Result<Value> {
        serde_json::to_value(self).map_err(|source| Error::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a manifest back from disk
    pub async fn read(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&content).map_err(|source| Error::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// `main` may be a single path or a list of paths
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MainField {
    One(String),
    Many(Vec<String>),
}

impl MainField {
    pub fn paths(&self) -> Vec<String> {
        match self {
            MainField::One(p) => vec![p.clone()],
            MainField::Many(ps) => ps.clone(),
        }
    }
}

/// The manifest of an installed package, as found under the install directory
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub main: Option<MainField>,

    #[serde(default)]
    pub dependencies: Map<String, Value>,
}

impl PackageManifest {
    /// Load `.bower.json` (written by the installer) or `bower.json` from a
    /// package directory. Returns `None` if neither exists.
    pub async fn load(package_dir: &Path) -> Result<Option<Self>> {
        for file in [".bower.json", "bower.json"] {
            let path = package_dir.join(file);
            match tokio::fs::read_to_string(&path).await {
                Ok(content) => {
                    let manifest =
                        serde_json::from_str(&content).map_err(|source| Error::Manifest {
                            path: path.clone(),
                            source,
                        })?;
                    return Ok(Some(manifest));
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(Error::io(&path, e)),
            }
        }
        Ok(None)
    }

    pub fn main_files(&self) -> Vec<String> {
        self.main.as_ref().map(MainField::paths).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependencies_keep_declaration_order() {
        let mut manifest = DependencyManifest::new("app");
        manifest.add_dependency("modernizr", "~3.3.1");
        manifest.add_dependency("jquery", "~3.1.1");
        assert_eq!(manifest.dependency_names(), vec!["modernizr", "jquery"]);

        let json = serde_json::to_string(&manifest).unwrap();
        assert!(json.find("modernizr").unwrap() < json.find("jquery").unwrap());
    }

    #[test]
    fn test_serialized_shape() {
        let mut manifest = DependencyManifest::new("my-app");
        manifest.add_dependency("bootstrap", "~3.3.5");
        manifest.add_override("bootstrap", &["dist/js/bootstrap.js"]);

        let value = manifest.to_json(Path::new("bower.json")).unwrap();
        assert_eq!(value["name"], "my-app");
        assert_eq!(value["private"], true);
        assert_eq!(value["dependencies"]["bootstrap"], "~3.3.5");
        assert_eq!(value["overrides"]["bootstrap"]["main"][0], "dist/js/bootstrap.js");
    }

    #[test]
    fn test_overrides_omitted_when_empty() {
        let value = DependencyManifest::new("app")
            .to_json(Path::new("bower.json"))
            .unwrap();
        assert!(value.get("overrides").is_none());
        assert!(value["dependencies"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_main_field_forms() {
        let one: PackageManifest = serde_json::from_str(r#"{"main": "dist/a.js"}"#).unwrap();
        assert_eq!(one.main_files(), vec!["dist/a.js"]);

        let many: PackageManifest =
            serde_json::from_str(r#"{"main": ["a.js", "a.css"], "dependencies": {"x": "1"}}"#)
                .unwrap();
        assert_eq!(many.main_files(), vec!["a.js", "a.css"]);
        assert!(many.dependencies.contains_key("x"));

        let none: PackageManifest = serde_json::from_str("{}").unwrap();
        assert!(none.main_files().is_empty());
    }

    #[tokio::test]
    async fn test_load_prefers_dot_bower_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bower.json"), r#"{"main": "plain.js"}"#).unwrap();
        std::fs::write(dir.path().join(".bower.json"), r#"{"main": "installed.js"}"#).unwrap();

        let manifest = PackageManifest::load(dir.path()).await.unwrap().unwrap();
        assert_eq!(manifest.main_files(), vec!["installed.js"]);
    }

    #[tokio::test]
    async fn test_load_missing_package() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PackageManifest::load(dir.path()).await.unwrap().is_none());
    }
}
