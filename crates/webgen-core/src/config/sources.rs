//! Layered option sources: options file, environment, command line

use crate::error::{Error, Result};
use crate::options::{RawOptions, SKIP_INSTALL};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

/// Collects raw options from several layers. Later layers take precedence.
#[derive(Debug, Default)]
pub struct OptionSources {
    layers: Vec<RawOptions>,
}

impl OptionSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add options from a YAML file. A missing file is skipped unless `required`.
    pub fn with_file(mut self, path: &Path, required: bool) -> Result<Self> {
        if !required && !path.exists() {
            debug!(path = %path.display(), "no options file");
            return Ok(self);
        }
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let layer = parse_options_file(&content).map_err(|source| Error::InvalidOptionsFile {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), count = layer.len(), "loaded options file");
        self.layers.push(layer);
        Ok(self)
    }

    /// Inherit the skip-install control from the environment variable `var`
    pub fn with_env(self, var: &str) -> Self {
        let value = std::env::var(var).ok();
        self.with_skip_install_env(value.as_deref())
    }

    fn with_skip_install_env(mut self, value: Option<&str>) -> Self {
        if let Some(value) = value {
            let mut layer = RawOptions::new();
            layer.insert(SKIP_INSTALL.to_string(), env_value(value));
            self.layers.push(layer);
        }
        self
    }

    /// Add options given on the command line
    pub fn with_cli(mut self, options: RawOptions) -> Self {
        self.layers.push(options);
        self
    }

    pub fn merge(self) -> RawOptions {
        self.layers.into_iter().fold(RawOptions::new(), |mut acc, layer| {
            acc.extend(layer);
            acc
        })
    }
}

fn env_value(value: &str) -> Value {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Value::Bool(true),
        "" | "0" | "false" | "no" | "off" => Value::Bool(false),
        _ => Value::String(value.to_string()),
    }
}

/// Parse a flat YAML mapping of option names to values
fn parse_options_file(content: &str) -> std::result::Result<RawOptions, serde_yaml::Error> {
    let doc: serde_yaml::Value = serde_yaml::from_str(content)?;
    let mut options = RawOptions::new();

    let mapping = match doc {
        serde_yaml::Value::Null => return Ok(options),
        serde_yaml::Value::Mapping(m) => m,
        other => {
            warn!(found = ?other, "options file is not a mapping, ignoring it");
            return Ok(options);
        }
    };

    for (key, value) in mapping {
        let Some(key) = key.as_str() else {
            warn!(key = ?key, "ignoring non-string option name");
            continue;
        };
        let value = serde_json::to_value(&value).unwrap_or(Value::Null);
        options.insert(key.to_string(), value);
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_later_layers_win() {
        let mut file = RawOptions::new();
        file.insert("sass".into(), json!(false));
        file.insert("twig".into(), json!(false));
        let mut cli = RawOptions::new();
        cli.insert("sass".into(), json!(true));

        let merged = OptionSources::new().with_cli(file).with_cli(cli).merge();
        assert_eq!(merged["sass"], json!(true));
        assert_eq!(merged["twig"], json!(false));
    }

    #[test]
    fn test_env_truthiness() {
        assert_eq!(env_value("1"), json!(true));
        assert_eq!(env_value("TRUE"), json!(true));
        assert_eq!(env_value("no"), json!(false));
        assert_eq!(env_value("maybe"), json!("maybe"));
    }

    #[test]
    fn test_skip_install_env_layer() {
        let merged = OptionSources::new()
            .with_skip_install_env(Some("yes"))
            .merge();
        assert_eq!(merged[SKIP_INSTALL], json!(true));

        let merged = OptionSources::new().with_skip_install_env(None).merge();
        assert!(merged.is_empty());
    }

    #[test]
    fn test_parse_options_file() {
        let options = parse_options_file(
            "sass: false\ntest-framework: jasmine\nbootstrap-3: true\n",
        )
        .unwrap();
        assert_eq!(options["sass"], json!(false));
        assert_eq!(options["test-framework"], json!("jasmine"));
        assert_eq!(options["bootstrap-3"], json!(true));
    }

    #[test]
    fn test_parse_empty_options_file() {
        assert!(parse_options_file("").unwrap().is_empty());
    }

    #[test]
    fn test_missing_optional_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let merged = OptionSources::new()
            .with_file(&dir.path().join("webgen.yaml"), false)
            .unwrap()
            .merge();
        assert!(merged.is_empty());
    }

    #[test]
    fn test_missing_required_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = OptionSources::new().with_file(&dir.path().join("missing.yaml"), true);
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_malformed_file_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("webgen.yaml");
        std::fs::write(&path, "sass: [unterminated").unwrap();
        let err = OptionSources::new().with_file(&path, true).unwrap_err();
        assert!(matches!(err, Error::InvalidOptionsFile { .. }));
        assert!(err.is_configuration());
    }
}
