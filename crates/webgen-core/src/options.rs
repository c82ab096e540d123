//! Option schema and resolution
//!
//! Options arrive as a loosely typed mapping (from the options file, the
//! environment and the command line) and are resolved against a fixed schema.
//! Unknown names are ignored, missing names take their default, and a value of
//! the wrong type falls back to the default with a warning.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// Supplied option values keyed by option name
pub type RawOptions = BTreeMap<String, Value>;

pub const SKIP_WELCOME_MESSAGE: &str = "skip-welcome-message";
pub const SKIP_INSTALL_MESSAGE: &str = "skip-install-message";
pub const SKIP_INSTALL: &str = "skip-install";
pub const TEST_FRAMEWORK: &str = "test-framework";
pub const BABEL: &str = "babel";
pub const SASS: &str = "sass";
pub const TWIG: &str = "twig";
pub const BOOTSTRAP: &str = "bootstrap";
pub const MODERNIZR: &str = "modernizr";
pub const JQUERY: &str = "jquery";
pub const BOOTSTRAP_3: &str = "bootstrap-3";

/// Declared type and default of an option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionDefault {
    Bool(bool),
    Str(&'static str),
}

impl OptionDefault {
    fn to_value(self) -> OptionValue {
        match self {
            OptionDefault::Bool(b) => OptionValue::Bool(b),
            OptionDefault::Str(s) => OptionValue::Str(s.to_string()),
        }
    }

    fn type_name(self) -> &'static str {
        match self {
            OptionDefault::Bool(_) => "boolean",
            OptionDefault::Str(_) => "string",
        }
    }
}

/// A resolved option value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Str(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Str(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub default: OptionDefault,
}

/// The generator's option schema
pub const SCHEMA: &[OptionSpec] = &[
    OptionSpec {
        name: SKIP_WELCOME_MESSAGE,
        description: "Skips the welcome message",
        default: OptionDefault::Bool(false),
    },
    OptionSpec {
        name: SKIP_INSTALL_MESSAGE,
        description: "Skips the message after the installation of dependencies",
        default: OptionDefault::Bool(false),
    },
    OptionSpec {
        name: SKIP_INSTALL,
        description: "Skips installing npm and bower dependencies",
        default: OptionDefault::Bool(false),
    },
    OptionSpec {
        name: TEST_FRAMEWORK,
        description: "Test framework to be invoked",
        default: OptionDefault::Str("mocha"),
    },
    OptionSpec {
        name: BABEL,
        description: "Use Babel",
        default: OptionDefault::Bool(true),
    },
    OptionSpec {
        name: SASS,
        description: "Use Sass",
        default: OptionDefault::Bool(true),
    },
    OptionSpec {
        name: TWIG,
        description: "Use Twig for the markup entry point",
        default: OptionDefault::Bool(true),
    },
    OptionSpec {
        name: BOOTSTRAP,
        description: "Use Bootstrap",
        default: OptionDefault::Bool(true),
    },
    OptionSpec {
        name: MODERNIZR,
        description: "Use Modernizr",
        default: OptionDefault::Bool(true),
    },
    OptionSpec {
        name: JQUERY,
        description: "Use jQuery",
        default: OptionDefault::Bool(true),
    },
    OptionSpec {
        name: BOOTSTRAP_3,
        description: "Use Bootstrap v3 instead of v4",
        default: OptionDefault::Bool(false),
    },
];

/// Options after resolution against a schema. Every schema entry has a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    values: BTreeMap<&'static str, OptionValue>,
}

impl ResolvedOptions {
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    /// Boolean value of `name`; false for unknown or string options
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(OptionValue::Bool(true)))
    }

    /// String value of `name`; empty for unknown or boolean options
    pub fn string(&self, name: &str) -> &str {
        match self.values.get(name) {
            Some(OptionValue::Str(s)) => s,
            _ => "",
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }
}

/// Resolve supplied options against `schema`
pub fn resolve(schema: &[OptionSpec], supplied: &RawOptions) -> ResolvedOptions {
    let supplied = expand_negations(schema, supplied);

    for name in supplied.keys() {
        if !schema.iter().any(|spec| spec.name == name) {
            debug!(option = %name, "ignoring unrecognized option");
        }
    }

    let values = schema
        .iter()
        .map(|spec| {
            let value = match supplied.get(spec.name) {
                None => spec.default.to_value(),
                Some(raw) => coerce(spec, raw).unwrap_or_else(|| {
                    warn!(
                        option = spec.name,
                        expected = spec.default.type_name(),
                        got = %raw,
                        "option has the wrong type, using default"
                    );
                    spec.default.to_value()
                }),
            };
            (spec.name, value)
        })
        .collect();

    ResolvedOptions { values }
}

fn coerce(spec: &OptionSpec, raw: &Value) -> Option<OptionValue> {
    match (spec.default, raw) {
        (OptionDefault::Bool(_), Value::Bool(b)) => Some(OptionValue::Bool(*b)),
        (OptionDefault::Str(_), Value::String(s)) => Some(OptionValue::Str(s.clone())),
        _ => None,
    }
}

/// Rewrite `no-<name>` aliases of boolean options into their positive form.
/// An explicitly supplied positive name wins over its alias.
fn expand_negations(schema: &[OptionSpec], supplied: &RawOptions) -> RawOptions {
    let mut out = supplied.clone();
    for (name, value) in supplied {
        let Some(positive) = name.strip_prefix("no-") else {
            continue;
        };
        let is_bool_option = schema
            .iter()
            .any(|s| s.name == positive && matches!(s.default, OptionDefault::Bool(_)));
        if !is_bool_option {
            continue;
        }
        out.remove(name);
        if supplied.contains_key(positive) {
            continue;
        }
        let negated = match value {
            Value::Bool(b) => Value::Bool(!b),
            other => other.clone(),
        };
        out.insert(positive.to_string(), negated);
    }
    out
}
