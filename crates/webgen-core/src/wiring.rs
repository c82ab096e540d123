//! Dependency wiring
//!
//! Rewrites `bower:<type>` ... `endbower` blocks in markup and stylesheets so
//! they reference the main files of the installed packages. Packages appear in
//! manifest declaration order, each preceded by its own dependencies. Blocks
//! are replaced wholesale, so rewiring with an unchanged manifest is a no-op.

use crate::error::{Error, Result};
use crate::manifest::{DependencyManifest, PackageManifest};
use crate::plan::WiringTarget;
use regex::Regex;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireReport {
    pub path: PathBuf,
    /// Reference lines written into injection blocks
    pub injected: usize,
    pub changed: bool,
    /// Dependencies with no installed package, in discovery order
    pub missing: Vec<String>,
}

/// A main file of an installed package, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageFile {
    pub package: String,
    pub path: PathBuf,
}

/// Installed main files plus the dependencies that were not found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub files: Vec<PackageFile>,
    pub missing: Vec<String>,
}

impl PackageFile {
    fn extension(&self) -> &str {
        self.path.extension().and_then(|e| e.to_str()).unwrap_or("")
    }

    fn matches(&self, pattern: &str) -> bool {
        self.package == pattern || self.path.to_string_lossy().contains(pattern)
    }
}

/// Comment syntax of the file being rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    Html,
    Scss,
    Css,
}

impl MarkerStyle {
    pub fn for_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "html" | "htm" | "twig" => Some(MarkerStyle::Html),
            "scss" | "sass" => Some(MarkerStyle::Scss),
            "css" => Some(MarkerStyle::Css),
            _ => None,
        }
    }

    fn patterns(self) -> (&'static str, &'static str) {
        match self {
            MarkerStyle::Html => (
                r"^\s*<!--\s*bower:(\w+)\s*-->\s*$",
                r"^\s*<!--\s*endbower\s*-->\s*$",
            ),
            MarkerStyle::Scss => (r"^\s*//\s*bower:(\w+)\s*$", r"^\s*//\s*endbower\s*$"),
            MarkerStyle::Css => (
                r"^\s*/\*\s*bower:(\w+)\s*\*/\s*$",
                r"^\s*/\*\s*endbower\s*\*/\s*$",
            ),
        }
    }

    /// Prefix and suffix around a reference path for a block type
    fn reference_format(self, block: &str) -> Option<(&'static str, &'static str)> {
        match (self, block) {
            (MarkerStyle::Html, "js") => Some(("<script src=\"", "\"></script>")),
            (MarkerStyle::Html, "css") => Some(("<link rel=\"stylesheet\" href=\"", "\" />")),
            (MarkerStyle::Scss, "scss") | (MarkerStyle::Scss, "css") => {
                Some(("@import \"", "\";"))
            }
            (MarkerStyle::Css, "css") => Some(("@import \"", "\";")),
            _ => None,
        }
    }
}

/// Injection markers compiled for one file type
struct Markers {
    style: MarkerStyle,
    start: Regex,
    end: Regex,
}

impl Markers {
    fn new(style: MarkerStyle) -> Result<Self> {
        let (start, end) = style.patterns();
        Ok(Self {
            style,
            start: compile(start)?,
            end: compile(end)?,
        })
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// A reference ready for injection: block type and rewritten path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: String,
    pub path: String,
}

/// Wire the installed dependencies of `manifest` into one target file
pub async fn wire(
    root: &Path,
    manifest: &DependencyManifest,
    target: &WiringTarget,
) -> Result<WireReport> {
    let Some(style) = MarkerStyle::for_path(&target.path) else {
        warn!(path = %target.path.display(), "no injection markers known for this file type");
        return Ok(WireReport {
            path: target.path.clone(),
            injected: 0,
            changed: false,
            missing: Vec::new(),
        });
    };
    let markers = Markers::new(style)?;
    let ignore_path = compile(&target.ignore_path)?;

    let resolution = resolve_files(root, manifest, &target.directory).await?;
    let from_dir = target.path.parent().unwrap_or(Path::new(""));
    let references: Vec<Reference> = resolution
        .files
        .iter()
        .filter(|f| !target.exclude.iter().any(|p| f.matches(p)))
        .map(|f| Reference {
            kind: f.extension().to_string(),
            path: ignore_path
                .replace(&relative_path(from_dir, &f.path), "")
                .into_owned(),
        })
        .collect();

    let path = root.join(&target.path);
    let content = fs::read_to_string(&path)
        .await
        .map_err(|e| Error::io(&path, e))?;
    let (rewritten, injected) = inject(&content, &markers, &references);
    let changed = rewritten != content;
    if changed {
        fs::write(&path, rewritten)
            .await
            .map_err(|e| Error::io(&path, e))?;
    }
    debug!(path = %target.path.display(), injected, changed, "wired dependencies");

    Ok(WireReport {
        path: target.path.clone(),
        injected,
        changed,
        missing: resolution.missing,
    })
}

/// Main files of every installed dependency, dependencies first
pub async fn resolve_files(
    root: &Path,
    manifest: &DependencyManifest,
    install_dir: &Path,
) -> Result<Resolution> {
    let (packages, missing) = load_packages(root, manifest, install_dir).await?;

    let mut seen = HashSet::new();
    let mut order = Vec::new();
    for name in manifest.dependency_names() {
        visit(name, &packages, &mut seen, &mut order);
    }

    let mut files = Vec::new();
    for name in order {
        let main = match manifest.overrides.get(&name) {
            Some(over) => over.main.clone(),
            None => packages
                .get(&name)
                .and_then(Option::as_ref)
                .map(PackageManifest::main_files)
                .unwrap_or_default(),
        };
        for entry in main.iter().filter(|m| !m.contains('*')) {
            let entry = entry.trim_start_matches("./");
            files.push(PackageFile {
                package: name.clone(),
                path: install_dir.join(&name).join(entry),
            });
        }
    }
    Ok(Resolution { files, missing })
}

async fn load_packages(
    root: &Path,
    manifest: &DependencyManifest,
    install_dir: &Path,
) -> Result<(HashMap<String, Option<PackageManifest>>, Vec<String>)> {
    let mut packages = HashMap::new();
    let mut missing = Vec::new();
    let mut queue: VecDeque<String> = manifest
        .dependency_names()
        .into_iter()
        .map(String::from)
        .collect();

    while let Some(name) = queue.pop_front() {
        if packages.contains_key(&name) {
            continue;
        }
        let package = PackageManifest::load(&root.join(install_dir).join(&name)).await?;
        match &package {
            Some(p) => queue.extend(p.dependencies.keys().cloned()),
            None => {
                warn!(package = %name, "package is not installed, skipping");
                missing.push(name.clone());
            }
        }
        packages.insert(name, package);
    }
    Ok((packages, missing))
}

fn visit(
    name: &str,
    packages: &HashMap<String, Option<PackageManifest>>,
    seen: &mut HashSet<String>,
    order: &mut Vec<String>,
) {
    if !seen.insert(name.to_string()) {
        return;
    }
    if let Some(Some(package)) = packages.get(name) {
        for dep in package.dependencies.keys() {
            visit(dep, packages, seen, order);
        }
        order.push(name.to_string());
    }
}

/// Path from directory `from` to `to`, both relative to the same root, with `/` separators
pub fn relative_path(from: &Path, to: &Path) -> String {
    let normal = |p: &Path| -> Vec<String> {
        p.components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect()
    };
    let from = normal(from);
    let to = normal(to);
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<String> = vec!["..".to_string(); from.len() - common];
    parts.extend(to[common..].iter().cloned());
    parts.join("/")
}

/// Replace the contents of every recognised block. Returns the new text and
/// the number of reference lines written. Text outside replaced blocks,
/// line terminators included, is kept byte for byte.
fn inject(content: &str, markers: &Markers, references: &[Reference]) -> (String, usize) {
    let mut out = String::with_capacity(content.len());
    let mut injected = 0;
    let mut lines = content.split_inclusive('\n');

    while let Some(raw) = lines.next() {
        out.push_str(raw);
        let line = strip_eol(raw);

        let Some(kind) = markers.start.captures(line).map(|c| c[1].to_string()) else {
            continue;
        };
        let Some((prefix, suffix)) = markers.style.reference_format(&kind) else {
            continue;
        };
        let indent: String = line.chars().take_while(|c| c.is_whitespace()).collect();
        let eol = if raw.ends_with("\r\n") { "\r\n" } else { "\n" };

        let mut previous = Vec::new();
        let mut end = None;
        for next in lines.by_ref() {
            if markers.end.is_match(strip_eol(next)) {
                end = Some(next);
                break;
            }
            previous.push(next);
        }

        match end {
            Some(end) => {
                for reference in references.iter().filter(|r| r.kind == kind) {
                    out.push_str(&format!("{indent}{prefix}{}{suffix}{eol}", reference.path));
                    injected += 1;
                }
                out.push_str(end);
            }
            None => {
                warn!(block = %kind, "injection block has no closing marker, leaving it unchanged");
                out.extend(previous);
            }
        }
    }

    (out, injected)
}

fn strip_eol(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
