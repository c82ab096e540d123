//! Template selection
//!
//! Every flag-dependent decision is made here, once. [`Selection`] carries the
//! outcome (framework variant, stylesheet and markup paths, dependency
//! manifest) and [`build_plan`] turns it into the [`ArtifactPlan`] that the
//! emitter and the wiring step consume.

use crate::config::Configuration;
use crate::error::Result;
use crate::manifest::DependencyManifest;
use crate::plan::{Artifact, ArtifactPlan, Bindings, GeneratorInfo, WiringTarget};
use crate::subgen::{SubGenerator, SubGeneratorParams};
use std::path::{Path, PathBuf};

/// Where bower installs packages (kept in sync with the `bowerrc` template)
pub const BOWER_DIRECTORY: &str = "bower_components";

/// Bootstrap 4 JavaScript modules
pub const MODERN_PLUGINS: [&str; 11] = [
    "util",
    "alert",
    "button",
    "carousel",
    "collapse",
    "dropdown",
    "modal",
    "scrollspy",
    "tab",
    "tooltip",
    "popover",
];

/// Bootstrap 3 JavaScript plugins
pub const LEGACY_PLUGINS: [&str; 12] = [
    "affix",
    "alert",
    "dropdown",
    "tooltip",
    "modal",
    "transition",
    "button",
    "popover",
    "carousel",
    "scrollspy",
    "collapse",
    "tab",
];

const LEGACY_SASS_MAIN: &[&str] = &[
    "assets/stylesheets/_bootstrap.scss",
    "assets/fonts/bootstrap/*",
    "assets/javascripts/bootstrap.js",
];

const LEGACY_PLAIN_MAIN: &[&str] = &[
    "less/bootstrap.less",
    "dist/css/bootstrap.css",
    "dist/js/bootstrap.js",
    "dist/fonts/*",
];

const JQUERY: (&str, &str) = ("jquery", "~3.1.1");
const MODERNIZR: (&str, &str) = ("modernizr", "~3.3.1");

/// Bootstrap variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framework {
    None,
    /// Bootstrap 4
    Modern,
    /// Bootstrap 3, Sass port
    LegacySass,
    /// Bootstrap 3, Less/CSS distribution
    LegacyPlain,
}

impl Framework {
    pub fn select(config: &Configuration) -> Self {
        match (config.bootstrap, config.legacy_bootstrap, config.sass) {
            (false, _, _) => Framework::None,
            (true, false, _) => Framework::Modern,
            (true, true, true) => Framework::LegacySass,
            (true, true, false) => Framework::LegacyPlain,
        }
    }

    /// Bower package name and version constraint
    pub fn package(self) -> Option<(&'static str, &'static str)> {
        match self {
            Framework::None => None,
            Framework::Modern => Some(("bootstrap", "~4.0.0-alpha.6")),
            Framework::LegacySass => Some(("bootstrap-sass", "~3.3.5")),
            Framework::LegacyPlain => Some(("bootstrap", "~3.3.5")),
        }
    }

    /// Replacement `main` for packages with a non-standard layout
    pub fn override_main(self) -> Option<&'static [&'static str]> {
        match self {
            Framework::LegacySass => Some(LEGACY_SASS_MAIN),
            Framework::LegacyPlain => Some(LEGACY_PLAIN_MAIN),
            Framework::None | Framework::Modern => None,
        }
    }

    /// Prefix of the per-plugin script paths referenced from the markup
    pub fn js_path(self) -> Option<&'static str> {
        match self {
            Framework::None => None,
            Framework::Modern => Some("/bower_components/bootstrap/js/dist/"),
            Framework::LegacySass => {
                Some("/bower_components/bootstrap-sass/assets/javascripts/bootstrap/")
            }
            Framework::LegacyPlain => Some("/bower_components/bootstrap/js/"),
        }
    }

    pub fn plugins(self) -> &'static [&'static str] {
        match self {
            Framework::None => &[],
            Framework::Modern => &MODERN_PLUGINS,
            Framework::LegacySass | Framework::LegacyPlain => &LEGACY_PLUGINS,
        }
    }

    pub fn is_enabled(self) -> bool {
        self != Framework::None
    }

    pub fn is_legacy(self) -> bool {
        matches!(self, Framework::LegacySass | Framework::LegacyPlain)
    }
}

/// The single outcome of all flag-dependent decisions
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub app_name: String,
    pub framework: Framework,
    pub stylesheet_template: &'static str,
    pub stylesheet_path: PathBuf,
    pub markup_path: PathBuf,
    pub manifest: DependencyManifest,
}

impl Selection {
    pub fn from_config(config: &Configuration, app_name: &str) -> Self {
        let framework = Framework::select(config);

        let stylesheet_template = if config.sass { "main.scss" } else { "main.css" };
        let stylesheet_path = Path::new("app/styles").join(stylesheet_template);

        let markup_path = if config.twig {
            PathBuf::from("app/base.html.twig")
        } else {
            PathBuf::from("app/index.html")
        };

        let mut manifest = DependencyManifest::new(slugify(app_name));
        if let Some((package, version)) = framework.package() {
            manifest.add_dependency(package, version);
            if let Some(main) = framework.override_main() {
                manifest.add_override(package, main);
            }
        } else if config.jquery {
            manifest.add_dependency(JQUERY.0, JQUERY.1);
        }
        if config.modernizr {
            manifest.add_dependency(MODERNIZR.0, MODERNIZR.1);
        }

        Self {
            app_name: app_name.to_string(),
            framework,
            stylesheet_template,
            stylesheet_path,
            markup_path,
            manifest,
        }
    }

    /// Files the wiring step rewrites, each with its own exclusions
    pub fn wiring_targets(&self, config: &Configuration) -> Vec<WiringTarget> {
        let mut targets = vec![WiringTarget {
            path: self.markup_path.clone(),
            directory: PathBuf::from(BOWER_DIRECTORY),
            exclude: vec!["bootstrap-sass".to_string(), "bootstrap.js".to_string()],
            ignore_path: r"^(\.\./)*\.\.".to_string(),
        }];
        if config.sass {
            targets.push(WiringTarget {
                path: self.stylesheet_path.clone(),
                directory: PathBuf::from(BOWER_DIRECTORY),
                exclude: Vec::new(),
                ignore_path: r"^(\.\./)+".to_string(),
            });
        }
        targets
    }
}

/// Application name derived from the project directory. Characters other
/// than ASCII word characters and whitespace become spaces.
pub fn app_name_from_dir(dir: &Path) -> String {
    let name: String = dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    if name.trim().is_empty() {
        "app".to_string()
    } else {
        name
    }
}

const DIACRITICS: &str = "ąàáäâãåæăćčĉęèéëêĝĥìíïîĵłľńňòóöőôõðøśșşšŝťțţŭùúüűûñÿýçżźž";
const DIACRITICS_ASCII: &str = "aaaaaaaaaccceeeeeghiiiijllnnoooooooossssstttuuuuuunyyczzz";

/// Lowercase ASCII slug: diacritics folded, every other run of non-alphanumeric
/// characters collapsed to a single `-`, no leading or trailing `-`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut separator = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        let mut buf = [0u8; 4];
        let folded: &str = if c.is_ascii_alphanumeric() {
            c.encode_utf8(&mut buf)
        } else if c == 'ß' {
            "ss"
        } else if let Some(i) = DIACRITICS.chars().position(|d| d == c) {
            &DIACRITICS_ASCII[i..i + 1]
        } else {
            separator = true;
            continue;
        };
        if separator && !slug.is_empty() {
            slug.push('-');
        }
        separator = false;
        slug.push_str(folded);
    }

    if slug.is_empty() {
        "app".to_string()
    } else {
        slug
    }
}

/// Build the full artifact plan for `config`
pub fn build_plan(
    config: &Configuration,
    selection: &Selection,
    info: &GeneratorInfo,
    test_generator: &dyn SubGenerator,
) -> Result<ArtifactPlan> {
    let framework = selection.framework;
    let mut plan = ArtifactPlan::new(&selection.markup_path, &selection.stylesheet_path);

    plan.push(Artifact::render(
        "gulpfile.js",
        "gulpfile.js",
        Bindings::new()
            .with("date", info.date_string())
            .with("name", info.name.as_str())
            .with("version", info.version.as_str())
            .with("includeSass", config.sass)
            .with("includeBootstrap", framework.is_enabled())
            .with("legacyBootstrap", framework.is_legacy())
            .with("includeBabel", config.babel)
            .with("testFramework", config.test_framework.as_str()),
    ))?;

    plan.push(Artifact::render(
        "_package.json",
        "package.json",
        Bindings::new()
            .with("includeSass", config.sass)
            .with("includeBabel", config.babel)
            .with("includeJQuery", config.jquery),
    ))?;

    plan.push(Artifact::copy("babelrc", ".babelrc"))?;
    plan.push(Artifact::copy("gitignore", ".gitignore"))?;
    plan.push(Artifact::copy("gitattributes", ".gitattributes"))?;

    let manifest_path = Path::new("bower.json");
    plan.push(Artifact::json(
        manifest_path,
        selection.manifest.to_json(manifest_path)?,
    ))?;
    plan.push(Artifact::copy("bowerrc", ".bowerrc"))?;
    plan.push(Artifact::copy("editorconfig", ".editorconfig"))?;

    plan.push(Artifact::copy("favicon.ico", "app/favicon.ico"))?;
    plan.push(Artifact::copy("apple-touch-icon.png", "app/apple-touch-icon.png"))?;
    plan.push(Artifact::copy("robots.txt", "app/robots.txt"))?;

    plan.push(Artifact::render(
        selection.stylesheet_template,
        &selection.stylesheet_path,
        Bindings::new()
            .with("includeBootstrap", framework.is_enabled())
            .with("legacyBootstrap", framework.is_legacy()),
    ))?;

    plan.push(Artifact::copy("main.js", "app/scripts/main.js"))?;

    plan.push(Artifact::render(
        "index.html",
        &selection.markup_path,
        Bindings::new()
            .with("appname", selection.app_name.as_str())
            .with("includeSass", config.sass)
            .with("includeBootstrap", framework.is_enabled())
            .with("legacyBootstrap", framework.is_legacy())
            .with("includeModernizr", config.modernizr)
            .with("includeJQuery", config.jquery)
            .with("bsPath", framework.js_path().unwrap_or_default())
            .with("bsPlugins", framework.plugins().to_vec()),
    ))?;

    plan.directory("app/images");
    plan.directory("app/fonts");

    let tests = test_generator.generate(&SubGeneratorParams {
        skip_install: config.skip_install,
    })?;
    plan.extend(tests.artifacts)?;
    plan.bower_install_dirs.extend(tests.bower_install_dir);

    plan.wiring = selection.wiring_targets(config);
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subgen;
    use serde_json::json;

    fn config(bootstrap: bool, legacy: bool, sass: bool) -> Configuration {
        Configuration {
            bootstrap,
            legacy_bootstrap: legacy,
            sass,
            ..Configuration::default()
        }
    }

    fn info() -> GeneratorInfo {
        GeneratorInfo {
            name: "webgen".into(),
            version: "0.1.0".into(),
            date: chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        }
    }

    fn plan_for(config: &Configuration) -> (Selection, ArtifactPlan) {
        let selection = Selection::from_config(config, "My App");
        let generator = subgen::lookup(&config.test_framework).unwrap();
        let plan = build_plan(config, &selection, &info(), generator).unwrap();
        (selection, plan)
    }

    #[test]
    fn test_decision_table() {
        let cases = [
            (false, false, true, None, None),
            (false, false, false, None, None),
            (true, false, true, Some("bootstrap"), Some("/bower_components/bootstrap/js/dist/")),
            (true, false, false, Some("bootstrap"), Some("/bower_components/bootstrap/js/dist/")),
            (
                true,
                true,
                true,
                Some("bootstrap-sass"),
                Some("/bower_components/bootstrap-sass/assets/javascripts/bootstrap/"),
            ),
            (true, true, false, Some("bootstrap"), Some("/bower_components/bootstrap/js/")),
        ];

        for (bootstrap, legacy, sass, package, js_path) in cases {
            let config = config(bootstrap, legacy, sass);
            let (selection, plan) = plan_for(&config);

            assert_eq!(
                selection.framework.package().map(|(name, _)| name),
                package,
                "bootstrap={bootstrap} legacy={legacy} sass={sass}"
            );
            if let Some(package) = package {
                assert_eq!(selection.manifest.dependency_names()[0], package);
            }

            let markup = plan.find(&selection.markup_path).unwrap();
            let crate::plan::ArtifactSource::Render { bindings, .. } = &markup.source else {
                panic!("markup must be rendered");
            };
            assert_eq!(bindings.get("bsPath"), Some(&json!(js_path.unwrap_or(""))));
        }
    }

    #[test]
    fn test_legacy_overrides() {
        let sass = Selection::from_config(&config(true, true, true), "app");
        assert_eq!(
            sass.manifest.overrides["bootstrap-sass"].main,
            LEGACY_SASS_MAIN.to_vec()
        );

        let plain = Selection::from_config(&config(true, true, false), "app");
        assert_eq!(plain.manifest.overrides["bootstrap"].main, LEGACY_PLAIN_MAIN.to_vec());

        let modern = Selection::from_config(&config(true, false, true), "app");
        assert!(modern.manifest.overrides.is_empty());
    }

    #[test]
    fn test_plugin_lists() {
        assert_eq!(Framework::Modern.plugins().len(), 11);
        assert_eq!(Framework::LegacySass.plugins().len(), 12);
        assert_eq!(Framework::LegacyPlain.plugins(), Framework::LegacySass.plugins());
        assert_eq!(Framework::LegacySass.plugins()[0], "affix");
        assert_eq!(Framework::Modern.plugins()[0], "util");
        assert!(Framework::None.plugins().is_empty());
    }

    #[test]
    fn test_jquery_only_manifest() {
        let config = Configuration {
            bootstrap: false,
            jquery: true,
            modernizr: false,
            ..Configuration::default()
        };
        let selection = Selection::from_config(&config, "app");
        let deps: Vec<_> = selection.manifest.dependencies().collect();
        assert_eq!(deps, vec![("jquery", "~3.1.1")]);
    }

    #[test]
    fn test_bootstrap_suppresses_jquery_dependency() {
        let selection = Selection::from_config(&Configuration::default(), "app");
        assert_eq!(selection.manifest.dependency_names(), vec!["bootstrap", "modernizr"]);
    }

    #[test]
    fn test_twig_changes_only_the_markup_destination() {
        let with_twig = Configuration::default();
        let without_twig = Configuration {
            twig: false,
            ..Configuration::default()
        };
        let (sel_a, plan_a) = plan_for(&with_twig);
        let (sel_b, plan_b) = plan_for(&without_twig);

        let a: Vec<_> = plan_a.destinations().collect();
        let b: Vec<_> = plan_b.destinations().collect();
        let differing: Vec<_> = a.iter().zip(&b).filter(|(x, y)| x != y).collect();
        assert_eq!(a.len(), b.len());
        assert_eq!(differing.len(), 1);
        assert_eq!(*differing[0].0, Path::new("app/base.html.twig"));
        assert_eq!(*differing[0].1, Path::new("app/index.html"));

        assert_eq!(plan_a.wiring[0].path, sel_a.markup_path);
        assert_eq!(plan_b.wiring[0].path, sel_b.markup_path);
        assert_eq!(plan_b.markup_path, Path::new("app/index.html"));
    }

    #[test]
    fn test_stylesheet_follows_sass_flag() {
        let (_, plan) = plan_for(&config(true, false, true));
        assert!(plan.find("app/styles/main.scss").is_some());
        assert_eq!(plan.wiring.len(), 2);
        assert_eq!(plan.wiring[1].path, Path::new("app/styles/main.scss"));

        let (_, plan) = plan_for(&config(true, false, false));
        assert!(plan.find("app/styles/main.css").is_some());
        assert!(plan.find("app/styles/main.scss").is_none());
        assert_eq!(plan.wiring.len(), 1);
    }

    #[test]
    fn test_plan_contents() {
        let (_, plan) = plan_for(&Configuration::default());
        for dest in [
            "gulpfile.js",
            "package.json",
            ".babelrc",
            ".gitignore",
            ".gitattributes",
            "bower.json",
            ".bowerrc",
            ".editorconfig",
            "app/favicon.ico",
            "app/apple-touch-icon.png",
            "app/robots.txt",
            "app/scripts/main.js",
            "test/index.html",
        ] {
            assert!(plan.find(dest).is_some(), "missing {dest}");
        }
        assert_eq!(
            plan.directories(),
            &[PathBuf::from("app/images"), PathBuf::from("app/fonts")]
        );
    }

    #[test]
    fn test_manifest_name_is_slugified() {
        let selection = Selection::from_config(&Configuration::default(), "My Cool_App");
        assert_eq!(selection.manifest.name, "my-cool-app");
        assert_eq!(selection.app_name, "My Cool_App");
    }

    #[test]
    fn test_app_name_from_dir() {
        assert_eq!(app_name_from_dir(Path::new("/tmp/site")), "site");
        assert_eq!(app_name_from_dir(Path::new("/tmp/my-site")), "my site");
        assert_eq!(app_name_from_dir(Path::new("/tmp/my_site.v2")), "my_site v2");
        assert_eq!(app_name_from_dir(Path::new("/")), "app");
        assert_eq!(app_name_from_dir(Path::new("/tmp/--")), "app");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("MySite"), "mysite");
        assert_eq!(slugify("café"), "cafe");
        assert_eq!(slugify("  Straße Über  "), "strasse-uber");
        assert_eq!(slugify("my site v2"), "my-site-v2");
        assert_eq!(slugify("a__b--c"), "a-b-c");
        assert_eq!(slugify("!!!"), "app");
    }
}
