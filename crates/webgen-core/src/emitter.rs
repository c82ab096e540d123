//! Artifact emission: render each planned artifact and write it under the project root

use crate::error::{Error, Result};
use crate::plan::{ArtifactPlan, ArtifactSource};
use crate::templates::TemplateRegistry;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// What the emitter wrote, in plan order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitReport {
    pub files: Vec<PathBuf>,
    pub directories: Vec<PathBuf>,
}

/// Emit every artifact in `plan` under `root`
///
/// Template ids are checked before anything is written. Emission is not
/// transactional: an I/O or render failure leaves earlier files in place.
pub async fn emit(
    plan: &ArtifactPlan,
    registry: &TemplateRegistry,
    root: &Path,
) -> Result<EmitReport> {
    registry.validate(plan)?;

    fs::create_dir_all(root)
        .await
        .map_err(|e| Error::io(root, e))?;

    let mut report = EmitReport::default();

    for artifact in plan.artifacts() {
        let bytes = match &artifact.source {
            ArtifactSource::Render { template, bindings } => {
                registry.render(template, bindings)?.into_bytes()
            }
            ArtifactSource::Copy { template } => registry.lookup(template)?.bytes().to_vec(),
            ArtifactSource::Json(value) => {
                let mut json = serde_json::to_string_pretty(value).map_err(|source| {
                    Error::Manifest {
                        path: artifact.dest.clone(),
                        source,
                    }
                })?;
                json.push('\n');
                json.into_bytes()
            }
        };

        write_file(&root.join(&artifact.dest), &bytes).await?;
        debug!(path = %artifact.dest.display(), bytes = bytes.len(), "wrote artifact");
        report.files.push(artifact.dest.clone());
    }

    for dir in plan.directories() {
        let target = root.join(dir);
        fs::create_dir_all(&target)
            .await
            .map_err(|e| Error::io(&target, e))?;
        report.directories.push(dir.clone());
    }

    Ok(report)
}

/// Write `bytes` to `path`, creating parent directories first. The handle is
/// dropped when this returns, on success or error.
async fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io(parent, e))?;
    }

    let mut file = fs::File::create(path)
        .await
        .map_err(|e| Error::io(path, e))?;
    file.write_all(bytes).await.map_err(|e| Error::io(path, e))?;
    file.flush().await.map_err(|e| Error::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{Artifact, Bindings};
    use serde_json::json;

    #[tokio::test]
    async fn test_emit_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let mut plan = ArtifactPlan::default();
        plan.push(Artifact::copy("main.js", "app/scripts/main.js"))
            .unwrap();
        plan.directory("app/images");

        let report = emit(&plan, &TemplateRegistry::embedded(), dir.path())
            .await
            .unwrap();

        assert_eq!(report.files, vec![PathBuf::from("app/scripts/main.js")]);
        assert!(dir.path().join("app/scripts/main.js").is_file());
        assert!(dir.path().join("app/images").is_dir());
    }

    #[tokio::test]
    async fn test_copy_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let registry = TemplateRegistry::embedded();
        let mut plan = ArtifactPlan::default();
        plan.push(Artifact::copy("favicon.ico", "app/favicon.ico"))
            .unwrap();

        emit(&plan, &registry, dir.path()).await.unwrap();

        let written = std::fs::read(dir.path().join("app/favicon.ico")).unwrap();
        assert_eq!(written, registry.lookup("favicon.ico").unwrap().bytes());
    }

    #[tokio::test]
    async fn test_render_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut plan = ArtifactPlan::default();
        plan.push(Artifact::render(
            "test/mocha.html",
            "test/index.html",
            Bindings::new().with("testFramework", "mocha"),
        ))
        .unwrap();
        plan.push(Artifact::json("bower.json", json!({"name": "x"})))
            .unwrap();

        emit(&plan, &TemplateRegistry::embedded(), dir.path())
            .await
            .unwrap();

        let html = std::fs::read_to_string(dir.path().join("test/index.html")).unwrap();
        assert!(html.contains("<title>mocha spec runner</title>"));
        let json = std::fs::read_to_string(dir.path().join("bower.json")).unwrap();
        assert_eq!(json, "{\n  \"name\": \"x\"\n}\n");
    }

    #[tokio::test]
    async fn test_unknown_template_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut plan = ArtifactPlan::default();
        plan.push(Artifact::copy("robots.txt", "app/robots.txt"))
            .unwrap();
        plan.push(Artifact::copy("does-not-exist", "nope"))
            .unwrap();

        let err = emit(&plan, &TemplateRegistry::embedded(), dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::TemplateNotFound(_)));
        assert!(!dir.path().join("app/robots.txt").exists());
    }
}
