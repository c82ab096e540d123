//! Dependency installation through npm and bower
//!
//! The installer is an opaque external process. The pipeline awaits it and
//! only looks at whether it succeeded.

use crate::error::{Error, Result};
use async_trait::async_trait;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::info;

/// Controls passed to the installer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// Suppress the "running npm install" message
    pub skip_message: bool,
}

/// A package manager the installer can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Bower,
}

impl PackageManager {
    pub fn program(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Bower => "bower",
        }
    }

    pub fn command(self) -> String {
        format!("{} install", self.program())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub dir: PathBuf,
    pub managers: Vec<PackageManager>,
    pub options: InstallOptions,
}

impl InstallRequest {
    /// `npm install` followed by `bower install` in `dir`
    pub fn project(dir: &Path, options: InstallOptions) -> Self {
        Self {
            dir: dir.to_path_buf(),
            managers: vec![PackageManager::Npm, PackageManager::Bower],
            options,
        }
    }

    /// `bower install` only, for sub-generator directories
    pub fn bower(dir: &Path, options: InstallOptions) -> Self {
        Self {
            dir: dir.to_path_buf(),
            managers: vec![PackageManager::Bower],
            options,
        }
    }

    pub fn command_line(&self) -> String {
        self.managers
            .iter()
            .map(|m| m.command())
            .collect::<Vec<_>>()
            .join(" & ")
    }
}

#[async_trait]
pub trait Installer: Send + Sync {
    async fn install(&self, request: &InstallRequest) -> Result<()>;
}

/// Runs the package managers as child processes, streaming their output
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessInstaller;

#[async_trait]
impl Installer for ProcessInstaller {
    async fn install(&self, request: &InstallRequest) -> Result<()> {
        if !request.options.skip_message {
            println!();
            println!(
                "I'm all done. Running {} for you to install the required dependencies.\n\
                 If this fails, try running the command yourself.",
                request.command_line().yellow().bold()
            );
            println!();
        }

        for manager in &request.managers {
            run_manager(*manager, &request.dir).await?;
        }
        Ok(())
    }
}

async fn run_manager(manager: PackageManager, dir: &Path) -> Result<()> {
    let command = manager.command();
    info!(command = %command, dir = %dir.display(), "running installer");

    let mut child = Command::new(manager.program())
        .arg("install")
        .current_dir(dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::Install {
            command: command.clone(),
            reason: e.to_string(),
        })?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    tokio::join!(stream_lines(stdout, false), stream_lines(stderr, true));

    let status = child.wait().await.map_err(|e| Error::Install {
        command: command.clone(),
        reason: e.to_string(),
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::Install {
            command,
            reason: format!("exit code {}", status.code().unwrap_or(-1)),
        })
    }
}

async fn stream_lines<R: AsyncRead + Unpin>(reader: Option<R>, is_stderr: bool) {
    let Some(reader) = reader else {
        return;
    };
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if is_stderr {
            eprintln!("  {}", line.yellow());
        } else {
            println!("  {}", line);
        }
    }
}
