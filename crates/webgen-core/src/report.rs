//! User-facing progress output
//!
//! The pipeline talks to a [`Reporter`]. [`PlainReporter`] prints colored
//! lines and is always available; the cliclack reporter lives in
//! [`crate::tui`] behind the `tui` feature.

use crate::error::Result;
use colored::Colorize;
use std::fmt;

/// The commands a user runs by hand when installation or wiring did not happen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualSteps {
    pub install: String,
    pub wire: String,
}

impl Default for ManualSteps {
    fn default() -> Self {
        Self {
            install: "npm install & bower install".to_string(),
            wire: "gulp wiredep".to_string(),
        }
    }
}

impl ManualSteps {
    /// Same text as `Display`, with the commands highlighted
    pub fn highlighted(&self) -> String {
        format!(
            "After running {}, inject your\nfront end dependencies by running {}.",
            self.install.yellow().bold(),
            self.wire.yellow().bold()
        )
    }
}

impl fmt::Display for ManualSteps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "After running {}, inject your\nfront end dependencies by running {}.",
            self.install, self.wire
        )
    }
}

pub trait Reporter: Send + Sync {
    /// Start of the run. `welcome` is `None` when the welcome message is skipped.
    fn intro(&self, title: &str, welcome: Option<&str>) -> Result<()>;

    fn info(&self, message: &str) -> Result<()>;

    fn success(&self, message: &str) -> Result<()>;

    fn warning(&self, message: &str) -> Result<()>;

    fn error(&self, message: &str) -> Result<()>;

    /// Begin a long-running step
    fn start_progress(&self, message: &str);

    /// Finish the step started by [`Reporter::start_progress`]
    fn stop_progress(&self, message: &str);

    fn instructions(&self, steps: &ManualSteps) -> Result<()>;

    /// End of the run, with the product's numbered next steps
    fn outro(&self, next_steps: &[String]) -> Result<()>;
}

/// Line-oriented colored output on stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainReporter;

impl Reporter for PlainReporter {
    fn intro(&self, title: &str, welcome: Option<&str>) -> Result<()> {
        println!("{}", title.bold());
        if let Some(welcome) = welcome {
            println!("{}", welcome);
        }
        println!();
        Ok(())
    }

    fn info(&self, message: &str) -> Result<()> {
        println!("{} {}", "•".cyan(), message);
        Ok(())
    }

    fn success(&self, message: &str) -> Result<()> {
        println!("{} {}", "✓".green(), message);
        Ok(())
    }

    fn warning(&self, message: &str) -> Result<()> {
        println!("{} {}", "!".yellow().bold(), message.yellow());
        Ok(())
    }

    fn error(&self, message: &str) -> Result<()> {
        eprintln!("{} {}", "✗".red().bold(), message.red());
        Ok(())
    }

    fn start_progress(&self, message: &str) {
        println!("{} {}", "…".dimmed(), message);
    }

    fn stop_progress(&self, message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    fn instructions(&self, steps: &ManualSteps) -> Result<()> {
        println!();
        println!("{}", steps.highlighted());
        Ok(())
    }

    fn outro(&self, next_steps: &[String]) -> Result<()> {
        print_next_steps(next_steps);
        println!("{}", "Happy coding!".bold());
        Ok(())
    }
}

pub(crate) fn print_next_steps(steps: &[String]) {
    if steps.is_empty() {
        return;
    }
    println!();
    println!("  Next steps");
    println!();
    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_steps_text() {
        assert_eq!(
            ManualSteps::default().to_string(),
            "After running npm install & bower install, inject your\nfront end dependencies by running gulp wiredep."
        );
    }

    #[test]
    fn test_highlighted_keeps_commands() {
        colored::control::set_override(false);
        let text = ManualSteps::default().highlighted();
        assert_eq!(text, ManualSteps::default().to_string());
    }
}
