use crate::error::Result;
use crate::report::{print_next_steps, ManualSteps, Reporter};
use std::sync::Mutex;

/// Reporter backed by cliclack's intro/log/spinner/outro widgets
#[derive(Default)]
pub struct TuiReporter {
    spinner: Mutex<Option<cliclack::ProgressBar>>,
}

impl TuiReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for TuiReporter {
    fn intro(&self, title: &str, welcome: Option<&str>) -> Result<()> {
        cliclack::intro(title)?;
        if let Some(welcome) = welcome {
            cliclack::log::remark(welcome)?;
        }
        Ok(())
    }

    fn info(&self, message: &str) -> Result<()> {
        cliclack::log::info(message)?;
        Ok(())
    }

    fn success(&self, message: &str) -> Result<()> {
        cliclack::log::success(message)?;
        Ok(())
    }

    fn warning(&self, message: &str) -> Result<()> {
        cliclack::log::warning(message)?;
        Ok(())
    }

    fn error(&self, message: &str) -> Result<()> {
        cliclack::log::error(message)?;
        Ok(())
    }

    fn start_progress(&self, message: &str) {
        let spinner = cliclack::spinner();
        spinner.start(message);
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(spinner);
        }
    }

    fn stop_progress(&self, message: &str) {
        let spinner = self.spinner.lock().ok().and_then(|mut slot| slot.take());
        match spinner {
            Some(spinner) => spinner.stop(message),
            None => {
                let _ = cliclack::log::success(message);
            }
        }
    }

    fn instructions(&self, steps: &ManualSteps) -> Result<()> {
        cliclack::note("Manual steps", steps.highlighted())?;
        Ok(())
    }

    fn outro(&self, next_steps: &[String]) -> Result<()> {
        print_next_steps(next_steps);
        cliclack::outro("Happy coding!")?;
        Ok(())
    }
}
