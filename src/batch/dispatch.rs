use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use super::errors::BatchError;

/// Hands a rendered job script to the scheduler.
pub trait Dispatcher {
    /// Submits `script`; returns the scheduler's job id when one is known.
    fn dispatch(&mut self, script: &Path) -> Result<Option<String>, BatchError>;
}

/// Submits through the scheduler's command-line client (`sbatch` by default).
pub struct SchedulerDispatcher {
    command: String,
}

impl SchedulerDispatcher {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
        }
    }
}

impl Dispatcher for SchedulerDispatcher {
    fn dispatch(&mut self, script: &Path) -> Result<Option<String>, BatchError> {
        let output = Command::new(&self.command)
            .arg(script)
            .output()
            .map_err(|e| {
                BatchError::SubmitFailed(format!("failed to run {}: {}", self.command, e))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BatchError::SubmitFailed(format!(
                "{} {} exited with {}: {}",
                self.command,
                script.display(),
                output.status,
                stderr.trim()
            )));
        }

        let job_id = parse_job_id(&stdout);
        info!(
            "submitted {} as job {}",
            script.display(),
            job_id.as_deref().unwrap_or("<unknown>")
        );
        Ok(job_id)
    }
}

/// Records scripts instead of submitting them.
#[derive(Debug, Default)]
pub struct DryRunDispatcher {
    pub scripts: Vec<PathBuf>,
}

impl Dispatcher for DryRunDispatcher {
    fn dispatch(&mut self, script: &Path) -> Result<Option<String>, BatchError> {
        debug!("dry run, not submitting {}", script.display());
        self.scripts.push(script.to_path_buf());
        Ok(None)
    }
}

/// Extracts the job id from `Submitted batch job <id>` style output.
pub fn parse_job_id(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .rev()
        .filter_map(|line| line.split_whitespace().last())
        .find(|word| !word.is_empty() && word.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_id_is_parsed_from_sbatch_output() {
        assert_eq!(
            parse_job_id("Submitted batch job 123456\n"),
            Some("123456".to_string())
        );
        assert_eq!(parse_job_id("warning: low priority\nSubmitted batch job 7"), Some("7".to_string()));
        assert_eq!(parse_job_id("error"), None);
        assert_eq!(parse_job_id(""), None);
    }

    #[test]
    fn dry_run_records_scripts() {
        let mut dispatcher = DryRunDispatcher::default();
        let id = dispatcher.dispatch(Path::new("jobs/a.sh")).unwrap();
        assert!(id.is_none());
        assert_eq!(dispatcher.scripts, vec![PathBuf::from("jobs/a.sh")]);
    }

    #[cfg(unix)]
    #[test]
    fn failing_submit_command_is_an_error() {
        let mut dispatcher = SchedulerDispatcher::new("false");
        let err = dispatcher.dispatch(Path::new("job.sh")).unwrap_err();
        assert!(matches!(err, BatchError::SubmitFailed(_)));
    }
}
