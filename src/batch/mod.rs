//! Renders scheduler job scripts for a batch of simulation copies and submits them.

pub mod args;
pub mod dispatch;
pub mod errors;
pub mod script;
pub mod template;

use chrono::Local;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::settings::{SchedulerSettings, load_structured};
use args::SubmitOptions;
use dispatch::Dispatcher;
use errors::BatchError;
use template::JobTemplate;

pub type CopyParameters = IndexMap<String, serde_json::Value>;

/// Per-copy parameter file: `copies` holds one table per batch member.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParameterFile {
    copies: Vec<CopyParameters>,
}

pub fn load_parameters(path: &str) -> Result<Vec<CopyParameters>, BatchError> {
    let file: ParameterFile = load_structured(path)?;
    Ok(file.copies)
}

#[derive(Debug, Default)]
pub struct SubmitReport {
    pub scripts: Vec<PathBuf>,
    pub job_ids: Vec<String>,
    pub final_script: Option<PathBuf>,
    pub kill_file: Option<PathBuf>,
    pub dry_run: bool,
}

fn file_err(what: &str, path: &Path, e: std::io::Error) -> BatchError {
    BatchError::FileError(format!("failed to {} {}: {}", what, path.display(), e))
}

/// Creates `<log_root>/` and `<log_root>/<run_name>/` under `root`.
///
/// A non-directory already sitting at the run path is fatal.
pub fn prepare_run_dirs(root: &Path, log_root: &str, run_name: &str) -> Result<PathBuf, BatchError> {
    let logs = root.join(log_root);
    fs::create_dir_all(&logs).map_err(|e| file_err("create", &logs, e))?;

    let run_dir = logs.join(run_name);
    if run_dir.exists() {
        if !run_dir.is_dir() {
            return Err(BatchError::RunNameCollision(run_dir.display().to_string()));
        }
        return Ok(run_dir);
    }

    fs::create_dir(&run_dir).map_err(|e| file_err("create", &run_dir, e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&run_dir, fs::Permissions::from_mode(0o750))
            .map_err(|e| file_err("set permissions on", &run_dir, e))?;
    }
    Ok(run_dir)
}

fn write_script(path: &Path, contents: &str) -> Result<(), BatchError> {
    fs::write(path, contents).map_err(|e| file_err("write", path, e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o750))
            .map_err(|e| file_err("set permissions on", path, e))?;
    }
    Ok(())
}

fn resolve_copies(
    options: &SubmitOptions,
    parameters: Option<Vec<CopyParameters>>,
) -> Result<(u32, Option<Vec<CopyParameters>>), BatchError> {
    let Some(params) = parameters else {
        return Ok((options.n_copies, None));
    };

    let count = u32::try_from(params.len())
        .map_err(|_| BatchError::InvalidParameter("too many parameter tables".to_string()))?;
    if count == 0 {
        return Err(BatchError::InvalidParameter(
            "parameter file holds no copies".to_string(),
        ));
    }
    if options.n_copies != 1 && options.n_copies != count {
        return Err(BatchError::InvalidParameter(format!(
            "nCopies is {} but the parameter file holds {} copies",
            options.n_copies, count
        )));
    }
    Ok((count, Some(params)))
}

/// Renders and dispatches one job per copy, plus the optional summarization job.
///
/// All paths are relative to `root`, normally the directory the user submits from.
pub fn submit(
    options: &SubmitOptions,
    scheduler: &SchedulerSettings,
    root: &Path,
    dispatcher: &mut dyn Dispatcher,
) -> Result<SubmitReport, BatchError> {
    let run_dir = prepare_run_dirs(root, &scheduler.log_root, &options.run_name)?;
    let jobs_dir = run_dir.join("jobs");
    fs::create_dir_all(&jobs_dir).map_err(|e| file_err("create", &jobs_dir, e))?;

    let parameters = options.parameters.as_deref().map(load_parameters).transpose()?;
    let (copies, parameters) = resolve_copies(options, parameters)?;

    let isotime = Local::now().format("%Y%m%dT%H%M%S").to_string();
    let template = JobTemplate::new(options, scheduler, &isotime);

    let mut report = SubmitReport {
        dry_run: options.dry_run,
        ..Default::default()
    };
    let dispatched = dispatch_all(
        &template,
        options,
        copies,
        parameters.as_deref(),
        &jobs_dir,
        dispatcher,
        &mut report,
    );

    // Jobs already accepted by the scheduler stay cancellable even if a later one failed.
    report.kill_file = write_kill_file(root, scheduler, &options.run_name, &report.job_ids)?;
    if let Err(e) = dispatched {
        return Err(match &report.kill_file {
            Some(kill_file) => BatchError::PartiallySubmitted {
                submitted: report.job_ids.len(),
                kill_file: kill_file.display().to_string(),
                source: Box::new(e),
            },
            None => e,
        });
    }

    info!(
        "{} job script(s) for run {} in {}",
        report.scripts.len(),
        options.run_name,
        jobs_dir.display()
    );
    Ok(report)
}

/// Renders, writes and dispatches every job script, recording progress in `report`.
fn dispatch_all(
    template: &JobTemplate,
    options: &SubmitOptions,
    copies: u32,
    parameters: Option<&[CopyParameters]>,
    jobs_dir: &Path,
    dispatcher: &mut dyn Dispatcher,
    report: &mut SubmitReport,
) -> Result<(), BatchError> {
    for index in 0..copies {
        let params = parameters.and_then(|p| p.get(index as usize));
        let script = template.render_job_script(index, params)?;

        let path = jobs_dir.join(format!("{}.{:03}.sh", options.run_name, index));
        write_script(&path, &script)?;

        if let Some(id) = dispatcher.dispatch(&path)? {
            report.job_ids.push(id);
        }
        report.scripts.push(path);
    }

    if let Some(script) = template.render_final_script()? {
        let path = jobs_dir.join(format!("{}.END.sh", options.run_name));
        write_script(&path, &script)?;
        if let Some(id) = dispatcher.dispatch(&path)? {
            report.job_ids.push(id);
        }
        report.final_script = Some(path);
    }
    Ok(())
}

/// Writes `<kill_root>/killbatch_<run>.sh` cancelling every submitted job.
fn write_kill_file(
    root: &Path,
    scheduler: &SchedulerSettings,
    run_name: &str,
    job_ids: &[String],
) -> Result<Option<PathBuf>, BatchError> {
    let kill_dir = root.join(&scheduler.kill_root);
    fs::create_dir_all(&kill_dir).map_err(|e| file_err("create", &kill_dir, e))?;

    if job_ids.is_empty() {
        warn!("no job ids reported, not writing a kill file for {}", run_name);
        return Ok(None);
    }

    let mut builder = script::ScriptBuilder::new();
    for id in job_ids {
        builder.command(["scancel", id.as_str()]);
    }

    let path = kill_dir.join(format!("killbatch_{}.sh", run_name));
    write_script(&path, &builder.build())?;
    Ok(Some(path))
}
