use std::path::Path;

use crate::batch::args::{SubmitOptions, submit_option_set};
use crate::batch::dispatch::{DryRunDispatcher, SchedulerDispatcher};
use crate::batch::{SubmitReport, submit};
use crate::error::SimError;
use crate::settings::SchedulerSettings;

/// Parses submitter arguments and renders/dispatches the jobs under `root`.
pub fn submit_batch(
    args: &[String],
    scheduler: &SchedulerSettings,
    root: &Path,
) -> Result<SubmitReport, SimError> {
    let (parsed, remaining) = submit_option_set().update_options(args.iter().cloned())?;
    let options = SubmitOptions::from_parsed(parsed, remaining)?;

    let report = if options.dry_run {
        submit(&options, scheduler, root, &mut DryRunDispatcher::default())?
    } else {
        let mut dispatcher = SchedulerDispatcher::new(&scheduler.submit_command);
        submit(&options, scheduler, root, &mut dispatcher)?
    };
    Ok(report)
}
