pub mod merge;
pub mod stats;
pub mod submit;

use crate::error::SimError;
use crate::merge::args::{MergeOptions, merge_option_set};
use crate::merge::container::JsonContainer;
use crate::settings::MergeSettings;

pub use merge::merge_files;
pub use stats::{HistogramStat, MergeStats};
pub use submit::submit_batch;

/// Parses merger arguments and runs the merge with the default container format.
pub fn run_merge(args: &[String], settings: &MergeSettings) -> Result<MergeStats, SimError> {
    let (parsed, remaining) = merge_option_set(settings).update_options(args.iter().cloned())?;
    if !remaining.is_empty() {
        tracing::warn!("ignoring unrecognized arguments: {}", remaining.join(" "));
    }
    let options = MergeOptions::from_parsed(&parsed, settings)?;
    merge_files(&options, &JsonContainer)
}
