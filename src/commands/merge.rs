use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use super::stats::{HistogramStat, MergeStats};
use crate::error::SimError;
use crate::merge::args::MergeOptions;
use crate::merge::container::{ContainerFormat, SimFile};
use crate::merge::errors::MergeError;
use crate::merge::{merge_contents, naming, select};

/// Enumerates, reads, merges and writes; the whole `merge` command.
pub fn merge_files(
    options: &MergeOptions,
    format: &dyn ContainerFormat,
) -> Result<MergeStats, SimError> {
    let start = Instant::now();

    let files = select::enumerate_files(&options.files)?;
    info!("merging {} file(s)", files.len());

    let inputs: Vec<(PathBuf, SimFile)> = files
        .par_iter()
        .map(|path| format.read(path).map(|file| (path.clone(), file)))
        .collect::<Result<_, _>>()?;

    let outcome = merge_contents(&inputs, options)?;

    let save_name = options
        .save_name
        .clone()
        .unwrap_or_else(|| naming::default_save_name(&files));

    fs::create_dir_all(&options.save_dir).map_err(|e| {
        MergeError::FileError(format!(
            "failed to create output directory {}: {}",
            options.save_dir.display(),
            e
        ))
    })?;
    let output = options
        .save_dir
        .join(format!("{}.{}", save_name, format.extension()));
    format.write(&output, &outcome.file)?;
    info!("wrote {}", output.display());

    Ok(MergeStats {
        files_merged: outcome.merged,
        files_skipped: outcome.skipped,
        histograms: outcome.file.histograms.iter().map(HistogramStat::from).collect(),
        count_attribute: options.count_attribute.clone(),
        total_count: outcome.total_count,
        output,
        total_duration: start.elapsed(),
    })
}
