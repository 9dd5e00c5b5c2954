//! Combines the histogram outputs of parallel simulation runs into one file.

pub mod args;
pub mod attributes;
pub mod container;
pub mod errors;
pub mod histogram;
pub mod naming;
pub mod select;

use std::path::PathBuf;
use tracing::{info, warn};

use args::MergeOptions;
use attributes::{AttrValue, check_consistency, derive_attributes, sum_attribute};
use container::SimFile;
use errors::MergeError;
use histogram::HistogramSet;

/// Result of merging already-loaded files.
#[derive(Debug)]
pub struct MergeOutcome {
    pub file: SimFile,
    pub merged: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub total_count: AttrValue,
}

/// Merges `inputs` in the given order.
///
/// The first merged file supplies the attributes and the reference value for the
/// consistency check; the count attribute is replaced by its sum over every merged
/// file. Files skipped as incompatible take part in neither.
pub fn merge_contents(
    inputs: &[(PathBuf, SimFile)],
    options: &MergeOptions,
) -> Result<MergeOutcome, MergeError> {
    let mut set = HistogramSet::new();
    let mut merged: Vec<&(PathBuf, SimFile)> = Vec::with_capacity(inputs.len());
    let mut skipped = Vec::new();

    for input in inputs {
        let (path, file) = input;
        match set.accumulate(&file.histograms) {
            Ok(()) => merged.push(input),
            Err(e) if options.skip_incompatible && e.is_incompatible() => {
                warn!("skipping {}: {}", path.display(), e);
                skipped.push(path.clone());
            }
            Err(e) => return Err(e.in_file(&path.display().to_string())),
        }
    }

    let Some((_, source)) = merged.first() else {
        return Err(MergeError::AllFilesSkipped);
    };

    // Only files that made it into the merge are held to the first merged file's value.
    if options.check_consistency {
        check_consistency(
            &options.consistency_attribute,
            merged.iter().map(|(path, file)| (path, &file.attributes)),
        )?;
    }

    let total_count = sum_attribute(
        &options.count_attribute,
        merged.iter().map(|(path, file)| (path, &file.attributes)),
    )?;
    let attributes = derive_attributes(
        &source.attributes,
        &options.count_attribute,
        total_count.clone(),
    );

    info!(
        "merged {} file(s) into {} histogram(s), {} = {}",
        merged.len(),
        set.len(),
        options.count_attribute,
        total_count
    );

    Ok(MergeOutcome {
        file: SimFile {
            attributes,
            histograms: set.into_vec(),
        },
        merged: merged.into_iter().map(|(path, _)| path.clone()).collect(),
        skipped,
        total_count,
    })
}
