use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::errors::MergeError;
use crate::options::{OptionKind, OptionSet, OptionValue, ParsedOptions, SAVE_DIR};
use crate::settings::MergeSettings;

/// The merger's options on top of the standard simulation options.
pub fn merge_option_set(settings: &MergeSettings) -> OptionSet {
    let mut set = OptionSet::new("simbatch merge");
    set.add_simulation_defaults();
    set.add_array_option(
        "files",
        OptionKind::Str,
        vec![OptionValue::Str("*.hdf5".to_string())],
        "Output files to merge: wildcard patterns or explicit paths",
    );
    set.add_str_option("saveName", "", "Name of the combined file (without extension)");
    set.add_bool_option(
        "skipGFU",
        false,
        "Skip the check that the consistency attribute matches across files",
    );
    set.add_str_option(
        "consistencyAttr",
        &settings.consistency_attribute,
        "Attribute that must be identical in every input file",
    );
    set.add_str_option(
        "countAttr",
        &settings.count_attribute,
        "Attribute summed across inputs to give the total particle count",
    );
    set.add_bool_option(
        "skipIncompatible",
        false,
        "Skip files whose histograms do not match instead of failing",
    );
    set
}

#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub files: Vec<String>,
    pub save_name: Option<String>,
    pub save_dir: PathBuf,
    pub check_consistency: bool,
    pub consistency_attribute: String,
    pub count_attribute: String,
    pub skip_incompatible: bool,
}

impl MergeOptions {
    pub fn new(files: Vec<String>, save_dir: impl Into<PathBuf>) -> Self {
        let settings = MergeSettings::default();
        Self {
            files,
            save_name: None,
            save_dir: save_dir.into(),
            check_consistency: true,
            consistency_attribute: settings.consistency_attribute,
            count_attribute: settings.count_attribute,
            skip_incompatible: false,
        }
    }

    pub fn from_parsed(parsed: &ParsedOptions, settings: &MergeSettings) -> Result<Self, MergeError> {
        let save_name = match parsed.get_str("saveName")? {
            "" => None,
            name => Some(name.to_string()),
        };

        let save_dir = parsed.get_str(SAVE_DIR)?;
        let save_dir = if is_default_output_dir(save_dir) {
            remove_if_empty(Path::new(save_dir));
            PathBuf::from(&settings.output_dir)
        } else {
            PathBuf::from(save_dir)
        };

        Ok(Self {
            files: parsed.get_strings("files")?,
            save_name,
            save_dir,
            check_consistency: !parsed.get_bool("skipGFU")?,
            consistency_attribute: parsed.get_str("consistencyAttr")?.to_string(),
            count_attribute: parsed.get_str("countAttr")?.to_string(),
            skip_incompatible: parsed.get_bool("skipIncompatible")?,
        })
    }
}

/// Whether `dir` is the `outputData/` directory created in the working directory
/// by option validation.
fn is_default_output_dir(dir: &str) -> bool {
    let dir = Path::new(dir.trim_end_matches('/'));
    if dir == Path::new("outputData") {
        return true;
    }
    std::env::current_dir()
        .map(|cwd| dir == cwd.join("outputData"))
        .unwrap_or(false)
}

fn remove_if_empty(dir: &Path) {
    let empty = fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false);
    if empty && fs::remove_dir(dir).is_ok() {
        debug!("removed empty directory {}", dir.display());
    }
}
