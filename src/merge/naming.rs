use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_SAVE_NAME: &str = "defaultSaveName";
pub const TOTAL_SUFFIX: &str = "TOTAL";

/// `run_0001.hdf5` -> `run`; `None` when the file name has no `_`.
fn run_prefix(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let (prefix, _) = name.rsplit_once('_')?;
    Some(prefix.to_string())
}

/// Output name for a merge of `files`, without extension.
///
/// All inputs sharing one non-empty prefix yields `<prefix>TOTAL`; anything else
/// falls back to [`DEFAULT_SAVE_NAME`].
pub fn default_save_name(files: &[PathBuf]) -> String {
    let prefixes: Option<BTreeSet<String>> = files.iter().map(|p| run_prefix(p)).collect();

    match prefixes {
        Some(set) if set.len() == 1 => match set.into_iter().next() {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}{TOTAL_SUFFIX}"),
            _ => DEFAULT_SAVE_NAME.to_string(),
        },
        Some(set) => {
            warn!(
                "input files do not share a single prefix ({} found), using {}",
                set.len(),
                DEFAULT_SAVE_NAME
            );
            DEFAULT_SAVE_NAME.to_string()
        }
        None => {
            warn!(
                "could not derive a save name from the input files, using {}",
                DEFAULT_SAVE_NAME
            );
            DEFAULT_SAVE_NAME.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn shared_prefix_gets_total_suffix() {
        assert_eq!(
            default_save_name(&paths(&["out/run_0001.hdf5", "out/run_0002.hdf5"])),
            "runTOTAL"
        );
        assert_eq!(
            default_save_name(&paths(&["neutron_1MeV_0001.hdf5", "neutron_1MeV_0002.hdf5"])),
            "neutron_1MeVTOTAL"
        );
    }

    #[test]
    fn no_shared_prefix_falls_back() {
        assert_eq!(
            default_save_name(&paths(&["alpha_1.hdf5", "beta_1.hdf5"])),
            DEFAULT_SAVE_NAME
        );
        assert_eq!(default_save_name(&paths(&["single.hdf5"])), DEFAULT_SAVE_NAME);
        assert_eq!(default_save_name(&paths(&["_1.hdf5", "_2.hdf5"])), DEFAULT_SAVE_NAME);
        assert_eq!(default_save_name(&[]), DEFAULT_SAVE_NAME);
    }
}
