use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::attributes::AttributeSet;
use super::errors::MergeError;
use super::histogram::Histogram;

/// Extension used for simulation output files.
pub const OUTPUT_EXTENSION: &str = "hdf5";

/// Contents of one simulation output file: a flat attribute table plus named
/// histogram datasets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimFile {
    #[serde(default)]
    pub attributes: AttributeSet,
    #[serde(default)]
    pub histograms: Vec<Histogram>,
}

/// On-disk encoding of [`SimFile`].
pub trait ContainerFormat: Sync {
    fn read(&self, path: &Path) -> Result<SimFile, MergeError>;
    fn write(&self, path: &Path, file: &SimFile) -> Result<(), MergeError>;

    fn extension(&self) -> &str {
        OUTPUT_EXTENSION
    }
}

/// Stores the container as pretty-printed JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonContainer;

impl ContainerFormat for JsonContainer {
    fn read(&self, path: &Path) -> Result<SimFile, MergeError> {
        let text = fs::read_to_string(path).map_err(|e| {
            MergeError::FileError(format!("failed to open file {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&text).map_err(|e| MergeError::DecodeError {
            file: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn write(&self, path: &Path, file: &SimFile) -> Result<(), MergeError> {
        let text = serde_json::to_string_pretty(file).map_err(|e| MergeError::EncodeError {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;
        fs::write(path, text).map_err(|e| {
            MergeError::FileError(format!("failed to write {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::attributes::AttrValue;

    #[test]
    fn written_file_reads_back() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("run_0001.hdf5");

        let mut file = SimFile::default();
        file.attributes.insert("nIons".into(), AttrValue::Int(100));
        file.histograms.push(Histogram::new("edep", 0.1, 10.0, 4, true));

        JsonContainer.write(&path, &file).unwrap();
        assert_eq!(JsonContainer.read(&path).unwrap(), file);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.hdf5");
        std::fs::write(&path, "\u{89}HDF\r\n").unwrap();
        assert!(matches!(
            JsonContainer.read(&path),
            Err(MergeError::DecodeError { .. })
        ));
        assert!(matches!(
            JsonContainer.read(&tmp.path().join("absent.hdf5")),
            Err(MergeError::FileError(_))
        ));
    }
}
