use thiserror::Error;

use crate::options::OptionError;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error(transparent)]
    Option(#[from] OptionError),

    #[error("No input files matched {0}.")]
    NoInputFiles(String),

    #[error("Invalid file pattern '{pattern}': {reason}.")]
    InvalidPattern { pattern: String, reason: String },

    #[error("File error: {0}.")]
    FileError(String),

    #[error("Failed to decode {file}: {reason}.")]
    DecodeError { file: String, reason: String },

    #[error("Failed to encode {file}: {reason}.")]
    EncodeError { file: String, reason: String },

    #[error("Histogram '{name}' is binned as {found}, expected {expected}.")]
    IncompatibleHistogram {
        name: String,
        expected: String,
        found: String,
    },

    #[error("Histogram '{name}' is malformed: {reason}.")]
    InvalidHistogram { name: String, reason: String },

    #[error(
        "Attribute '{attribute}' differs between files: {first_file} has {first_value}, {file} has {value}."
    )]
    AttributeMismatch {
        attribute: String,
        first_file: String,
        first_value: String,
        file: String,
        value: String,
    },

    #[error("Attribute '{attribute}' is missing from {file}.")]
    MissingAttribute { attribute: String, file: String },

    #[error("Attribute '{attribute}' in {file} is not numeric: {value}.")]
    NonNumericAttribute {
        attribute: String,
        file: String,
        value: String,
    },

    #[error("Every input file was skipped; nothing to merge.")]
    AllFilesSkipped,

    #[error("While merging '{file}': {source}")]
    InFile {
        file: String,
        #[source]
        source: Box<MergeError>,
    },
}

impl MergeError {
    pub fn in_file(self, file: &str) -> Self {
        MergeError::InFile {
            file: file.to_string(),
            source: Box::new(self),
        }
    }

    /// Whether the error is a binning conflict, which the skip policy tolerates.
    pub fn is_incompatible(&self) -> bool {
        match self {
            MergeError::IncompatibleHistogram { .. } => true,
            MergeError::InFile { source, .. } => source.is_incompatible(),
            _ => false,
        }
    }
}
