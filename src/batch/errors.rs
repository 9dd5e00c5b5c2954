use thiserror::Error;

use crate::options::OptionError;
use crate::settings::SettingsError;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Option(#[from] OptionError),

    #[error(transparent)]
    Parameters(#[from] SettingsError),

    #[error("No executable given; usage: submit [batch options] <executable> [executable options].")]
    MissingExecutable,

    #[error("Unrecognized batch option before the executable: {0}.")]
    UnexpectedOption(String),

    #[error("Invalid batch parameter: {0}.")]
    InvalidParameter(String),

    #[error("Cannot create directory for run data, {0} exists and is a file.")]
    RunNameCollision(String),

    #[error("File error: {0}.")]
    FileError(String),

    #[error("Failed to serialize batch variables: {0}.")]
    SerializeError(String),

    #[error("Job submission failed: {0}.")]
    SubmitFailed(String),

    #[error("{source} ({submitted} job(s) already submitted, cancel them with {kill_file})")]
    PartiallySubmitted {
        submitted: usize,
        kill_file: String,
        #[source]
        source: Box<BatchError>,
    },
}
