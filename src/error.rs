use thiserror::Error;

use crate::batch::errors::BatchError;
use crate::merge::errors::MergeError;
use crate::options::OptionError;
use crate::settings::errors::SettingsError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Option(#[from] OptionError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    Merge(#[from] MergeError),
}

impl SimError {
    /// The clap error underneath, if option parsing is what failed.
    pub fn clap_error(&self) -> Option<&clap::Error> {
        match self {
            SimError::Option(OptionError::Clap(e))
            | SimError::Batch(BatchError::Option(OptionError::Clap(e)))
            | SimError::Merge(MergeError::Option(OptionError::Clap(e))) => Some(e),
            _ => None,
        }
    }
}
