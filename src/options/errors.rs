use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptionError {
    #[error(transparent)]
    Clap(#[from] clap::Error),

    #[error("Option '{0}' was not registered.")]
    UnknownOption(String),

    #[error("Option '{name}' holds a {found} value, expected {expected}.")]
    WrongKind {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Save directory error: {0}.")]
    SaveDirError(String),
}
