use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("File error: {0}.")]
    FileError(String),

    #[error("Failed to parse {file}: {reason}.")]
    ParseError { file: String, reason: String },

    #[error("Unsupported settings format: {0}.")]
    UnsupportedFormat(String),
}
