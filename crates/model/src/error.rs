use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid watermark value '{0}': expected an integer")]
    InvalidWatermark(String),

    #[error("Unknown checkpoint status '{0}'")]
    UnknownStatus(String),
}
