use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("No data streams given")]
    NoDataStream,

    #[error("Expected {expected} channels, found {found}")]
    IncompatibleNumberOfChannels { expected: usize, found: usize },

    #[error("Unsupported sample width of {0} bytes")]
    UnsupportedSampleWidth(usize),
}

pub type TranscodeResult<T> = Result<T, TranscodeError>;
