use crate::transcoder::error::TranscodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WavError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    #[error(transparent)]
    TranscodeError(#[from] TranscodeError),

    #[error("Sample \"{0}\" has no data stream")]
    NoDataStream(String),

    #[error("Data chunk of {0} bytes does not fit in a RIFF file")]
    DataTooLarge(u64),
}

pub type WavResult<T> = Result<T, WavError>;
