use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error(transparent)]
    IoError(#[from] io::Error),

    #[error("Wanted {wanted} bytes, read {read}")]
    SectorReadError { wanted: usize, read: usize },

    #[error("Offset {offset} is not aligned to the sample width {sample_width}")]
    BadAlign { offset: u64, sample_width: usize },

    #[error("Read size {size} is not a multiple of the sample width {sample_width}")]
    BadReadSize { size: usize, sample_width: usize },
}

impl StreamError {
    /// Wraps the error so it can travel through `std::io::Read`/`Seek`.
    pub fn into_io(self) -> io::Error {
        let kind = match &self {
            StreamError::IoError(err) => err.kind(),
            StreamError::SectorReadError { .. } => io::ErrorKind::UnexpectedEof,
            StreamError::BadAlign { .. } | StreamError::BadReadSize { .. } => {
                io::ErrorKind::InvalidInput
            }
        };
        io::Error::new(kind, self)
    }

    /// Recovers a stream error previously wrapped by [`StreamError::into_io`].
    pub fn from_io(err: &io::Error) -> Option<&StreamError> {
        err.get_ref()
            .and_then(|inner| inner.downcast_ref::<StreamError>())
    }

    pub fn is_sector_read_error(err: &io::Error) -> bool {
        matches!(
            Self::from_io(err),
            Some(StreamError::SectorReadError { .. })
        )
    }
}

pub type StreamResult<T> = Result<T, StreamError>;
