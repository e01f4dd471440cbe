use thiserror::Error;

#[derive(Debug, Error)]
pub enum CueError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("Not a text file")]
    NotText,

    #[error("No FILE entry")]
    NoFileEntry,

    #[error("Unknown track type: {0}")]
    InvalidTrackType(String),

    #[error("Invalid MSF format: {0}")]
    InvalidMSFFormat(String),

    #[error(transparent)]
    ParseIntError(#[from] std::num::ParseIntError),
}

pub type CueResult<T> = Result<T, CueError>;
