use crate::cd::cue::error::CueError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CdError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    #[error(transparent)]
    CueError(#[from] CueError),

    #[error("MDX image claims {total} bytes but its header alone is {header}")]
    MdxSizeOutOfRange { total: u64, header: u64 },

    #[error("Cue sheet has no tracks")]
    NoTracks,
}

pub type CdResult<T> = Result<T, CdError>;
