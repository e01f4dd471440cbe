use crate::fat::error::FatError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RolandError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    #[error(transparent)]
    FatError(#[from] FatError),

    #[error("ID area does not look like a Roland S-7xx disk")]
    NotRolandImage,

    #[error("Bad FAT identifier 0x{0:04X}")]
    BadFatId(u16),

    #[error("Unknown FAT version flag 0x{0:04X}")]
    UnknownFatVersion(u16),

    #[error("Name {0:?} is not ASCII")]
    NonAsciiName(Vec<u8>),

    #[error("{kind} index {index} is out of range")]
    IndexOutOfRange { kind: &'static str, index: i32 },

    #[error("{kind} {index} is unused")]
    UnusedEntry { kind: &'static str, index: u16 },

    #[error("Unknown sampling frequency selector {0}")]
    UnknownSamplingFrequency(u8),
}

pub type RolandResult<T> = Result<T, RolandError>;
