use crate::fat::error::FatError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AkaiError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    #[error(transparent)]
    FatError(#[from] FatError),

    #[error("Byte 0x{0:02X} is not an AKAI character")]
    InvalidCharacter(u8),

    #[error("Character {0:?} has no AKAI encoding")]
    UnencodableCharacter(char),

    #[error("Unknown {kind} 0x{value:02X}")]
    UnknownEnumValue { kind: &'static str, value: u8 },

    #[error("No AKAI partition found")]
    NoPartitions,
}

pub type AkaiResult<T> = Result<T, AkaiError>;
