use thiserror::Error;

#[derive(Debug, Error)]
pub enum FatError {
    #[error("Requested sector {sector} is outside of the allocation table (size {size})")]
    InvalidSector { sector: u32, size: usize },

    #[error("Broken FAT, chain starting at sector {start} is cyclic or oversized")]
    BrokenFat { start: u32 },

    #[error("Encountered the error flag at FAT entry {sector}")]
    ErrorFlag { sector: u32 },

    #[error("Unexpected {flag} at FAT entry {sector} inside a chain")]
    UnexpectedFlag { flag: &'static str, sector: u32 },
}

pub type FatResult<T> = Result<T, FatError>;
