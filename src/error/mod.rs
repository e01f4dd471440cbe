use crate::akai::error::AkaiError;
use crate::cd::cue::error::CueError;
use crate::cd::error::CdError;
use crate::fat::error::FatError;
use crate::roland::error::RolandError;
use crate::stream::error::StreamError;
use crate::transcoder::error::TranscodeError;
use crate::tree::error::TreeError;
use crate::wav::error::WavError;
use std::result;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SamplerRipError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error(transparent)]
    Fat(#[from] FatError),

    #[error(transparent)]
    Akai(#[from] AkaiError),

    #[error(transparent)]
    Roland(#[from] RolandError),

    #[error(transparent)]
    Cd(#[from] CdError),

    #[error(transparent)]
    Cue(#[from] CueError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    #[error(transparent)]
    Wav(#[from] WavError),
}

pub type SamplerRipResult<T> = result::Result<T, SamplerRipError>;
