use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneralizedError {
    #[error("Could not parse note \"{0}\"")]
    InvalidMidiNote(String),
}

pub type GeneralizedResult<T> = Result<T, GeneralizedError>;
