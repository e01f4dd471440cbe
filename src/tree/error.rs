use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("The entity \"{token}\" was not found in \"{resolved}\".")]
    InvalidPath { token: String, resolved: String },

    #[error("\"{0}\" has no children")]
    NotTraversable(String),

    #[error("Could not determine a unique name for \"{0}\"")]
    CouldNotDetermineName(String),

    #[error("Could not read the contents of \"{name}\": {reason}")]
    RealizationFailed { name: String, reason: String },
}

pub type TreeResult<T> = Result<T, TreeError>;
