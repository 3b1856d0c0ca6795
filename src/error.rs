use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("Invalid line pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid file glob: {0}")]
    Glob(#[from] glob::PatternError),
}

pub type Result<T> = std::result::Result<T, IndexError>;
