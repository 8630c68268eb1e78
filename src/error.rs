use std::fmt;

/// Every failure kind the library can surface, per the error handling design:
/// each one propagates immediately to the caller and is never retried internally.
#[derive(Debug)]
pub enum ErrorKind {
    StoreMissing,
    StoreOpenFailed,
    AlreadyOpenForWrite,
    DocIdTooLarge,
    DupDoc,
    StopwordFileOpenFailed,
    StopwordsInReadMode,
    StopwordAfterWrite,
    CorruptValue,
    BadRegex,
    Io,
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: impl Into<String>) -> Self {
        Error { kind, context: context.into() }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.context)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::new(ErrorKind::Io, err.to_string())
    }
}

impl From<heed::Error> for Error {
    fn from(err: heed::Error) -> Self {
        Error::new(ErrorKind::StoreOpenFailed, err.to_string())
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::new(ErrorKind::BadRegex, err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
