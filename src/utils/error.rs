use std::error::Error;
use std::fmt;
use std::io;

/// Common result type for chmsite operations
pub type BoxResult<T> = Result<T, Box<dyn Error>>;

/// Error types for chmsite operations
#[derive(Debug)]
pub enum ChmError {
    /// IO error wrapper
    Io(io::Error),
    /// Configuration error
    Config(String),
    /// No candidate encoding could decode a file
    Decode(String),
    /// Table of contents could not be read
    Toc(String),
    /// Page skeleton rendering error
    Template(String),
    /// Content document rewrite error
    Transform(String),
    /// Archive decompression error
    Extract(String),
    /// Generic error message
    Generic(String),
}

impl fmt::Display for ChmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChmError::Io(err) => write!(f, "IO error: {}", err),
            ChmError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ChmError::Decode(msg) => write!(f, "Decode error: {}", msg),
            ChmError::Toc(msg) => write!(f, "Table of contents error: {}", msg),
            ChmError::Template(msg) => write!(f, "Template error: {}", msg),
            ChmError::Transform(msg) => write!(f, "Transform error: {}", msg),
            ChmError::Extract(msg) => write!(f, "Extraction error: {}", msg),
            ChmError::Generic(msg) => write!(f, "{}", msg),
        }
    }
}

impl Error for ChmError {}

impl From<io::Error> for ChmError {
    fn from(err: io::Error) -> Self {
        ChmError::Io(err)
    }
}

impl From<String> for ChmError {
    fn from(msg: String) -> Self {
        ChmError::Generic(msg)
    }
}

impl From<&str> for ChmError {
    fn from(msg: &str) -> Self {
        ChmError::Generic(msg.to_string())
    }
}
