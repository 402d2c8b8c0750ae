use crate::http::Method;

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the crate
#[derive(Debug)]
pub enum Error {
    /// A handler exposes a verb entry point but carries no attached metadata
    MissingAnnotation { handler: String, method: Method },
    /// Attached metadata lacks both `response` and `responses` after normalization
    MissingResponseShape { handler: String, method: Method },
    /// Malformed setup call, fails fast at startup
    Configuration(String),
    Serialization(String),
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::MissingAnnotation { handler, method } => {
                write!(f, "missing swagger annotation for {}.on_{}()", handler, method)
            }
            Error::MissingResponseShape { handler, method } => {
                write!(f, "missing required response info for {}.on_{}()", handler, method)
            }
            Error::Configuration(msg) => write!(f, "configuration error: {}", msg),
            Error::Serialization(msg) => write!(f, "serialization error: {}", msg),
            Error::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON serialization error: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialization(format!("YAML serialization error: {}", err))
    }
}
