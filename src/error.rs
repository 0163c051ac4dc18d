use thiserror::Error;

type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Machine-readable failure classes surfaced to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// No usable foreground session; nothing else was attempted.
    ContextUnavailable,
    /// A required argument was missing or had the wrong shape.
    Argument,
    /// The native library failed to initialize, load, process or encode.
    Processing,
}

impl ErrorKind {
    /// The error code reported on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::ContextUnavailable => "no_activity",
            ErrorKind::Argument => "invalid_argument",
            ErrorKind::Processing => "OpenCV-Error",
        }
    }
}

/// Every failure a dispatched call can end in.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("{0} plugin requires a foreground activity.")]
    NoContext(String),

    #[error("missing required argument `{0}`")]
    MissingArgument(&'static str),

    #[error("argument `{name}` expected {expected}, found {found}")]
    InvalidArgument {
        name: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("unknown pathType {0}")]
    InvalidPathType(String),

    #[error("native image library failed to initialize: {source}")]
    Initialization {
        #[source]
        source: BoxedCause,
    },

    #[error("failed to load image from {origin}: {source}")]
    ImageLoad {
        origin: String,
        #[source]
        source: BoxedCause,
    },

    #[error("{method} failed: {source}")]
    Processing {
        method: &'static str,
        #[source]
        source: BoxedCause,
    },

    #[error("failed to store {method} result: {source}")]
    Encode {
        method: &'static str,
        #[source]
        source: BoxedCause,
    },
}

impl BridgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::NoContext(_) => ErrorKind::ContextUnavailable,
            BridgeError::MissingArgument(_)
            | BridgeError::InvalidArgument { .. }
            | BridgeError::InvalidPathType(_) => ErrorKind::Argument,
            BridgeError::Initialization { .. }
            | BridgeError::ImageLoad { .. }
            | BridgeError::Processing { .. }
            | BridgeError::Encode { .. } => ErrorKind::Processing,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}
