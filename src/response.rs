use crate::error::{BridgeError, ErrorKind};
use std::error::Error as _;
use std::path::PathBuf;

/// What a successful call hands back to the host.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Encoded image for byte-buffer sources.
    Bytes(Vec<u8>),
    /// Location of the written image for path sources.
    Path(PathBuf),
    /// Scalar text result, such as the library version.
    Text(String),
}

/// The structured failure triple reported to the host.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub code: &'static str,
    pub message: String,
    pub cause: Option<String>,
}

impl ErrorReport {
    pub fn from_error(platform: &str, error: &BridgeError) -> Self {
        let kind = error.kind();
        Self {
            kind,
            code: kind.code(),
            message: format!("{platform}: {error}"),
            cause: error.source().map(|source| source.to_string()),
        }
    }
}

/// Outcome of a dispatched call.
#[derive(Clone, Debug, PartialEq)]
pub enum BridgeResponse {
    Success(Payload),
    Error(ErrorReport),
    /// The method name is not one the bridge knows.
    NotImplemented,
}

impl BridgeResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, BridgeResponse::Success(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BridgeResponse::Success(_) => "success",
            BridgeResponse::Error(_) => "error",
            BridgeResponse::NotImplemented => "not_implemented",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_embeds_platform_and_cause() {
        let error = BridgeError::Processing {
            method: "blur",
            source: "ksize.width > 0".into(),
        };
        let report = ErrorReport::from_error("android", &error);
        assert_eq!(report.code, "OpenCV-Error");
        assert_eq!(report.message, "android: blur failed: ksize.width > 0");
        assert_eq!(report.cause.as_deref(), Some("ksize.width > 0"));
    }

    #[test]
    fn context_and_argument_codes_are_distinct() {
        let no_context = ErrorReport::from_error("linux", &BridgeError::NoContext("cv".into()));
        let missing = ErrorReport::from_error("linux", &BridgeError::MissingArgument("data"));
        assert_eq!(no_context.code, "no_activity");
        assert_eq!(missing.code, "invalid_argument");
        assert_eq!(no_context.cause, None);
        assert_ne!(no_context.code, ErrorKind::Processing.code());
    }
}
