use crate::{error::BridgeError, value::Arguments};
use std::path::PathBuf;

/// Discriminates how the caller supplied the source image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathType {
    /// `pathString` names a file on the local filesystem.
    File,
    /// `data` holds an encoded image (png, jpeg, ...).
    Bytes,
}

impl PathType {
    /// Accepts the wire integers `1` / `2` or the names `FILE` / `BYTES`.
    pub fn from_arguments(args: &Arguments) -> Result<Self, BridgeError> {
        if let Ok(name) = args.str("pathType") {
            return match name.to_ascii_uppercase().as_str() {
                "FILE" => Ok(PathType::File),
                "BYTES" => Ok(PathType::Bytes),
                _ => Err(BridgeError::InvalidPathType(name.to_string())),
            };
        }
        match args.int("pathType")? {
            1 => Ok(PathType::File),
            2 => Ok(PathType::Bytes),
            other => Err(BridgeError::InvalidPathType(other.to_string())),
        }
    }
}

/// How the backend should decode the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadMode {
    /// Three-channel BGR.
    Color,
    /// Single-channel 8-bit.
    Grayscale,
}

/// The image a call operates on. Built per call and consumed by it.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl ImageSource {
    /// Reads `pathType`, `pathString` and `data`. All three must be present; the tag decides
    /// which of the other two is used.
    pub fn from_arguments(args: &Arguments) -> Result<Self, BridgeError> {
        let path_type = PathType::from_arguments(args)?;
        let path = args.str("pathString")?;
        let data = args.bytes("data")?;
        Ok(match path_type {
            PathType::File => ImageSource::Path(PathBuf::from(path)),
            PathType::Bytes => ImageSource::Bytes(data.to_vec()),
        })
    }

    /// Human-readable origin for error messages.
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Bytes(data) => format!("{}-byte buffer", data.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn args(path_type: impl Into<Value>) -> Arguments {
        let mut args = Arguments::new();
        args.insert("pathType", path_type);
        args.insert("pathString", "/tmp/in.png");
        args.insert("data", vec![1u8, 2, 3]);
        args
    }

    #[test]
    fn tag_selects_the_source() {
        assert_eq!(
            ImageSource::from_arguments(&args(1)).unwrap(),
            ImageSource::Path(PathBuf::from("/tmp/in.png"))
        );
        assert_eq!(
            ImageSource::from_arguments(&args("bytes")).unwrap(),
            ImageSource::Bytes(vec![1, 2, 3])
        );
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert!(matches!(
            ImageSource::from_arguments(&args(7)),
            Err(BridgeError::InvalidPathType(tag)) if tag == "7"
        ));
    }

    #[test]
    fn unused_field_is_still_required() {
        let mut partial = Arguments::new();
        partial.insert("pathType", 2);
        partial.insert("data", vec![0u8]);
        assert!(matches!(
            ImageSource::from_arguments(&partial),
            Err(BridgeError::MissingArgument("pathString"))
        ));
    }
}
