use crate::{params::ImageOp, source::ReadMode};
use std::path::Path;

/// The native image library the bridge forwards to.
///
/// Implementors own image decoding, encoding and the primitives themselves; the bridge only
/// routes, marshals and reports. Every method is a single synchronous call and must release
/// whatever it allocates before returning, on success or failure.
pub trait ImageBackend {
    /// Decoded in-memory image matrix.
    type Image;
    /// The error type that can be returned by the native library.
    type Error: std::error::Error + Send + Sync + 'static;

    /// One-time process initialization. Called until it first succeeds.
    fn initialize(&self) -> Result<(), Self::Error>;

    /// The native library's version string.
    fn version(&self) -> Result<String, Self::Error>;

    /// Reads and decodes an image file.
    fn read(&self, path: &Path, mode: ReadMode) -> Result<Self::Image, Self::Error>;

    /// Decodes an encoded image buffer.
    fn decode(&self, data: &[u8], mode: ReadMode) -> Result<Self::Image, Self::Error>;

    /// Applies exactly one primitive and returns its output.
    fn apply(&self, image: &Self::Image, op: &ImageOp) -> Result<Self::Image, Self::Error>;

    /// Encodes an image into the format implied by `extension` (e.g. `.png`).
    fn encode(&self, image: &Self::Image, extension: &str) -> Result<Vec<u8>, Self::Error>;

    /// Whether [`write`](Self::write) has an encoder for `extension` (e.g. `.jpg`).
    fn can_write(&self, extension: &str) -> bool;

    /// Encodes and writes an image; the format follows the path's extension.
    fn write(&self, path: &Path, image: &Self::Image) -> Result<(), Self::Error>;
}
