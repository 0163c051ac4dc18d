//! Remote-call bridge exposing OpenCV image operations to a host application.
//!
//! The host hands the bridge a [`Request`] (a method name plus untyped arguments). The
//! [`Bridge`] checks the host context, initializes the native library once, parses the
//! arguments into a typed [`Call`], runs exactly one primitive on an [`ImageBackend`] and
//! answers with a [`BridgeResponse`].
//!
//! ```no_run
//! use cv_bridge::{Bridge, BridgeConfig, OpenCvBackend, Request};
//!
//! let bridge = Bridge::new(OpenCvBackend::new(), BridgeConfig::default());
//! let response = bridge.dispatch(
//!     Request::new("medianBlur")
//!         .arg("pathType", 1)
//!         .arg("pathString", "photo.jpg")
//!         .arg("data", Vec::<u8>::new())
//!         .arg("kernelSize", 5),
//! );
//! println!("{}", response.as_str());
//! ```

mod backend;
mod bridge;
mod config;
mod error;
mod method;
mod params;
mod response;
mod source;
mod value;

#[cfg(feature = "opencv")]
mod opencv_backend;

pub use backend::ImageBackend;
pub use bridge::{Bridge, CaptureFlow, HostContext};
pub use config::BridgeConfig;
pub use error::{BridgeError, ConfigError, ErrorKind};
pub use method::Method;
pub use params::{
    AdaptiveThresholdParams, Anchor, BilateralFilterParams, BlurParams, BoxFilterParams, Call,
    ColorMapParams, CvtColorParams, DepthKernelParams, DerivativeParams, DistanceTransformParams,
    GaussianBlurParams, ImageCall, ImageOp, KernelSize, LaplacianParams, MedianBlurParams,
    MorphKernelParams, MorphologyExParams, PyrMeanShiftParams, ThresholdParams,
};
pub use response::{BridgeResponse, ErrorReport, Payload};
pub use source::{ImageSource, PathType, ReadMode};
pub use value::{Arguments, Request, Value};

#[cfg(feature = "opencv")]
pub use opencv_backend::{OpenCvBackend, OpenCvError};
