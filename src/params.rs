//! Typed parameters for every image operation.
//!
//! Each struct is parsed from the untyped [`Arguments`] of a request. Opcode-like fields
//! (depths, border modes, threshold types, color codes, ...) are OpenCV's own integer
//! enumerations and are passed through unmodified.

use crate::{
    error::BridgeError,
    method::Method,
    source::{ImageSource, ReadMode},
    value::Arguments,
};

/// Width/height of a sliding-window operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KernelSize {
    pub width: i32,
    pub height: i32,
}

impl KernelSize {
    fn from_arguments(args: &Arguments) -> Result<Self, BridgeError> {
        let (width, height) = args.int_pair("kernelSize")?;
        Ok(Self { width, height })
    }
}

/// Anchor position inside a kernel; `(-1, -1)` means the kernel center.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Anchor {
    pub x: i32,
    pub y: i32,
}

impl Anchor {
    fn from_arguments(args: &Arguments) -> Result<Self, BridgeError> {
        let (x, y) = args.int_pair("anchorPoint")?;
        Ok(Self { x, y })
    }
}

/// `bilateralFilter` parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct BilateralFilterParams {
    /// Pixel neighborhood diameter; non-positive derives it from `sigma_space`.
    pub diameter: i32,
    pub sigma_color: f64,
    pub sigma_space: f64,
    /// `cv::BorderTypes`.
    pub border_type: i32,
}

/// `blur` parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct BlurParams {
    pub kernel_size: KernelSize,
    pub anchor: Anchor,
    /// `cv::BorderTypes`.
    pub border_type: i32,
}

/// `boxFilter` parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxFilterParams {
    /// Output depth (`CV_8U`, `CV_16S`, ...); `-1` keeps the source depth.
    pub output_depth: i32,
    pub kernel_size: KernelSize,
    pub anchor: Anchor,
    /// Divide by the kernel area.
    pub normalize: bool,
    /// `cv::BorderTypes`.
    pub border_type: i32,
}

/// Shared by `dilate` and `erode`.
#[derive(Clone, Debug, PartialEq)]
pub struct MorphKernelParams {
    pub kernel_size: KernelSize,
}

/// Shared by `filter2D` and `sqrBoxFilter`.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthKernelParams {
    /// Output depth; `-1` keeps the source depth.
    pub output_depth: i32,
    pub kernel_size: KernelSize,
}

/// `gaussianBlur` parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianBlurParams {
    /// Both sides odd and positive, or zero to derive from `sigma_x`.
    pub kernel_size: KernelSize,
    pub sigma_x: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LaplacianParams {
    /// Output depth; `-1` keeps the source depth.
    pub depth: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MedianBlurParams {
    /// Odd aperture side, greater than 1.
    pub kernel_size: i32,
}

/// `morphologyEx` parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct MorphologyExParams {
    /// `cv::MorphTypes`.
    pub operation: i32,
    pub kernel_size: KernelSize,
}

/// `pyrMeanShiftFiltering` parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct PyrMeanShiftParams {
    pub spatial_window_radius: f64,
    pub color_window_radius: f64,
}

/// Shared by `scharr` and `sobel`.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivativeParams {
    /// Output depth; `-1` keeps the source depth.
    pub depth: i32,
    /// Derivative order in x.
    pub dx: i32,
    /// Derivative order in y.
    pub dy: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ColorMapParams {
    /// `cv::ColormapTypes`.
    pub color_map: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CvtColorParams {
    /// `cv::ColorConversionCodes`.
    pub output_type: i32,
}

/// `adaptiveThreshold` parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct AdaptiveThresholdParams {
    pub max_value: f64,
    /// `cv::AdaptiveThresholdTypes`.
    pub adaptive_method: i32,
    /// `THRESH_BINARY` or `THRESH_BINARY_INV`.
    pub threshold_type: i32,
    /// Odd neighborhood side.
    pub block_size: i32,
    /// Subtracted from the neighborhood mean.
    pub constant_value: f64,
}

/// `distanceTransform` parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceTransformParams {
    /// `cv::DistanceTypes`.
    pub distance_type: i32,
    /// `cv::DistanceTransformMasks` (3, 5 or 0 for precise).
    pub mask_size: i32,
}

/// `threshold` parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdParams {
    pub threshold_value: f64,
    pub max_threshold_value: f64,
    /// `cv::ThresholdTypes`.
    pub threshold_type: i32,
}

/// One external image primitive together with its parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageOp {
    BilateralFilter(BilateralFilterParams),
    Blur(BlurParams),
    BoxFilter(BoxFilterParams),
    Dilate(MorphKernelParams),
    Erode(MorphKernelParams),
    Filter2D(DepthKernelParams),
    GaussianBlur(GaussianBlurParams),
    Laplacian(LaplacianParams),
    MedianBlur(MedianBlurParams),
    MorphologyEx(MorphologyExParams),
    PyrMeanShiftFiltering(PyrMeanShiftParams),
    Scharr(DerivativeParams),
    Sobel(DerivativeParams),
    SqrBoxFilter(DepthKernelParams),
    ApplyColorMap(ColorMapParams),
    CvtColor(CvtColorParams),
    AdaptiveThreshold(AdaptiveThresholdParams),
    DistanceTransform(DistanceTransformParams),
    Threshold(ThresholdParams),
}

impl ImageOp {
    pub fn method(&self) -> Method {
        match self {
            ImageOp::BilateralFilter(_) => Method::BilateralFilter,
            ImageOp::Blur(_) => Method::Blur,
            ImageOp::BoxFilter(_) => Method::BoxFilter,
            ImageOp::Dilate(_) => Method::Dilate,
            ImageOp::Erode(_) => Method::Erode,
            ImageOp::Filter2D(_) => Method::Filter2D,
            ImageOp::GaussianBlur(_) => Method::GaussianBlur,
            ImageOp::Laplacian(_) => Method::Laplacian,
            ImageOp::MedianBlur(_) => Method::MedianBlur,
            ImageOp::MorphologyEx(_) => Method::MorphologyEx,
            ImageOp::PyrMeanShiftFiltering(_) => Method::PyrMeanShiftFiltering,
            ImageOp::Scharr(_) => Method::Scharr,
            ImageOp::Sobel(_) => Method::Sobel,
            ImageOp::SqrBoxFilter(_) => Method::SqrBoxFilter,
            ImageOp::ApplyColorMap(_) => Method::ApplyColorMap,
            ImageOp::CvtColor(_) => Method::CvtColor,
            ImageOp::AdaptiveThreshold(_) => Method::AdaptiveThreshold,
            ImageOp::DistanceTransform(_) => Method::DistanceTransform,
            ImageOp::Threshold(_) => Method::Threshold,
        }
    }

    /// Adaptive thresholding and distance transforms only accept single-channel input.
    pub fn read_mode(&self) -> ReadMode {
        match self {
            ImageOp::AdaptiveThreshold(_) | ImageOp::DistanceTransform(_) => ReadMode::Grayscale,
            _ => ReadMode::Color,
        }
    }
}

/// A fully marshaled image call.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageCall {
    pub source: ImageSource,
    pub op: ImageOp,
}

/// A fully marshaled call that the bridge can execute itself.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    GetVersion,
    Image(ImageCall),
}

impl Call {
    /// Parses the arguments required by `method`.
    ///
    /// `edge_detect` is never marshaled here; the router hands it to the capture flow
    /// untouched, so asking for it is reported as an invalid request.
    pub fn parse(method: Method, args: &Arguments) -> Result<Self, BridgeError> {
        let op = match method {
            Method::GetVersion => return Ok(Call::GetVersion),
            Method::EdgeDetect => {
                return Err(BridgeError::InvalidArgument {
                    name: "method",
                    expected: "an image method",
                    found: method.as_str().to_string(),
                });
            }
            Method::BilateralFilter => ImageOp::BilateralFilter(BilateralFilterParams {
                diameter: args.int("diameter")?,
                sigma_color: args.float("sigmaColor")?,
                sigma_space: args.float("sigmaSpace")?,
                border_type: args.int("borderType")?,
            }),
            Method::Blur => ImageOp::Blur(BlurParams {
                kernel_size: KernelSize::from_arguments(args)?,
                anchor: Anchor::from_arguments(args)?,
                border_type: args.int("borderType")?,
            }),
            Method::BoxFilter => ImageOp::BoxFilter(BoxFilterParams {
                output_depth: args.int("outputDepth")?,
                kernel_size: KernelSize::from_arguments(args)?,
                anchor: Anchor::from_arguments(args)?,
                normalize: args.bool("normalize")?,
                border_type: args.int("borderType")?,
            }),
            Method::Dilate => ImageOp::Dilate(MorphKernelParams {
                kernel_size: KernelSize::from_arguments(args)?,
            }),
            Method::Erode => ImageOp::Erode(MorphKernelParams {
                kernel_size: KernelSize::from_arguments(args)?,
            }),
            Method::Filter2D => ImageOp::Filter2D(DepthKernelParams {
                output_depth: args.int("outputDepth")?,
                kernel_size: KernelSize::from_arguments(args)?,
            }),
            Method::GaussianBlur => ImageOp::GaussianBlur(GaussianBlurParams {
                kernel_size: KernelSize::from_arguments(args)?,
                sigma_x: args.float("sigmaX")?,
            }),
            Method::Laplacian => ImageOp::Laplacian(LaplacianParams {
                depth: args.int("depth")?,
            }),
            Method::MedianBlur => ImageOp::MedianBlur(MedianBlurParams {
                kernel_size: args.int("kernelSize")?,
            }),
            Method::MorphologyEx => ImageOp::MorphologyEx(MorphologyExParams {
                operation: args.int("operation")?,
                kernel_size: KernelSize::from_arguments(args)?,
            }),
            Method::PyrMeanShiftFiltering => ImageOp::PyrMeanShiftFiltering(PyrMeanShiftParams {
                spatial_window_radius: args.float("spatialWindowRadius")?,
                color_window_radius: args.float("colorWindowRadius")?,
            }),
            Method::Scharr => ImageOp::Scharr(DerivativeParams::from_arguments(args)?),
            Method::Sobel => ImageOp::Sobel(DerivativeParams::from_arguments(args)?),
            Method::SqrBoxFilter => ImageOp::SqrBoxFilter(DepthKernelParams {
                output_depth: args.int("outputDepth")?,
                kernel_size: KernelSize::from_arguments(args)?,
            }),
            Method::ApplyColorMap => ImageOp::ApplyColorMap(ColorMapParams {
                color_map: args.int("colorMap")?,
            }),
            Method::CvtColor => ImageOp::CvtColor(CvtColorParams {
                output_type: args.int("outputType")?,
            }),
            Method::AdaptiveThreshold => ImageOp::AdaptiveThreshold(AdaptiveThresholdParams {
                max_value: args.float("maxValue")?,
                adaptive_method: args.int("adaptiveMethod")?,
                threshold_type: args.int("thresholdType")?,
                block_size: args.int("blockSize")?,
                constant_value: args.float("constantValue")?,
            }),
            Method::DistanceTransform => ImageOp::DistanceTransform(DistanceTransformParams {
                distance_type: args.int("distanceType")?,
                mask_size: args.int("maskSize")?,
            }),
            Method::Threshold => ImageOp::Threshold(ThresholdParams {
                threshold_value: args.float("thresholdValue")?,
                max_threshold_value: args.float("maxThresholdValue")?,
                threshold_type: args.int("thresholdType")?,
            }),
        };
        let source = ImageSource::from_arguments(args)?;
        Ok(Call::Image(ImageCall { source, op }))
    }
}

impl DerivativeParams {
    fn from_arguments(args: &Arguments) -> Result<Self, BridgeError> {
        Ok(Self {
            depth: args.int("depth")?,
            dx: args.int("dx")?,
            dy: args.int("dy")?,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::value::Request;

    /// A complete, correctly-typed argument set for every image method.
    pub(crate) fn complete_request(method: Method) -> Request {
        let base = Request::new(method.as_str())
            .arg("pathType", 2)
            .arg("pathString", "")
            .arg("data", vec![0x89u8, b'P', b'N', b'G']);
        match method {
            Method::GetVersion | Method::EdgeDetect => Request::new(method.as_str()),
            Method::BilateralFilter => base
                .arg("diameter", 9)
                .arg("sigmaColor", 75)
                .arg("sigmaSpace", 75)
                .arg("borderType", 4),
            Method::Blur => base
                .arg("kernelSize", [3.0, 3.0])
                .arg("anchorPoint", [-1.0, -1.0])
                .arg("borderType", 4),
            Method::BoxFilter => base
                .arg("outputDepth", -1)
                .arg("kernelSize", [3.0, 3.0])
                .arg("anchorPoint", [-1.0, -1.0])
                .arg("normalize", true)
                .arg("borderType", 4),
            Method::Dilate | Method::Erode => base.arg("kernelSize", [3.0, 3.0]),
            Method::Filter2D | Method::SqrBoxFilter => base
                .arg("outputDepth", -1)
                .arg("kernelSize", [3, 3]),
            Method::GaussianBlur => base.arg("kernelSize", [5.0, 5.0]).arg("sigmaX", 0.0),
            Method::Laplacian => base.arg("depth", -1),
            Method::MedianBlur => base.arg("kernelSize", 3),
            Method::MorphologyEx => base.arg("operation", 2).arg("kernelSize", [3, 3]),
            Method::PyrMeanShiftFiltering => base
                .arg("spatialWindowRadius", 10.0)
                .arg("colorWindowRadius", 20.0),
            Method::Scharr | Method::Sobel => base.arg("depth", -1).arg("dx", 1).arg("dy", 0),
            Method::ApplyColorMap => base.arg("colorMap", 2),
            Method::CvtColor => base.arg("outputType", 6),
            Method::AdaptiveThreshold => base
                .arg("maxValue", 255.0)
                .arg("adaptiveMethod", 0)
                .arg("thresholdType", 0)
                .arg("blockSize", 11)
                .arg("constantValue", 2.0),
            Method::DistanceTransform => base.arg("distanceType", 2).arg("maskSize", 3),
            Method::Threshold => base
                .arg("thresholdValue", 127.0)
                .arg("maxThresholdValue", 255.0)
                .arg("thresholdType", 0),
        }
    }

    fn image_methods() -> impl Iterator<Item = Method> {
        Method::ALL
            .into_iter()
            .filter(|m| !matches!(m, Method::GetVersion | Method::EdgeDetect))
    }

    #[test]
    fn complete_arguments_parse_for_every_method() {
        for method in image_methods() {
            let request = complete_request(method);
            let call = Call::parse(method, &request.arguments)
                .unwrap_or_else(|e| panic!("{method}: {e}"));
            match call {
                Call::Image(image) => assert_eq!(image.op.method(), method),
                Call::GetVersion => panic!("{method} parsed as getVersion"),
            }
        }
    }

    #[test]
    fn dropping_any_argument_fails() {
        for method in image_methods() {
            let request = complete_request(method);
            let names: Vec<String> = ["pathType", "pathString", "data"]
                .into_iter()
                .map(String::from)
                .chain(
                    request
                        .arguments
                        .names()
                        .filter(|n| !matches!(*n, "pathType" | "pathString" | "data"))
                        .map(String::from),
                )
                .collect();
            for name in names {
                let mut args = request.arguments.clone();
                args.remove(&name);
                let err = Call::parse(method, &args)
                    .expect_err(&format!("{method} accepted a call without `{name}`"));
                assert!(
                    matches!(err, BridgeError::MissingArgument(missing) if missing == name),
                    "{method} without `{name}` failed with {err}"
                );
            }
        }
    }

    #[test]
    fn box_filter_fields_map_positionally() {
        let request = complete_request(Method::BoxFilter).arg("kernelSize", [5.0, 3.0]);
        let Call::Image(call) = Call::parse(Method::BoxFilter, &request.arguments).unwrap() else {
            panic!("expected an image call");
        };
        assert_eq!(
            call.op,
            ImageOp::BoxFilter(BoxFilterParams {
                output_depth: -1,
                kernel_size: KernelSize { width: 5, height: 3 },
                anchor: Anchor { x: -1, y: -1 },
                normalize: true,
                border_type: 4,
            })
        );
        assert_eq!(call.source, ImageSource::Bytes(vec![0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn grayscale_only_for_single_channel_primitives() {
        for method in image_methods() {
            let request = complete_request(method);
            let Call::Image(call) = Call::parse(method, &request.arguments).unwrap() else {
                unreachable!()
            };
            let expected = if matches!(method, Method::AdaptiveThreshold | Method::DistanceTransform)
            {
                ReadMode::Grayscale
            } else {
                ReadMode::Color
            };
            assert_eq!(call.op.read_mode(), expected, "{method}");
        }
    }

    #[test]
    fn version_takes_no_arguments() {
        assert_eq!(
            Call::parse(Method::GetVersion, &Arguments::new()).unwrap(),
            Call::GetVersion
        );
    }
}
