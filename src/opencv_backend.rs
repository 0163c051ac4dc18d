//! [`ImageBackend`] backed by the native OpenCV library.
//!
//! Functions with OpenCV default arguments are called through their `_def` variants so the
//! crate builds against any OpenCV 4.x install (4.11 added an `AlgorithmHint` parameter to
//! several of them).

use crate::{
    backend::ImageBackend,
    params::{Anchor, ImageOp, KernelSize},
    source::ReadMode,
};
use opencv::{
    core::{self, Mat, Point, Scalar, Size, Vector},
    imgcodecs, imgproc,
    prelude::*,
};
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenCvError {
    #[error(transparent)]
    Native(#[from] opencv::Error),

    #[error("{0} could not be decoded as an image")]
    Undecodable(String),

    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),

    #[error("no encoder available for {0}")]
    EncoderRejected(String),
}

#[derive(Clone, Debug, Default)]
pub struct OpenCvBackend;

impl OpenCvBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ImageBackend for OpenCvBackend {
    type Image = Mat;
    type Error = OpenCvError;

    fn initialize(&self) -> Result<(), OpenCvError> {
        core::set_use_optimized(true)?;
        log::debug!(
            "OpenCV {} (optimized: {})",
            core::get_version_string()?,
            core::use_optimized()?
        );
        Ok(())
    }

    fn version(&self) -> Result<String, OpenCvError> {
        Ok(core::get_version_string()?)
    }

    fn read(&self, path: &Path, mode: ReadMode) -> Result<Mat, OpenCvError> {
        let name = utf8(path)?;
        let image = imgcodecs::imread(name, read_flags(mode))?;
        if image.empty() {
            return Err(OpenCvError::Undecodable(name.to_string()));
        }
        Ok(image)
    }

    fn decode(&self, data: &[u8], mode: ReadMode) -> Result<Mat, OpenCvError> {
        let buf = Vector::<u8>::from_slice(data);
        let image = imgcodecs::imdecode(&buf, read_flags(mode))?;
        if image.empty() {
            return Err(OpenCvError::Undecodable(format!("{}-byte buffer", data.len())));
        }
        Ok(image)
    }

    fn apply(&self, image: &Mat, op: &ImageOp) -> Result<Mat, OpenCvError> {
        let mut dst = Mat::default();
        match op {
            ImageOp::BilateralFilter(p) => imgproc::bilateral_filter(
                image,
                &mut dst,
                p.diameter,
                p.sigma_color,
                p.sigma_space,
                p.border_type,
            )?,
            ImageOp::Blur(p) => imgproc::blur(
                image,
                &mut dst,
                size(p.kernel_size),
                point(p.anchor),
                p.border_type,
            )?,
            ImageOp::BoxFilter(p) => imgproc::box_filter(
                image,
                &mut dst,
                p.output_depth,
                size(p.kernel_size),
                point(p.anchor),
                p.normalize,
                p.border_type,
            )?,
            ImageOp::Dilate(p) => {
                imgproc::dilate_def(image, &mut dst, &rect_kernel(p.kernel_size)?)?
            }
            ImageOp::Erode(p) => imgproc::erode_def(image, &mut dst, &rect_kernel(p.kernel_size)?)?,
            ImageOp::Filter2D(p) => imgproc::filter_2d_def(
                image,
                &mut dst,
                p.output_depth,
                &mean_kernel(p.kernel_size)?,
            )?,
            ImageOp::GaussianBlur(p) => {
                imgproc::gaussian_blur_def(image, &mut dst, size(p.kernel_size), p.sigma_x)?
            }
            ImageOp::Laplacian(p) => imgproc::laplacian_def(image, &mut dst, p.depth)?,
            ImageOp::MedianBlur(p) => imgproc::median_blur(image, &mut dst, p.kernel_size)?,
            ImageOp::MorphologyEx(p) => imgproc::morphology_ex_def(
                image,
                &mut dst,
                p.operation,
                &rect_kernel(p.kernel_size)?,
            )?,
            ImageOp::PyrMeanShiftFiltering(p) => imgproc::pyr_mean_shift_filtering_def(
                image,
                &mut dst,
                p.spatial_window_radius,
                p.color_window_radius,
            )?,
            ImageOp::Scharr(p) => imgproc::scharr_def(image, &mut dst, p.depth, p.dx, p.dy)?,
            ImageOp::Sobel(p) => imgproc::sobel_def(image, &mut dst, p.depth, p.dx, p.dy)?,
            ImageOp::SqrBoxFilter(p) => {
                imgproc::sqr_box_filter_def(image, &mut dst, p.output_depth, size(p.kernel_size))?
            }
            ImageOp::ApplyColorMap(p) => imgproc::apply_color_map(image, &mut dst, p.color_map)?,
            ImageOp::CvtColor(p) => imgproc::cvt_color_def(image, &mut dst, p.output_type)?,
            ImageOp::AdaptiveThreshold(p) => imgproc::adaptive_threshold(
                image,
                &mut dst,
                p.max_value,
                p.adaptive_method,
                p.threshold_type,
                p.block_size,
                p.constant_value,
            )?,
            ImageOp::DistanceTransform(p) => {
                imgproc::distance_transform_def(image, &mut dst, p.distance_type, p.mask_size)?
            }
            ImageOp::Threshold(p) => {
                imgproc::threshold(
                    image,
                    &mut dst,
                    p.threshold_value,
                    p.max_threshold_value,
                    p.threshold_type,
                )?;
            }
        }
        Ok(dst)
    }

    fn encode(&self, image: &Mat, extension: &str) -> Result<Vec<u8>, OpenCvError> {
        let image = encodable(image)?;
        let mut buf = Vector::<u8>::new();
        if !imgcodecs::imencode(extension, &*image, &mut buf, &Vector::new())? {
            return Err(OpenCvError::EncoderRejected(extension.to_string()));
        }
        Ok(buf.to_vec())
    }

    fn can_write(&self, extension: &str) -> bool {
        imgcodecs::have_image_writer(&format!("image{extension}")).unwrap_or(false)
    }

    fn write(&self, path: &Path, image: &Mat) -> Result<(), OpenCvError> {
        let name = utf8(path)?;
        let image = encodable(image)?;
        if !imgcodecs::imwrite(name, &*image, &Vector::new())? {
            return Err(OpenCvError::EncoderRejected(name.to_string()));
        }
        Ok(())
    }
}

fn read_flags(mode: ReadMode) -> i32 {
    match mode {
        ReadMode::Color => imgcodecs::IMREAD_COLOR,
        ReadMode::Grayscale => imgcodecs::IMREAD_GRAYSCALE,
    }
}

fn utf8(path: &Path) -> Result<&str, OpenCvError> {
    path.to_str()
        .ok_or_else(|| OpenCvError::NonUtf8Path(path.to_path_buf()))
}

fn size(kernel: KernelSize) -> Size {
    Size::new(kernel.width, kernel.height)
}

fn point(anchor: Anchor) -> Point {
    Point::new(anchor.x, anchor.y)
}

/// Rectangular structuring element for morphology.
fn rect_kernel(kernel: KernelSize) -> opencv::Result<Mat> {
    imgproc::get_structuring_element(imgproc::MORPH_RECT, size(kernel), Point::new(-1, -1))
}

/// Normalized averaging kernel for `filter2D`.
fn mean_kernel(kernel: KernelSize) -> opencv::Result<Mat> {
    let area = f64::from(kernel.width) * f64::from(kernel.height);
    Mat::new_size_with_default(size(kernel), core::CV_32F, Scalar::all(1.0 / area))
}

// Derivative, distance and float-depth results are saturated to 8-bit so every codec takes them.
fn encodable(image: &Mat) -> opencv::Result<Cow<'_, Mat>> {
    if image.depth() == core::CV_8U {
        return Ok(Cow::Borrowed(image));
    }
    let mut converted = Mat::default();
    image.convert_to(&mut converted, core::CV_8U, 1.0, 0.0)?;
    Ok(Cow::Owned(converted))
}
