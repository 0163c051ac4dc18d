/// Every remote method the bridge recognizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    GetVersion,
    // Image filtering
    BilateralFilter,
    Blur,
    BoxFilter,
    Dilate,
    Erode,
    Filter2D,
    GaussianBlur,
    Laplacian,
    MedianBlur,
    MorphologyEx,
    PyrMeanShiftFiltering,
    Scharr,
    Sobel,
    SqrBoxFilter,
    // Color maps and color spaces
    ApplyColorMap,
    CvtColor,
    // Miscellaneous transformations
    AdaptiveThreshold,
    DistanceTransform,
    Threshold,
    /// Handed to the host's capture flow instead of the image backend.
    EdgeDetect,
}

impl Method {
    pub const ALL: [Method; 21] = [
        Method::GetVersion,
        Method::BilateralFilter,
        Method::Blur,
        Method::BoxFilter,
        Method::Dilate,
        Method::Erode,
        Method::Filter2D,
        Method::GaussianBlur,
        Method::Laplacian,
        Method::MedianBlur,
        Method::MorphologyEx,
        Method::PyrMeanShiftFiltering,
        Method::Scharr,
        Method::Sobel,
        Method::SqrBoxFilter,
        Method::ApplyColorMap,
        Method::CvtColor,
        Method::AdaptiveThreshold,
        Method::DistanceTransform,
        Method::Threshold,
        Method::EdgeDetect,
    ];

    /// The wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GetVersion => "getVersion",
            Method::BilateralFilter => "bilateralFilter",
            Method::Blur => "blur",
            Method::BoxFilter => "boxFilter",
            Method::Dilate => "dilate",
            Method::Erode => "erode",
            Method::Filter2D => "filter2D",
            Method::GaussianBlur => "gaussianBlur",
            Method::Laplacian => "laplacian",
            Method::MedianBlur => "medianBlur",
            Method::MorphologyEx => "morphologyEx",
            Method::PyrMeanShiftFiltering => "pyrMeanShiftFiltering",
            Method::Scharr => "scharr",
            Method::Sobel => "sobel",
            Method::SqrBoxFilter => "sqrBoxFilter",
            Method::ApplyColorMap => "applyColorMap",
            Method::CvtColor => "cvtColor",
            Method::AdaptiveThreshold => "adaptiveThreshold",
            Method::DistanceTransform => "distanceTransform",
            Method::Threshold => "threshold",
            Method::EdgeDetect => "edge_detect",
        }
    }

    /// Looks up a wire name. Matching is exact and case-sensitive.
    pub fn from_name(name: &str) -> Option<Method> {
        Method::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for method in Method::ALL {
            assert_eq!(Method::from_name(method.as_str()), Some(method));
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(Method::from_name("gaussianBlur"), Some(Method::GaussianBlur));
        assert_eq!(Method::from_name("GaussianBlur"), None);
        assert_eq!(Method::from_name("canny"), None);
    }
}
