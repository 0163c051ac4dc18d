use crate::error::ConfigError;
use std::env;
use std::path::PathBuf;

/// Runtime settings for a [`crate::Bridge`].
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    /// Label prefixed to every error message, e.g. `"android: ..."`.
    pub platform: String,
    /// Name of the host component, used in the no-context message.
    pub context_name: String,
    /// Extension (with leading dot) used when re-encoding byte-buffer results.
    pub encode_extension: String,
    /// Directory for path-mode results. `None` writes beside the source file.
    pub output_dir: Option<PathBuf>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            platform: env::consts::OS.to_string(),
            context_name: "cv_bridge".to_string(),
            encode_extension: ".png".to_string(),
            output_dir: None,
        }
    }
}

impl BridgeConfig {
    /// Reads `CV_BRIDGE_*` variables over the defaults and validates the result.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            platform: lookup("CV_BRIDGE_PLATFORM").unwrap_or(defaults.platform),
            context_name: lookup("CV_BRIDGE_CONTEXT_NAME").unwrap_or(defaults.context_name),
            encode_extension: lookup("CV_BRIDGE_ENCODE_EXT")
                .map(|ext| ext.trim().to_lowercase())
                .unwrap_or(defaults.encode_extension),
            output_dir: lookup("CV_BRIDGE_OUTPUT_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ext = &self.encode_extension;
        if !ext.starts_with('.') || ext.len() < 2 {
            return Err(ConfigError::InvalidValue {
                key: "CV_BRIDGE_ENCODE_EXT",
                value: ext.clone(),
                reason: "must be an extension such as .png",
            });
        }
        if self.platform.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "CV_BRIDGE_PLATFORM",
                value: self.platform.clone(),
                reason: "must not be empty",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_vars(vars: &[(&str, &str)]) -> Result<BridgeConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BridgeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn unset_variables_keep_the_defaults() {
        assert_eq!(from_vars(&[]).unwrap(), BridgeConfig::default());
    }

    #[test]
    fn variables_override_the_defaults() {
        let config = from_vars(&[
            ("CV_BRIDGE_PLATFORM", "android"),
            ("CV_BRIDGE_CONTEXT_NAME", "opencv_plugin"),
            ("CV_BRIDGE_ENCODE_EXT", " .JPG "),
            ("CV_BRIDGE_OUTPUT_DIR", "/tmp/results"),
        ])
        .unwrap();
        assert_eq!(config.platform, "android");
        assert_eq!(config.context_name, "opencv_plugin");
        assert_eq!(config.encode_extension, ".jpg");
        assert_eq!(config.output_dir, Some(PathBuf::from("/tmp/results")));
    }

    #[test]
    fn blank_output_dir_is_unset() {
        let config = from_vars(&[("CV_BRIDGE_OUTPUT_DIR", " ")]).unwrap();
        assert_eq!(config.output_dir, None);
    }

    #[test]
    fn invalid_variables_are_rejected() {
        assert!(matches!(
            from_vars(&[("CV_BRIDGE_ENCODE_EXT", "jpg")]),
            Err(ConfigError::InvalidValue { key: "CV_BRIDGE_ENCODE_EXT", .. })
        ));
        assert!(matches!(
            from_vars(&[("CV_BRIDGE_PLATFORM", "")]),
            Err(ConfigError::InvalidValue { key: "CV_BRIDGE_PLATFORM", .. })
        ));
    }

    #[test]
    fn defaults_are_valid() {
        let config = BridgeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.encode_extension, ".png");
        assert_eq!(config.output_dir, None);
    }

    #[test]
    fn extension_needs_a_leading_dot() {
        let config = BridgeConfig {
            encode_extension: "jpg".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key: "CV_BRIDGE_ENCODE_EXT", .. })
        ));
    }

    #[test]
    fn empty_platform_is_rejected() {
        let config = BridgeConfig {
            platform: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
