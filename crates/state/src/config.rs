use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized},
};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::error::{ConfigError, ExtractSnafu};
use crate::hooks::JUST_NOW_LABEL;
use crate::message::PreviewPolicy;

pub const SETTINGS_DIRECTORY_NAME: &str = "natter";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const ENV_PREFIX: &str = "NATTER_";

/// Viewports narrower than this many logical pixels use the mobile layout.
pub const DEFAULT_MOBILE_BREAKPOINT: f32 = 768.0;
pub const DEFAULT_PREVIEW_MAX_CHARS: usize = 30;
pub const DEFAULT_PREVIEW_ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_mobile_breakpoint")]
    pub mobile_breakpoint: f32,
    #[serde(default = "default_preview_max_chars")]
    pub preview_max_chars: usize,
    #[serde(default = "default_preview_ellipsis")]
    pub preview_ellipsis: String,
    #[serde(default = "default_sent_time_label")]
    pub sent_time_label: String,
    #[serde(default = "default_true")]
    pub start_sidebar_open: bool,
    #[serde(default = "default_true")]
    pub seed_demo_data: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: default_mobile_breakpoint(),
            preview_max_chars: default_preview_max_chars(),
            preview_ellipsis: default_preview_ellipsis(),
            sent_time_label: default_sent_time_label(),
            start_sidebar_open: true,
            seed_demo_data: true,
        }
    }
}

impl ChatConfig {
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(SETTINGS_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".natter"))
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join(SETTINGS_FILE_NAME)
    }

    /// Loads settings from the default location, falling back to defaults on any error.
    pub fn load() -> Self {
        let path = Self::default_config_path();
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(error) => {
                tracing::warn!("{error}. using default chat settings");
                Self::default()
            }
        }
    }

    /// Merges defaults, the JSON file at `path` (if present) and `NATTER_*` variables.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("settings file not found at {:?}, using defaults", path);
        }

        let figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Json::file(path))
            .merge(Env::prefixed(ENV_PREFIX));

        let config = figment.extract::<Self>().context(ExtractSnafu {
            stage: "extract-chat-settings",
            path: path.to_path_buf(),
        })?;

        Ok(config.normalized())
    }

    pub fn normalized(mut self) -> Self {
        if !self.mobile_breakpoint.is_finite() || self.mobile_breakpoint <= 0.0 {
            tracing::warn!(
                "ignoring invalid mobile breakpoint {}, using {}",
                self.mobile_breakpoint,
                DEFAULT_MOBILE_BREAKPOINT
            );
            self.mobile_breakpoint = DEFAULT_MOBILE_BREAKPOINT;
        }

        if self.preview_max_chars == 0 {
            self.preview_max_chars = DEFAULT_PREVIEW_MAX_CHARS;
        }

        if self.sent_time_label.trim().is_empty() {
            self.sent_time_label = default_sent_time_label();
        }

        self
    }

    pub fn preview_policy(&self) -> PreviewPolicy {
        PreviewPolicy {
            max_chars: self.preview_max_chars,
            ellipsis: self.preview_ellipsis.clone(),
        }
    }
}

fn default_mobile_breakpoint() -> f32 {
    DEFAULT_MOBILE_BREAKPOINT
}

fn default_preview_max_chars() -> usize {
    DEFAULT_PREVIEW_MAX_CHARS
}

fn default_preview_ellipsis() -> String {
    DEFAULT_PREVIEW_ELLIPSIS.to_string()
}

fn default_sent_time_label() -> String {
    JUST_NOW_LABEL.to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("natter-config-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = ChatConfig::load_from(&scratch_path("absent.json")).expect("load defaults");
        assert_eq!(config.preview_max_chars, 30);
        assert_eq!(config.sent_time_label, "Just now");
        assert_eq!(config.mobile_breakpoint, 768.0);
        assert!(config.start_sidebar_open);
    }

    #[test]
    fn file_values_override_defaults() {
        let path = scratch_path("partial.json");
        std::fs::create_dir_all(path.parent().expect("scratch dir")).expect("create scratch dir");
        std::fs::write(&path, r#"{ "preview_max_chars": 12, "seed_demo_data": false }"#)
            .expect("write settings");

        let config = ChatConfig::load_from(&path).expect("load settings");
        assert_eq!(config.preview_max_chars, 12);
        assert!(!config.seed_demo_data);
        assert_eq!(config.preview_ellipsis, "...");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = scratch_path("broken.json");
        std::fs::create_dir_all(path.parent().expect("scratch dir")).expect("create scratch dir");
        std::fs::write(&path, "{ not json").expect("write settings");

        let error = ChatConfig::load_from(&path).expect_err("malformed settings must fail");
        assert!(matches!(error, ConfigError::Extract { .. }));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn normalization_repairs_out_of_range_values() {
        let config = ChatConfig {
            mobile_breakpoint: -1.0,
            preview_max_chars: 0,
            sent_time_label: "  ".to_string(),
            ..ChatConfig::default()
        }
        .normalized();

        assert_eq!(config.mobile_breakpoint, DEFAULT_MOBILE_BREAKPOINT);
        assert_eq!(config.preview_max_chars, DEFAULT_PREVIEW_MAX_CHARS);
        assert_eq!(config.sent_time_label, JUST_NOW_LABEL);
    }
}
