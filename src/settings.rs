use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TITLE: &str = "Bootstrapper";
pub const DEFAULT_APPLICATION_NAME: &str = "TestClient";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LoaderConfig {
    /// Native window title.
    #[serde(default = "default_title")]
    pub title: String,
    /// Name shown in the header of the main window.
    #[serde(default = "default_application_name")]
    pub application_name: String,
    /// Inner size of the native window in logical points.
    #[serde(default = "default_window_size")]
    pub window_size: (f32, f32),
    /// TrueType font used for every text style. Falls back to the bundled
    /// egui fonts when the file is missing.
    #[serde(default = "default_font_path")]
    pub font_path: Option<PathBuf>,
    /// Length of the simulated loading animation.
    #[serde(default = "default_load_duration_ms")]
    pub load_duration_ms: u64,
    /// Wait between dismissing the completion popup and the launch request.
    #[serde(default = "default_download_delay_ms")]
    pub download_delay_ms: u64,
    /// Refuse to load subscriptions whose status is not `active`.
    #[serde(default = "default_require_active")]
    pub require_active_subscription: bool,
    /// Start in license-only mode.
    #[serde(default)]
    pub license_only_mode: bool,
    /// When enabled the logger is initialised at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Write logs to this file instead of stderr.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_title() -> String {
    DEFAULT_TITLE.into()
}

fn default_application_name() -> String {
    DEFAULT_APPLICATION_NAME.into()
}

fn default_window_size() -> (f32, f32) {
    (640.0, 480.0)
}

fn default_font_path() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        Some(PathBuf::from("C:\\Windows\\Fonts\\bahnschrift.ttf"))
    } else {
        None
    }
}

fn default_load_duration_ms() -> u64 {
    3000
}

fn default_download_delay_ms() -> u64 {
    1500
}

fn default_require_active() -> bool {
    true
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            application_name: default_application_name(),
            window_size: default_window_size(),
            font_path: default_font_path(),
            load_duration_ms: default_load_duration_ms(),
            download_delay_ms: default_download_delay_ms(),
            require_active_subscription: default_require_active(),
            license_only_mode: false,
            debug_logging: false,
            log_file: None,
        }
    }
}

impl LoaderConfig {
    /// Config with everything defaulted except the window title. An empty
    /// title keeps the default.
    pub fn with_title(title: &str) -> Self {
        let mut cfg = Self::default();
        if !title.is_empty() {
            cfg.title = title.to_string();
        }
        cfg
    }

    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_duration(&self) -> Duration {
        Duration::from_millis(self.load_duration_ms)
    }

    pub fn download_delay(&self) -> Duration {
        Duration::from_millis(self.download_delay_ms)
    }
}
