use crate::types::ClassificationMode;
use once_cell::sync::Lazy;
use tracing::warn;

/// Bundled config, also the only source on the web where there is no
/// process environment.
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

const DEFAULT_NATIVE_BASE: &str = "http://127.0.0.1:5000";

pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::load);

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_base: Option<String>,
    pub predict_path: String,
    pub chat_path: String,
    pub map_confidence: f64,
    pub jpeg_quality: f64,
    pub default_mode: ClassificationMode,
    pub markdown: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            predict_path: "/predict".to_string(),
            chat_path: "/chat".to_string(),
            map_confidence: 0.8,
            jpeg_quality: 0.9,
            default_mode: ClassificationMode::Food,
            markdown: true,
        }
    }
}

impl AppConfig {
    /// Bundled file first, then process environment on top of it.
    pub fn load() -> Self {
        let mut config = Self::from_env_text(BUNDLED_CONFIG);
        config.apply_process_env();
        config
    }

    /// Parse `KEY=VALUE` lines, skipping comments and blank lines.
    pub fn from_env_text(text: &str) -> Self {
        let mut config = Self::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config.set(key.trim(), value.trim());
            }
        }
        config
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn apply_process_env(&mut self) {
        // A local .env is optional; absence is the normal case.
        let _ = dotenvy::dotenv();
        for key in [
            "LENS_API_BASE",
            "LENS_PREDICT_PATH",
            "LENS_CHAT_PATH",
            "LENS_MAP_CONFIDENCE",
            "LENS_JPEG_QUALITY",
            "LENS_DEFAULT_MODE",
            "LENS_MARKDOWN",
        ] {
            if let Ok(value) = std::env::var(key) {
                self.set(key, value.trim());
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn apply_process_env(&mut self) {}

    fn set(&mut self, key: &str, value: &str) {
        match key {
            "LENS_API_BASE" => {
                self.api_base = if value.is_empty() {
                    None
                } else {
                    Some(value.trim_end_matches('/').to_string())
                };
            }
            "LENS_PREDICT_PATH" => self.predict_path = normalize_path(value),
            "LENS_CHAT_PATH" => self.chat_path = normalize_path(value),
            "LENS_MAP_CONFIDENCE" => {
                self.map_confidence = parse_unit(key, value, self.map_confidence)
            }
            "LENS_JPEG_QUALITY" => self.jpeg_quality = parse_unit(key, value, self.jpeg_quality),
            "LENS_DEFAULT_MODE" => match ClassificationMode::parse(value) {
                Some(mode) => self.default_mode = mode,
                None => warn!(key, value, "unknown mode, keeping default"),
            },
            "LENS_MARKDOWN" => {
                self.markdown = matches!(
                    value.to_ascii_lowercase().as_str(),
                    "1" | "true" | "yes" | "on"
                )
            }
            _ => {}
        }
    }

    /// Configured base URL, or the platform default when unset.
    pub fn base_url(&self) -> String {
        match &self.api_base {
            Some(base) => base.clone(),
            None => crate::web::page_origin().unwrap_or_else(|| DEFAULT_NATIVE_BASE.to_string()),
        }
    }

    pub fn predict_url(&self) -> String {
        format!("{}{}", self.base_url(), self.predict_path)
    }

    pub fn chat_url(&self) -> String {
        format!("{}{}", self.base_url(), self.chat_path)
    }
}

fn normalize_path(value: &str) -> String {
    if value.starts_with('/') {
        value.to_string()
    } else {
        format!("/{value}")
    }
}

/// Parse a value in `[0, 1]`, falling back to `current` otherwise.
fn parse_unit(key: &str, value: &str, current: f64) -> f64 {
    match value.parse::<f64>() {
        Ok(parsed) if (0.0..=1.0).contains(&parsed) => parsed,
        _ => {
            warn!(key, value, "expected a number between 0 and 1, keeping default");
            current
        }
    }
}
