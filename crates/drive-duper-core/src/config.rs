use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::fmt;

pub const DEFAULT_GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0";

const DEFAULT_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "mp4", "mpg", "mov", "mts", "avi", "heif", "heifs", "heic", "heics",
    "avci", "avcs", "hif",
];

#[derive(Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_graph_api_base")]
    pub graph_api_base: String,
    #[serde(default)]
    pub access_token: Option<String>,
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

fn default_graph_api_base() -> String {
    DEFAULT_GRAPH_API_BASE.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            graph_api_base: default_graph_api_base(),
            access_token: None,
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("extensions", &self.extensions)
            .field("graph_api_base", &self.graph_api_base)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl AppConfig {
    /// Extensions lowercased, stripped of any `*.`/`.` prefix, with duplicates
    /// removed in first-seen order.
    pub fn normalized_extensions(&self) -> Vec<String> {
        normalize_extensions(&self.extensions)
    }
}

/// Loads `Config.toml` (optional), then `DRIVE_DUPER_*` environment variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(
            Environment::with_prefix("DRIVE_DUPER")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("extensions"),
        )
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

pub fn normalize_extensions(extensions: &[String]) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();

    for ext in extensions {
        let ext = ext.trim();
        let ext = ext.strip_prefix('*').unwrap_or(ext);
        let ext = ext.strip_prefix('.').unwrap_or(ext).to_lowercase();
        if ext.is_empty() || result.contains(&ext) {
            continue;
        }
        result.push(ext);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_glob_prefix_and_lowercases() {
        let exts = vec!["*.JPG".to_string(), ".png".to_string(), "Mov".to_string()];
        assert_eq!(normalize_extensions(&exts), vec!["jpg", "png", "mov"]);
    }

    #[test]
    fn test_normalize_removes_duplicates_keeping_order() {
        let exts = vec![
            "mp4".to_string(),
            "jpg".to_string(),
            "*.mp4".to_string(),
            "".to_string(),
            "JPG".to_string(),
        ];
        assert_eq!(normalize_extensions(&exts), vec!["mp4", "jpg"]);
    }

    #[test]
    fn test_default_extensions_are_already_normalized() {
        let config = AppConfig::default();
        assert_eq!(config.normalized_extensions(), config.extensions);
        assert!(config.extensions.contains(&"heic".to_string()));
    }

    #[test]
    fn test_debug_redacts_access_token() {
        let config = AppConfig {
            access_token: Some("secret-token".to_string()),
            ..AppConfig::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("secret-token"));
        assert!(printed.contains("<redacted>"));
    }
}
