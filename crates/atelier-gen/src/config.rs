//! Layered configuration system
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `ATELIER_USE_MOCK`, `ATELIER_AUTH_TOKEN`, `ATELIER_API_BASE`
//! 2. Project-local: `.atelier/config.toml`
//! 3. Global: `~/.atelier/config.toml`
//!
//! The resolved [`AtelierConfig`] is built once at startup and handed to
//! [`crate::stores::create_store`]; nothing below reads the environment.

use atelier_core::{AtelierError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://test-api.generio.ai";
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_EXECUTION_MODE: &str = "automatic";

/// `[upstream]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub execution_mode: Option<String>,
}

/// `[server]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub bind: Option<String>,
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtelierConfigFile {
    #[serde(default)]
    pub use_mock: Option<bool>,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Resolved configuration with environment variable overrides applied
#[derive(Debug, Clone)]
pub struct AtelierConfig {
    /// Serve canned results instead of calling the upstream API
    pub use_mock: bool,
    pub api_base: String,
    pub auth_token: Option<String>,
    /// Per-request timeout for upstream calls
    pub timeout: Duration,
    /// Value of the `x-execution-mode` header
    pub execution_mode: String,
    /// Listen address for `atelier serve`
    pub bind: String,
}

impl Default for AtelierConfig {
    fn default() -> Self {
        Self::resolve(AtelierConfigFile::default())
    }
}

impl AtelierConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = AtelierConfigFile::default();

        // Layer 1: Global config (~/.atelier/config.toml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                Self::merge_into(&mut config, global);
            }
        }

        // Layer 2: Project-local config (.atelier/config.toml)
        let local_path = PathBuf::from(".atelier/config.toml");
        if local_path.exists() {
            let local = Self::load_file(&local_path)?;
            Self::merge_into(&mut config, local);
        }

        // Layer 3: Environment variable overrides
        Self::apply_overrides(&mut config, |key| std::env::var(key).ok());

        Ok(Self::resolve(config))
    }

    /// Load config from a specific file path plus environment overrides
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        Self::apply_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(Self::resolve(config))
    }

    /// A mock-mode configuration with defaults everywhere else
    pub fn mock() -> Self {
        Self {
            use_mock: true,
            ..Self::default()
        }
    }

    /// A live configuration pointed at `api_base`
    pub fn live(api_base: &str, auth_token: &str) -> Self {
        Self {
            use_mock: false,
            api_base: api_base.trim_end_matches('/').to_string(),
            auth_token: Some(auth_token.to_string()),
            ..Self::default()
        }
    }

    /// The bearer token, or a configuration error if none is set
    pub fn require_token(&self) -> Result<&str> {
        match self.auth_token.as_deref() {
            Some(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(AtelierError::Config(
                "Auth token not configured. Set ATELIER_AUTH_TOKEN or add upstream.auth_token to .atelier/config.toml"
                    .to_string(),
            )),
        }
    }

    fn resolve(file: AtelierConfigFile) -> Self {
        Self {
            use_mock: file.use_mock.unwrap_or(true),
            api_base: file
                .upstream
                .api_base
                .map(|b| b.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            auth_token: file.upstream.auth_token,
            timeout: Duration::from_secs(file.upstream.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            execution_mode: file
                .upstream
                .execution_mode
                .unwrap_or_else(|| DEFAULT_EXECUTION_MODE.to_string()),
            bind: file.server.bind.unwrap_or_else(|| DEFAULT_BIND.to_string()),
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".atelier").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<AtelierConfigFile> {
        let content = std::fs::read_to_string(path)?;
        let config: AtelierConfigFile = toml::from_str(&content).map_err(|e| {
            AtelierError::Config(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        Ok(config)
    }

    fn merge_into(base: &mut AtelierConfigFile, overlay: AtelierConfigFile) {
        if overlay.use_mock.is_some() {
            base.use_mock = overlay.use_mock;
        }
        if overlay.upstream.api_base.is_some() {
            base.upstream.api_base = overlay.upstream.api_base;
        }
        if overlay.upstream.auth_token.is_some() {
            base.upstream.auth_token = overlay.upstream.auth_token;
        }
        if overlay.upstream.timeout_secs.is_some() {
            base.upstream.timeout_secs = overlay.upstream.timeout_secs;
        }
        if overlay.upstream.execution_mode.is_some() {
            base.upstream.execution_mode = overlay.upstream.execution_mode;
        }
        if overlay.server.bind.is_some() {
            base.server.bind = overlay.server.bind;
        }
    }

    fn apply_overrides<F>(config: &mut AtelierConfigFile, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(flag) = lookup("ATELIER_USE_MOCK") {
            config.use_mock = Some(parse_flag(&flag));
        }
        if let Some(token) = lookup("ATELIER_AUTH_TOKEN") {
            config.upstream.auth_token = Some(token);
        }
        if let Some(base) = lookup("ATELIER_API_BASE") {
            config.upstream.api_base = Some(base);
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn temp_config(content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("atelier_config_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    fn cleanup(path: &Path) {
        std::fs::remove_file(path).ok();
        std::fs::remove_dir(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_parse_config_file() {
        let config_str = r#"
use_mock = false

[upstream]
api_base = "https://api.example.com/"
auth_token = "tok-123"
timeout_secs = 15

[server]
bind = "0.0.0.0:9000"
"#;
        let path = temp_config(config_str);
        let file = AtelierConfig::load_file(&path).unwrap();
        let config = AtelierConfig::resolve(file);

        assert!(!config.use_mock);
        assert_eq!(config.api_base, "https://api.example.com");
        assert_eq!(config.auth_token.as_deref(), Some("tok-123"));
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.execution_mode, "automatic");
        assert_eq!(config.bind, "0.0.0.0:9000");

        cleanup(&path);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let path = temp_config("use_mock = [not toml");
        let err = AtelierConfig::load_file(&path).unwrap_err();
        assert!(matches!(err, AtelierError::Config(_)));
        cleanup(&path);
    }

    #[test]
    fn test_defaults() {
        let config = AtelierConfig::default();
        assert!(config.use_mock);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.bind, DEFAULT_BIND);
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn test_overlay_wins_only_where_set() {
        let mut base = AtelierConfigFile::default();
        base.upstream.auth_token = Some("global-token".to_string());
        base.upstream.api_base = Some("https://global.example".to_string());

        let mut overlay = AtelierConfigFile::default();
        overlay.upstream.api_base = Some("https://project.example".to_string());
        overlay.use_mock = Some(false);

        AtelierConfig::merge_into(&mut base, overlay);
        let config = AtelierConfig::resolve(base);
        assert_eq!(config.auth_token.as_deref(), Some("global-token"));
        assert_eq!(config.api_base, "https://project.example");
        assert!(!config.use_mock);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("ATELIER_USE_MOCK", "FALSE"),
            ("ATELIER_AUTH_TOKEN", "env-token"),
        ]
        .into_iter()
        .collect();

        let mut file = AtelierConfigFile::default();
        file.upstream.auth_token = Some("file-token".to_string());
        AtelierConfig::apply_overrides(&mut file, |key| env.get(key).map(|v| v.to_string()));

        let config = AtelierConfig::resolve(file);
        assert!(!config.use_mock);
        assert_eq!(config.auth_token.as_deref(), Some("env-token"));
    }

    #[test]
    fn test_require_token() {
        assert!(AtelierConfig::mock().require_token().is_err());

        let mut blank = AtelierConfig::mock();
        blank.auth_token = Some("  ".to_string());
        assert!(matches!(blank.require_token(), Err(AtelierError::Config(_))));

        let live = AtelierConfig::live("http://localhost:1234/", "secret");
        assert_eq!(live.require_token().unwrap(), "secret");
        assert_eq!(live.api_base, "http://localhost:1234");
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(parse_flag("Yes"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
