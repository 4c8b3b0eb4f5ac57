use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

pub const DEFAULT_MFAPI_BASE_URL: &str = "https://api.mfapi.in";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MfApiProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub mfapi: Option<MfApiProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            mfapi: Some(MfApiProviderConfig {
                base_url: DEFAULT_MFAPI_BASE_URL.to_string(),
            }),
        }
    }
}

/// Simulated latency of the mock sign-in paths.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AuthConfig {
    pub login_delay_ms: u64,
    pub signup_delay_ms: u64,
    pub oauth_delay_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            login_delay_ms: 1500,
            signup_delay_ms: 2000,
            oauth_delay_ms: 2000,
        }
    }
}

impl AuthConfig {
    /// No simulated latency at all.
    pub fn immediate() -> Self {
        AuthConfig {
            login_delay_ms: 0,
            signup_delay_ms: 0,
            oauth_delay_ms: 0,
        }
    }

    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }

    pub fn signup_delay(&self) -> Duration {
        Duration::from_millis(self.signup_delay_ms)
    }

    pub fn oauth_delay(&self) -> Duration {
        Duration::from_millis(self.oauth_delay_ms)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    pub data_path: Option<String>,
}

impl AppConfig {
    /// Loads the config from the default location, falling back to defaults
    /// when no file has been created there yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "fundwise", "fundwise")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("com", "fundwise", "fundwise")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn mfapi_base_url(&self) -> &str {
        self.providers
            .mfapi
            .as_ref()
            .map_or(DEFAULT_MFAPI_BASE_URL, |p| &p.base_url)
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  mfapi:
    base_url: "http://example.com/mfapi"
auth:
  login_delay_ms: 10
  signup_delay_ms: 20
  oauth_delay_ms: 30
data_path: "/tmp/fundwise"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.mfapi_base_url(), "http://example.com/mfapi");
        assert_eq!(config.auth.login_delay(), Duration::from_millis(10));
        assert_eq!(config.auth.signup_delay(), Duration::from_millis(20));
        assert_eq!(config.auth.oauth_delay(), Duration::from_millis(30));
        assert_eq!(
            config.default_data_path().unwrap(),
            PathBuf::from("/tmp/fundwise")
        );
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.mfapi_base_url(), DEFAULT_MFAPI_BASE_URL);
        assert_eq!(config.auth, AuthConfig::default());
        assert!(config.data_path.is_none());

        // Partial auth section keeps the remaining defaults
        let config: AppConfig =
            serde_yaml::from_str("auth:\n  login_delay_ms: 0\n").expect("Failed to deserialize");
        assert_eq!(config.auth.login_delay_ms, 0);
        assert_eq!(config.auth.signup_delay_ms, 2000);
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load_from_path(dir.path().join("missing.yaml"));
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .starts_with("Failed to read config file")
        );
    }
}
