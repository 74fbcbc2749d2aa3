use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Looked up in the current directory when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = ".pr-scope.toml";

const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REMOTE: &str = "origin";
const DEFAULT_EXTENSION: &str = "php";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .pr-scope.toml.
/// Every field has a default, so the tool works with zero config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub scope: ScopeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Overrides GITHUB_TOKEN from the build environment when set.
    pub token: Option<String>,
    /// API root; point this at `https://<host>/api/v3` for GitHub Enterprise.
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GitHubConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// File extensions to keep. `php`, `.php` and `*.php` are equivalent.
    /// An empty list keeps every changed file.
    pub extensions: Vec<String>,
    /// Remote whose tracking branch the target is reset to.
    pub remote: String,
    /// Fetch the target branch from `remote` before resetting.
    pub fetch: bool,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            extensions: vec![DEFAULT_EXTENSION.to_string()],
            remote: DEFAULT_REMOTE.to_string(),
            fetch: false,
        }
    }
}

impl ScopeConfig {
    /// Extensions with any leading `*.` or `.` removed; blanks dropped.
    pub fn normalized_extensions(&self) -> Vec<String> {
        self.extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('*').trim_start_matches('.'))
            .filter(|ext| !ext.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Git pathspecs (`*.php`) matching the configured extensions.
    pub fn pathspecs(&self) -> Vec<String> {
        self.normalized_extensions()
            .iter()
            .map(|ext| format!("*.{ext}"))
            .collect()
    }
}

impl Config {
    /// Load `path` if given (it must exist), otherwise .pr-scope.toml in the
    /// current directory, otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load_from(default_path)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the GitHub token: config file value takes precedence over
    /// the one supplied by the build environment.
    pub fn github_token<'a>(&'a self, from_env: Option<&'a str>) -> Option<&'a str> {
        self.github
            .token
            .as_deref()
            .filter(|token| !token.is_empty())
            .or(from_env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.github.token.is_none());
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.github.timeout(), Duration::from_secs(30));
        assert_eq!(config.scope.extensions, vec!["php"]);
        assert_eq!(config.scope.remote, "origin");
        assert!(!config.scope.fetch);
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_str = r#"
[github]
api_url = "https://ghe.example.com/api/v3"

[scope]
extensions = ["*.php", ".phtml", "inc"]
fetch = true
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.github.api_url, "https://ghe.example.com/api/v3");
        assert_eq!(config.github.timeout_secs, 30);
        assert_eq!(config.scope.remote, "origin");
        assert!(config.scope.fetch);
        assert_eq!(config.scope.normalized_extensions(), vec!["php", "phtml", "inc"]);
        assert_eq!(config.scope.pathspecs(), vec!["*.php", "*.phtml", "*.inc"]);
    }

    #[test]
    fn test_empty_extension_list_yields_no_pathspecs() {
        let config: Config = toml::from_str("[scope]\nextensions = [\"\", \"  \"]\n").unwrap();
        assert!(config.scope.pathspecs().is_empty());
    }

    #[test]
    fn test_github_token_precedence() {
        let mut config = Config::default();
        assert_eq!(config.github_token(Some("env")), Some("env"));
        assert_eq!(config.github_token(None), None);

        config.github.token = Some("file".to_string());
        assert_eq!(config.github_token(Some("env")), Some("file"));

        config.github.token = Some(String::new());
        assert_eq!(config.github_token(Some("env")), Some("env"));
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scope]\nremote = \"upstream\"").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.scope.remote, "upstream");
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead(_)));
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scope\nremote = ").unwrap();
        assert!(matches!(
            Config::load_from(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }
}
