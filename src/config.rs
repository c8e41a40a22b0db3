//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application configuration with layered loading.
///
/// Built once at startup and handed by reference to the client and the
/// collect command; nothing mutates it during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Exhibitor search endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Value sent in the `apikey` header
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Event identifier (`findEventVariable`)
    #[serde(default = "default_event_id")]
    pub event_id: String,

    /// Result language
    #[serde(default = "default_language")]
    pub language: String,

    /// Sort field (`orderBy`)
    #[serde(default = "default_order_by")]
    pub order_by: String,

    /// Hits per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// First page to request (inclusive)
    #[serde(default = "default_start_page")]
    pub start_page: u32,

    /// Last page to request (inclusive); `None` stops on the first empty page only
    #[serde(default)]
    pub max_pages: Option<u32>,

    /// Free-text search; blank returns every exhibitor
    #[serde(default)]
    pub query: String,

    /// `orSearchFallback` flag
    #[serde(default)]
    pub or_search_fallback: bool,

    /// `showJumpLabels` flag
    #[serde(default = "default_true")]
    pub show_jump_labels: bool,

    /// `user-agent` header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// `origin` header
    #[serde(default = "default_site_url")]
    pub origin: String,

    /// `referer` header
    #[serde(default = "default_site_url")]
    pub referer: String,

    /// Delimited output path
    #[serde(default = "default_out_csv")]
    pub out_csv: PathBuf,

    /// Spreadsheet output path
    #[serde(default = "default_out_xlsx")]
    pub out_xlsx: PathBuf,

    /// Retries allowed per page on transient statuses
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff unit in milliseconds, multiplied by the attempt number
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pause between pages in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_api_url() -> String {
    "https://api.messefrankfurt.com/service/esb_api/exhibitor-service/api/2.1/public/exhibitor/search"
        .to_string()
}

fn default_api_key() -> String {
    "LXnMWcYQhipLAS7rImEzmZ3CkrU033FMha9cwVSngG4vbufTsAOCQQ==".to_string()
}

fn default_event_id() -> String {
    "HEIMTEXTIL".to_string()
}

fn default_language() -> String {
    "en-GB".to_string()
}

fn default_order_by() -> String {
    "name".to_string()
}

fn default_page_size() -> u32 {
    30
}

fn default_start_page() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string()
}

fn default_site_url() -> String {
    "https://heimtextil.messefrankfurt.com/frankfurt/en/exhibitor-search.html?page=1&pagesize=90"
        .to_string()
}

fn default_out_csv() -> PathBuf {
    PathBuf::from("HEIMTEXTIL__exhibitors.csv")
}

fn default_out_xlsx() -> PathBuf {
    PathBuf::from("HEIMTEXTIL__exhibitors.xlsx")
}

fn default_max_retries() -> u32 {
    5
}

fn default_backoff_ms() -> u64 {
    1500
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_delay_ms() -> u64 {
    300
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: default_api_key(),
            event_id: default_event_id(),
            language: default_language(),
            order_by: default_order_by(),
            page_size: default_page_size(),
            start_page: default_start_page(),
            max_pages: None,
            query: String::new(),
            or_search_fallback: false,
            show_jump_labels: true,
            user_agent: default_user_agent(),
            origin: default_site_url(),
            referer: default_site_url(),
            out_csv: default_out_csv(),
            out_xlsx: default_out_xlsx(),
            max_retries: default_max_retries(),
            backoff_ms: default_backoff_ms(),
            timeout_secs: default_timeout_secs(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("mf-exhibitors").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(key) = std::env::var("MF_API_KEY") {
            if !key.trim().is_empty() {
                self.api_key = key;
            }
        }

        if let Ok(event) = std::env::var("MF_EVENT_ID") {
            if !event.trim().is_empty() {
                self.event_id = event;
            }
        }

        if let Ok(delay) = std::env::var("MF_DELAY") {
            if let Ok(d) = delay.parse() {
                self.delay_ms = d;
            }
        }

        self
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Politeness delay between pages.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Rejects values the API or the pagination loop cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            anyhow::bail!("page_size must be a positive integer");
        }
        if self.start_page == 0 {
            anyhow::bail!("start_page must be at least 1");
        }
        if self.api_url.trim().is_empty() {
            anyhow::bail!("api_url must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.event_id, "HEIMTEXTIL");
        assert_eq!(config.language, "en-GB");
        assert_eq!(config.order_by, "name");
        assert_eq!(config.page_size, 30);
        assert_eq!(config.start_page, 1);
        assert!(config.max_pages.is_none());
        assert!(config.query.is_empty());
        assert!(!config.or_search_fallback);
        assert!(config.show_jump_labels);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.backoff_ms, 1500);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.delay_ms, 300);
        assert_eq!(config.out_csv, PathBuf::from("HEIMTEXTIL__exhibitors.csv"));
        assert_eq!(config.out_xlsx, PathBuf::from("HEIMTEXTIL__exhibitors.xlsx"));
    }

    #[test]
    fn test_durations() {
        let config = Config::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.delay(), Duration::from_millis(300));
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            event_id = "AMBIENTE"
            page_size = 90
            max_pages = 3
            delay_ms = 0
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.event_id, "AMBIENTE");
        assert_eq!(config.page_size, 90);
        assert_eq!(config.max_pages, Some(3));
        assert_eq!(config.delay_ms, 0);
        // Untouched fields keep their defaults
        assert_eq!(config.language, "en-GB");
        assert_eq!(config.max_retries, 5);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            language = "de-DE"
            out_csv = "out/list.csv"
            "#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.language, "de-DE");
        assert_eq!(config.out_csv, PathBuf::from("out/list.csv"));
    }

    #[test]
    fn test_config_from_file_not_found() {
        let result = Config::from_file("/nonexistent/path/config.toml");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_config_from_file_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml {{{{").unwrap();

        let err = Config::from_file(file.path()).unwrap_err().to_string();
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "start_page = 4").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.start_page, 4);
    }

    #[test]
    fn test_config_with_env() {
        let orig_key = std::env::var("MF_API_KEY").ok();
        let orig_event = std::env::var("MF_EVENT_ID").ok();
        let orig_delay = std::env::var("MF_DELAY").ok();

        std::env::set_var("MF_API_KEY", "secret");
        std::env::set_var("MF_EVENT_ID", "TECHTEXTIL");
        std::env::set_var("MF_DELAY", "not_a_number");

        let config = Config::new().with_env();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.event_id, "TECHTEXTIL");
        // Unparseable values are ignored
        assert_eq!(config.delay_ms, 300);

        match orig_key {
            Some(v) => std::env::set_var("MF_API_KEY", v),
            None => std::env::remove_var("MF_API_KEY"),
        }
        match orig_event {
            Some(v) => std::env::set_var("MF_EVENT_ID", v),
            None => std::env::remove_var("MF_EVENT_ID"),
        }
        match orig_delay {
            Some(v) => std::env::set_var("MF_DELAY", v),
            None => std::env::remove_var("MF_DELAY"),
        }
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());

        let config = Config { page_size: 0, ..Config::default() };
        assert!(config.validate().unwrap_err().to_string().contains("page_size"));

        let config = Config { start_page: 0, ..Config::default() };
        assert!(config.validate().unwrap_err().to_string().contains("start_page"));
    }
}
