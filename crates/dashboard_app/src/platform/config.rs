//! RON configuration for the `dashboard` binary.
//!
//! Every field is optional in the file; missing fields take their defaults.

use std::fs;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dashboard_core::{StoreSettings, DEFAULT_LIMIT, SEARCH_DEBOUNCE};
use dashboard_engine::FetchSettings;
use dashboard_logging::{dash_info, LogDestination, LogLevel, LogSettings};
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_FILE: &str = "dashboard.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub api_base_url: String,
    pub page_size: u32,
    pub search_debounce_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub log_destination: LogDestination,
    pub log_file: PathBuf,
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        let log = LogSettings::default();
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            api_base_url: "http://127.0.0.1:3000".to_string(),
            page_size: DEFAULT_LIMIT,
            search_debounce_ms: SEARCH_DEBOUNCE.as_millis() as u64,
            connect_timeout_ms: fetch.connect_timeout.as_millis() as u64,
            request_timeout_ms: fetch.request_timeout.as_millis() as u64,
            log_destination: log.destination,
            log_file: log.file,
            log_level: log.level,
        }
    }
}

impl AppConfig {
    /// Loads `path`, or `./dashboard.ron` when no path is given.
    ///
    /// An explicit path must exist; the implicit one may be absent, in which
    /// case the defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let implicit = Path::new(DEFAULT_CONFIG_FILE);
                if implicit.exists() {
                    Self::from_file(implicit)?
                } else {
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        dash_info!("loaded configuration from {:?}", path);
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1"));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid("request_timeout_ms must be at least 1"));
        }
        Ok(())
    }

    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            page_size: self.page_size,
            search_debounce: Duration::from_millis(self.search_debounce_ms),
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            ..FetchSettings::default()
        }
    }

    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            destination: self.log_destination,
            level: self.log_level,
            file: self.log_file.clone(),
        }
    }

    /// Log settings for the terminal browser, which owns stdout: terminal
    /// output is redirected to the log file.
    pub fn interactive_log_settings(&self) -> LogSettings {
        LogSettings {
            destination: LogDestination::File,
            ..self.log_settings()
        }
    }

    /// Logger settings for `serve`, then terminal output if the log file cannot be created.
    pub fn serve_log_attempts(&self) -> Vec<LogSettings> {
        let primary = self.log_settings();
        let mut attempts = vec![primary.clone()];
        if primary.destination == LogDestination::File {
            attempts.push(LogSettings {
                destination: LogDestination::Terminal,
                ..primary
            });
        }
        attempts
    }

    /// Logger settings for `browse`, then the same file name in the temp directory.
    /// Terminal output is never a fallback here since the browser draws on stdout.
    pub fn browse_log_attempts(&self) -> Vec<LogSettings> {
        let primary = self.interactive_log_settings();
        let name = primary
            .file
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("dashboard.log"));
        let spare = std::env::temp_dir().join(name);
        let mut attempts = vec![primary.clone()];
        if spare != primary.file {
            attempts.push(LogSettings {
                file: spare,
                ..primary
            });
        }
        attempts
    }
}

/// Installs the first logger in `attempts` that takes.
///
/// Returns the settings in effect, or `None` when every attempt failed.
pub fn install_logger(
    attempts: &[LogSettings],
    mut install: impl FnMut(&LogSettings) -> bool,
) -> Option<&LogSettings> {
    attempts.iter().find(|settings| install(settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_config(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let file = write_config("(page_size: 25, log_level: Debug)");
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.bind_addr, AppConfig::default().bind_addr);
        assert_eq!(config.search_debounce_ms, 300);
    }

    #[test]
    fn full_file_round_trips_through_ron() {
        let config = AppConfig {
            bind_addr: "0.0.0.0:8080".parse().unwrap(),
            api_base_url: "http://items.internal:8080".into(),
            log_destination: LogDestination::Both,
            ..AppConfig::default()
        };
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new()).unwrap();
        let file = write_config(&text);
        assert_eq!(AppConfig::load(Some(file.path())).unwrap(), config);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("absent.ron"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let file = write_config("(page_size: 0)");
        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn garbage_reports_parse_error() {
        let file = write_config("page_size = 10");
        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn derived_settings_follow_config() {
        let config = AppConfig {
            page_size: 4,
            search_debounce_ms: 120,
            request_timeout_ms: 900,
            log_destination: LogDestination::Terminal,
            ..AppConfig::default()
        };
        assert_eq!(config.store_settings().page_size, 4);
        assert_eq!(
            config.store_settings().search_debounce,
            Duration::from_millis(120)
        );
        assert_eq!(
            config.fetch_settings().request_timeout,
            Duration::from_millis(900)
        );
        assert_eq!(
            config.interactive_log_settings().destination,
            LogDestination::File
        );
    }

    #[test]
    fn serve_falls_back_to_terminal_only_for_file_logging() {
        let config = AppConfig {
            log_destination: LogDestination::File,
            ..AppConfig::default()
        };
        let destinations: Vec<_> = config
            .serve_log_attempts()
            .iter()
            .map(|settings| settings.destination)
            .collect();
        assert_eq!(
            destinations,
            vec![LogDestination::File, LogDestination::Terminal]
        );

        let config = AppConfig {
            log_destination: LogDestination::Terminal,
            ..AppConfig::default()
        };
        assert_eq!(config.serve_log_attempts().len(), 1);
    }

    #[test]
    fn browse_falls_back_to_temp_dir_file() {
        let config = AppConfig {
            log_file: PathBuf::from("/nonexistent/dir/browse.log"),
            ..AppConfig::default()
        };
        let attempts = config.browse_log_attempts();
        assert_eq!(attempts.len(), 2);
        assert!(attempts
            .iter()
            .all(|settings| settings.destination == LogDestination::File));
        assert_eq!(attempts[1].file, std::env::temp_dir().join("browse.log"));
    }

    #[test]
    fn install_logger_reports_which_attempt_took() {
        let config = AppConfig {
            log_file: PathBuf::from("/nonexistent/dir/browse.log"),
            ..AppConfig::default()
        };
        let attempts = config.browse_log_attempts();

        let mut tried = 0;
        let installed = install_logger(&attempts, |_| {
            tried += 1;
            tried == 2
        });
        assert_eq!(installed, Some(&attempts[1]));

        assert_eq!(install_logger(&attempts, |_| false), None);
    }
}
