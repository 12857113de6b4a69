use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::endpoints::PhotoListRoute;
use crate::error::ApiResult;

pub const DEFAULT_CONFIG_PATH: &str = "lantern.config";
pub const API_URL_ENV: &str = "LANTERN_API_URL";

const DEFAULT_API_URL: &str = "http://localhost:4000";
const DEFAULT_SESSION_FILE: &str = "lantern.session";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The config file as written on disk; every field may be left out.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LanternConfigFile {
    api_url: Option<String>,
    session_file: Option<PathBuf>,
    photo_list_route: Option<PhotoListRoute>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanternConfig {
    pub api_url: String,
    pub session_file: PathBuf,
    pub photo_list_route: PhotoListRoute,
    pub timeout: Duration,
}

impl Default for LanternConfig {
    fn default() -> Self {
        LanternConfig::from(LanternConfigFile::default())
    }
}

impl From<&LanternConfig> for LanternConfigFile {
    fn from(config: &LanternConfig) -> Self {
        LanternConfigFile {
            api_url: Some(config.api_url.clone()),
            session_file: Some(config.session_file.clone()),
            photo_list_route: Some(config.photo_list_route),
            timeout_secs: Some(config.timeout.as_secs()),
        }
    }
}

impl From<LanternConfigFile> for LanternConfig {
    fn from(file_config: LanternConfigFile) -> Self {
        LanternConfig {
            api_url: file_config
                .api_url
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            session_file: file_config
                .session_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE)),
            photo_list_route: file_config.photo_list_route.unwrap_or_default(),
            timeout: Duration::from_secs(file_config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

impl LanternConfig {
    /// Reads the config file, falling back to defaults when it does not exist.
    /// `LANTERN_API_URL` wins over the file when set.
    pub fn load(path: &Path) -> ApiResult<Self> {
        let file_config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str::<LanternConfigFile>(&content)?
        } else {
            LanternConfigFile::default()
        };
        let mut config = LanternConfig::from(file_config);
        if let Some(api_url) = std::env::var(API_URL_ENV).ok().filter(|url| !url.is_empty()) {
            config.api_url = api_url;
        }
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> ApiResult<()> {
        let file_config = LanternConfigFile::from(self);
        std::fs::write(path, serde_json::to_string_pretty(&file_config)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests that read or change the process environment take this lock.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults() {
        let config = LanternConfig::default();
        assert_eq!(config.api_url, "http://localhost:4000");
        assert_eq!(config.session_file, PathBuf::from("lantern.session"));
        assert_eq!(config.photo_list_route, PhotoListRoute::PhotosByAlbum);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("lantern.config");
        std::fs::write(&path, r#"{ "photo_list_route": "album_detail", "timeout_secs": 5 }"#)
            .expect("Failed to write config");

        let _env = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let config = LanternConfig::load(&path).unwrap();
        assert_eq!(config.photo_list_route, PhotoListRoute::AlbumDetail);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.session_file, PathBuf::from("lantern.session"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("lantern.config");
        let config = LanternConfig {
            api_url: "https://gallery.example.com".to_string(),
            session_file: dir.path().join("session.json"),
            photo_list_route: PhotoListRoute::AlbumDetail,
            timeout: Duration::from_secs(12),
        };
        config.save(&path).unwrap();

        let loaded = LanternConfig::from(
            serde_json::from_str::<LanternConfigFile>(&std::fs::read_to_string(&path).unwrap())
                .unwrap(),
        );
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("lantern.config");
        std::fs::write(&path, "api_url = nope").expect("Failed to write config");

        assert!(LanternConfig::load(&path).is_err());
    }

    #[test]
    fn test_env_url_wins_over_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("lantern.config");
        std::fs::write(&path, r#"{ "api_url": "http://file.example.com" }"#)
            .expect("Failed to write config");

        let _env = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        std::env::set_var(API_URL_ENV, "http://env.example.com");
        let overridden = LanternConfig::load(&path);
        std::env::set_var(API_URL_ENV, "");
        let empty = LanternConfig::load(&path);
        std::env::remove_var(API_URL_ENV);

        assert_eq!(overridden.unwrap().api_url, "http://env.example.com");
        assert_eq!(empty.unwrap().api_url, "http://file.example.com");
    }
}
