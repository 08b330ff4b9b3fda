use std::path::{Path, PathBuf};

use directories::{ProjectDirs, UserDirs};
use serde::Deserialize;

use crate::error::{AnalyserError, Result};

pub const ENV_YOUTUBE_API_KEY: &str = "CONTENT_ANALYSER_YOUTUBE_API_KEY";
pub const ENV_PODBEAN_CLIENT_ID: &str = "CONTENT_ANALYSER_PODBEAN_CLIENT_ID";
pub const ENV_PODBEAN_CLIENT_SECRET: &str = "CONTENT_ANALYSER_PODBEAN_CLIENT_SECRET";
pub const ENV_OUTPUT_DIR: &str = "CONTENT_ANALYSER_OUTPUT_DIR";
pub const ENV_MAX_PAGES: &str = "CONTENT_ANALYSER_MAX_PAGES";

const DEFAULT_CHANNEL: &str = "@coffeesoftware";

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ProducerKind {
    YoutubeChannel,
    YoutubePlaylist,
    Podbean,
}

/// One `[[producers]]` entry. `id` is the channel id/handle or playlist id; Podbean
/// producers are identified by their credentials instead.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ProducerConfig {
    pub name: String,
    pub kind: ProducerKind,
    #[serde(default)]
    pub id: Option<String>,
}

impl ProducerConfig {
    pub fn feed_id(&self) -> Result<&str> {
        self.id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AnalyserError::Config(format!("producer '{}' needs an id", self.name)))
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub youtube_api_key: Option<String>,
    pub podbean_client_id: Option<String>,
    pub podbean_client_secret: Option<String>,
    pub output_dir: Option<PathBuf>,
    /// Safety bound on listing pages walked per feed.
    pub max_pages: usize,
    pub request_timeout_secs: u64,
    pub youtube_api_base: String,
    pub podbean_api_base: String,
    pub producers: Vec<ProducerConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            youtube_api_key: None,
            podbean_client_id: None,
            podbean_client_secret: None,
            output_dir: None,
            max_pages: 1000,
            request_timeout_secs: 30,
            youtube_api_base: crate::youtube::DEFAULT_API_BASE.to_string(),
            podbean_api_base: crate::podcasts::DEFAULT_API_BASE.to_string(),
            producers: Vec::new(),
        }
    }
}

impl Config {
    /// Read the config file (an explicit path must exist; the default one may not),
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match default_config_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AnalyserError::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
            .map_err(|e| AnalyserError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| AnalyserError::Config(e.to_string()))
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = non_empty(ENV_YOUTUBE_API_KEY) { self.youtube_api_key = Some(v); }
        if let Some(v) = non_empty(ENV_PODBEAN_CLIENT_ID) { self.podbean_client_id = Some(v); }
        if let Some(v) = non_empty(ENV_PODBEAN_CLIENT_SECRET) { self.podbean_client_secret = Some(v); }
        if let Some(v) = non_empty(ENV_OUTPUT_DIR) { self.output_dir = Some(PathBuf::from(v)); }
        if let Some(n) = non_empty(ENV_MAX_PAGES).and_then(|s| s.parse().ok()) { self.max_pages = n; }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(default_output_dir)
    }

    pub fn podbean_credentials(&self) -> Option<(&str, &str)> {
        match (self.podbean_client_id.as_deref(), self.podbean_client_secret.as_deref()) {
            (Some(id), Some(secret)) => Some((id, secret)),
            _ => None,
        }
    }

    /// Configured producers, or the default registry when none are listed.
    pub fn producer_configs(&self) -> Vec<ProducerConfig> {
        if !self.producers.is_empty() {
            return self.producers.clone();
        }
        let mut defaults = vec![ProducerConfig {
            name: "coffeesoftware".to_string(),
            kind: ProducerKind::YoutubeChannel,
            id: Some(DEFAULT_CHANNEL.to_string()),
        }];
        if self.podbean_credentials().is_some() {
            defaults.push(ProducerConfig { name: "podcasts".to_string(), kind: ProducerKind::Podbean, id: None });
        }
        defaults
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "content-analyser", "content-analyser")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// `~/Desktop/csv`, the directory reports land in unless configured otherwise.
pub fn default_output_dir() -> PathBuf {
    let desktop = UserDirs::new().and_then(|dirs| {
        dirs.desktop_dir()
            .map(Path::to_path_buf)
            .or_else(|| Some(dirs.home_dir().join("Desktop")))
    });
    desktop.unwrap_or_else(|| PathBuf::from(".")).join("csv")
}
