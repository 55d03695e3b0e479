use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub mod defaults;
pub mod duration_serde;

use defaults::*;

use crate::errors::{AppError, AppResult};
use crate::playlist::FilterSet;

/// Top-level run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub sources: Vec<SourceConfig>,

    /// Probe every retained stream reference and record the ones that fail
    #[serde(default, alias = "checkUrls")]
    pub check_urls: bool,

    /// Merge channels sharing a display name and rank their streams by resolution
    #[serde(default, alias = "mergeSimilarChannels", alias = "dedupe")]
    pub merge_similar_channels: bool,

    #[serde(default = "default_output_path")]
    pub output: PathBuf,

    #[serde(default = "default_log_path", alias = "log", alias = "logFile")]
    pub log_file: PathBuf,

    #[serde(
        default = "default_fetch_timeout",
        alias = "fetchTimeout",
        with = "duration_serde::duration"
    )]
    pub fetch_timeout: Duration,

    #[serde(
        default = "default_check_timeout",
        alias = "checkTimeout",
        with = "duration_serde::duration"
    )]
    pub check_timeout: Duration,

    #[serde(default = "default_max_streams", alias = "maxStreamsPerChannel")]
    pub max_streams_per_channel: usize,
}

/// One configured playlist origin
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Optional label used in logs; the url is used when absent
    #[serde(default)]
    pub name: Option<String>,

    pub url: String,

    /// Ordered user agents, the first one is the default
    #[serde(
        default,
        alias = "UA",
        alias = "ua",
        alias = "user_agent",
        deserialize_with = "one_or_many"
    )]
    pub user_agents: Vec<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub groups: Vec<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub channels: Vec<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub keywords: Vec<String>,
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn default_log_path() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_PATH)
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECONDS)
}

fn default_check_timeout() -> Duration {
    Duration::from_secs(DEFAULT_CHECK_TIMEOUT_SECONDS)
}

fn default_max_streams() -> usize {
    DEFAULT_MAX_STREAMS_PER_CHANNEL
}

/// Filter and user-agent fields may be absent, a single string, or a list.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    };

    Ok(values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect())
}

impl SourceConfig {
    /// The user agent used for fetching and for stream annotations
    pub fn default_user_agent(&self) -> Option<&str> {
        self.user_agents.first().map(String::as_str)
    }

    pub fn filter_set(&self) -> FilterSet {
        FilterSet::new(&self.groups, &self.channels, &self.keywords)
    }

    /// Filter echo for the run log, with values exactly as configured
    pub fn describe_filters(&self) -> String {
        if self.filter_set().is_empty() {
            return "none (export everything)".to_string();
        }
        format!(
            "groups=[{}] channels=[{}] keywords=[{}]",
            self.groups.join(", "),
            self.channels.join(", "),
            self.keywords.join(", ")
        )
    }

    /// Label used in logs and in the run log
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.url)
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(config_file: P) -> AppResult<Self> {
        let path = config_file.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::configuration(format!("Failed to read {}: {e}", path.display()))
        })?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let config = if is_toml {
            Self::from_toml_str(&contents)?
        } else {
            Self::from_json_str(&contents)?
        };

        info!(
            "Loaded {} source(s) from {}",
            config.sources.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn from_json_str(contents: &str) -> AppResult<Self> {
        let config: Self = serde_json::from_str(contents)
            .map_err(|e| AppError::configuration(format!("Invalid JSON configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| AppError::configuration(format!("Invalid TOML configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AppResult<()> {
        if self.sources.is_empty() {
            return Err(AppError::configuration("No sources configured"));
        }
        if let Some(index) = self.sources.iter().position(|s| s.url.trim().is_empty()) {
            return Err(AppError::configuration(format!(
                "Source #{} has an empty url",
                index + 1
            )));
        }
        if self.max_streams_per_channel == 0 {
            return Err(AppError::configuration(
                "max_streams_per_channel must be at least 1",
            ));
        }
        Ok(())
    }
}
