use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::KiraError;

pub const DEFAULT_CONFIG_FILE: &str = "kira-eb.json";
pub const DEFAULT_COMMAND_LOG: &str = "commands.txt";

/// Optional overrides read from `kira-eb.json`.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub search_program: Option<String>,
    #[serde(default)]
    pub fetch_program: Option<String>,
    #[serde(default)]
    pub output_dir: Option<Utf8PathBuf>,
    #[serde(default)]
    pub command_log: Option<String>,
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Everything a run needs, passed explicitly to each stage.
#[derive(Debug, Clone)]
pub struct Settings {
    pub input: Utf8PathBuf,
    pub output_dir: Utf8PathBuf,
    pub command_log: Utf8PathBuf,
    pub database: String,
    pub format: String,
    pub search_program: String,
    pub fetch_program: String,
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Settings {
    pub fn new(input: impl Into<Utf8PathBuf>) -> Self {
        Self::from_config(input, Config::default())
    }

    pub fn from_config(input: impl Into<Utf8PathBuf>, config: Config) -> Self {
        let output_dir = config.output_dir.unwrap_or_else(|| Utf8PathBuf::from("."));
        let command_log = output_dir.join(
            config
                .command_log
                .unwrap_or_else(|| DEFAULT_COMMAND_LOG.to_string()),
        );
        Self {
            input: input.into(),
            command_log,
            output_dir,
            database: config.database.unwrap_or_else(|| "nucleotide".to_string()),
            format: config.format.unwrap_or_else(|| "fasta".to_string()),
            search_program: config
                .search_program
                .unwrap_or_else(|| "esearch".to_string()),
            fetch_program: config.fetch_program.unwrap_or_else(|| "efetch".to_string()),
            poll_interval: Duration::from_millis(config.poll_interval_ms.unwrap_or(1000).max(1)),
            timeout: Duration::from_secs(config.timeout_secs.unwrap_or(30)),
        }
    }

    pub fn output_path(&self, filename: &str) -> Utf8PathBuf {
        self.output_dir.join(filename)
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Reads `path`, or `kira-eb.json` in the current directory when `path` is `None`.
    /// A missing default file yields the built-in defaults.
    pub fn load(path: Option<&str>) -> Result<Config, KiraError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| KiraError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| KiraError::ConfigParse(err.to_string()))?;
        tracing::debug!(path = %config_path.display(), "loaded config overrides");
        Ok(config)
    }

    pub fn resolve(input: &str, path: Option<&str>) -> Result<Settings, KiraError> {
        Ok(Settings::from_config(input, Self::load(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_entrez_pipeline() {
        let settings = Settings::new("accessions.csv");
        assert_eq!(settings.database, "nucleotide");
        assert_eq!(settings.format, "fasta");
        assert_eq!(settings.search_program, "esearch");
        assert_eq!(settings.fetch_program, "efetch");
        assert_eq!(settings.command_log, Utf8PathBuf::from("./commands.txt"));
        assert_eq!(settings.poll_interval, Duration::from_secs(1));
        assert_eq!(settings.timeout, Duration::from_secs(30));
    }
}
