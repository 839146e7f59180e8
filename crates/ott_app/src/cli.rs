use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use url::Url;

use ott_engine::{
    FetchSettings, UpdateConfig, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RETENTION_DAYS,
    DEFAULT_SOURCE_URL, DEFAULT_TABLE_SELECTOR,
};

/// One scheduled harvest of the OTT release table: fetch, merge, persist,
/// back up, prune.
#[derive(Debug, Parser)]
#[command(name = "ott_update", about = "Update the OTT release dataset from its source page")]
pub struct Cli {
    /// Directory holding the dataset file and its backups.
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory holding the per-day update logs.
    #[arg(long, default_value = "logs")]
    pub logs_dir: PathBuf,

    /// Page to harvest.
    #[arg(long, default_value = DEFAULT_SOURCE_URL)]
    pub source_url: Url,

    /// CSS selector locating the release table.
    #[arg(long, default_value = DEFAULT_TABLE_SELECTOR)]
    pub table_selector: String,

    /// Hard ceiling on the whole fetch, in seconds.
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Age in days after which backups and logs are deleted.
    #[arg(long, default_value_t = DEFAULT_RETENTION_DAYS)]
    pub retention_days: u64,
}

impl Cli {
    pub fn into_config(self) -> UpdateConfig {
        UpdateConfig {
            data_dir: self.data_dir,
            logs_dir: self.logs_dir,
            source_url: self.source_url,
            table_selector: self.table_selector,
            fetch: FetchSettings {
                request_timeout: Duration::from_secs(self.timeout_secs),
                ..FetchSettings::default()
            },
            retention_days: self.retention_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_on_disk_contract() {
        let config = Cli::parse_from(["ott_update"]).into_config();

        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.logs_dir, PathBuf::from("logs"));
        assert_eq!(config.source_url.as_str(), DEFAULT_SOURCE_URL);
        assert_eq!(config.table_selector, DEFAULT_TABLE_SELECTOR);
        assert_eq!(config.fetch.request_timeout, Duration::from_secs(300));
        assert_eq!(config.retention_days, 30);
        assert_eq!(config.dataset_path(), PathBuf::from("data").join("movies.json"));
    }

    #[test]
    fn flags_override_the_defaults() {
        let config = Cli::parse_from([
            "ott_update",
            "--data-dir",
            "/var/ott",
            "--timeout-secs",
            "15",
            "--retention-days",
            "7",
            "--source-url",
            "https://example.com/releases",
        ])
        .into_config();

        assert_eq!(config.data_dir, PathBuf::from("/var/ott"));
        assert_eq!(config.fetch.request_timeout, Duration::from_secs(15));
        assert_eq!(config.retention_days, 7);
        assert_eq!(config.source_url.as_str(), "https://example.com/releases");
    }

    #[test]
    fn an_unparseable_url_is_rejected() {
        let result = Cli::try_parse_from(["ott_update", "--source-url", "not a url"]);

        assert!(result.is_err());
    }
}
