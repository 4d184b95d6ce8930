//! Command-line argument parsing for athena-frames.

use athena_frames::config::Config;
use athena_frames::query::TimeRange;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Run Athena datasource queries and print the resulting frames as JSON.
#[derive(Parser, Debug)]
#[command(name = "athena-frames")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the query proxy (overrides config)
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    /// Datasource id attached to every query (overrides config)
    #[arg(long, global = true, value_name = "ID")]
    pub datasource_id: Option<i64>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Dispatch queries from a JSON file and print their frames
    Query {
        /// JSON array of query descriptors
        #[arg(long, value_name = "PATH")]
        queries: PathBuf,

        /// Range start in epoch milliseconds
        #[arg(long, value_name = "MILLIS", requires = "to")]
        from: Option<i64>,

        /// Range end in epoch milliseconds
        #[arg(long, value_name = "MILLIS", requires = "from")]
        to: Option<i64>,

        /// Range ending now, in minutes (used when --from/--to are absent)
        #[arg(long, value_name = "MINUTES", default_value = "60")]
        last: u64,
    },

    /// List named queries as (text, value, label)
    NamedQueries,

    /// Check connectivity and credentials
    Health,
}

impl Command {
    /// Returns the time range for the `query` subcommand.
    pub fn time_range(&self) -> Option<TimeRange> {
        match self {
            Self::Query {
                from: Some(from),
                to: Some(to),
                ..
            } => Some(TimeRange::from_millis(*from, *to)),
            Self::Query { last, .. } => Some(TimeRange::last(Duration::from_secs(last * 60))),
            _ => None,
        }
    }
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Applies CLI overrides on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.endpoint.url = Some(url.clone());
        }
        if let Some(id) = self.datasource_id {
            config.endpoint.datasource_id = Some(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_with_range() {
        let cli = Cli::try_parse_from([
            "athena-frames",
            "--url",
            "http://proxy:3000",
            "query",
            "--queries",
            "q.json",
            "--from",
            "1000",
            "--to",
            "2000",
        ])
        .unwrap();

        assert_eq!(cli.url.as_deref(), Some("http://proxy:3000"));
        assert_eq!(cli.command.time_range(), Some(TimeRange::from_millis(1000, 2000)));
    }

    #[test]
    fn test_parse_query_last_minutes() {
        let cli = Cli::try_parse_from(["athena-frames", "query", "--queries", "q.json", "--last", "5"])
            .unwrap();
        let range = cli.command.time_range().unwrap();
        let from: i64 = range.from.parse().unwrap();
        let to: i64 = range.to.parse().unwrap();
        assert_eq!(to - from, 300_000);
    }

    #[test]
    fn test_from_requires_to() {
        let result = Cli::try_parse_from([
            "athena-frames",
            "query",
            "--queries",
            "q.json",
            "--from",
            "1000",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli =
            Cli::try_parse_from(["athena-frames", "--datasource-id", "12", "health"]).unwrap();
        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.endpoint.datasource_id, Some(12));
        assert!(config.endpoint.url.is_none());
        assert!(cli.command.time_range().is_none());
    }
}
