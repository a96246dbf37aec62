// ⚙️ Configuration - flags shared by the CLI and the web server
// Every source flag can also come from the environment.

use crate::bracket::WindowSpec;
use crate::market::{TableSource, DEFAULT_MARKET_URL};
use clap::builder::TypedValueParser;
use clap::Args;
use std::time::Duration;

#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Pricing endpoint returning { success, mcap }
    #[arg(long, env = "MCAP_MARKET_URL", default_value = DEFAULT_MARKET_URL)]
    pub market_url: String,

    /// Reference table: local CSV path or http(s) URL
    #[arg(long, env = "MCAP_TABLE", default_value = "mcap_data.csv")]
    pub table: TableSource,

    /// Name shown in "{subject} market cap is ..."
    #[arg(long, env = "MCAP_SUBJECT", default_value = "DeGods")]
    pub subject: String,

    /// Link target for the subject name
    #[arg(long, env = "MCAP_SUBJECT_URL", default_value = "https://de.xyz")]
    pub subject_url: String,

    /// Neighbors shown before the chosen entry
    #[arg(long, default_value_t = crate::bracket::DEFAULT_BEFORE)]
    pub before: usize,

    /// Chosen entry plus neighbors after it
    #[arg(
        long,
        default_value_t = crate::bracket::DEFAULT_AFTER,
        value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize)
    )]
    pub after: usize,

    /// HTTP timeout for each fetch
    #[arg(long, env = "MCAP_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,
}

impl SourceArgs {
    pub fn window(&self) -> WindowSpec {
        WindowSpec {
            before: self.before,
            after: self.after,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, Default, Args)]
pub struct LogArgs {
    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Warnings and errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// env_logger to stderr; RUST_LOG wins unless -v/-q is given
pub fn init_logging(args: LogArgs) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        sources: SourceArgs,

        #[command(flatten)]
        log: LogArgs,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::try_parse_from(["test"]).unwrap();

        assert_eq!(cli.sources.window(), WindowSpec::default());
        assert_eq!(cli.sources.subject, "DeGods");
        assert_eq!(cli.sources.timeout(), Duration::from_secs(10));
        assert!(!cli.log.verbose);
    }

    #[test]
    fn test_table_url_flag() {
        let cli = TestCli::try_parse_from(["test", "--table", "https://x.test/t.csv", "--before", "1"])
            .unwrap();

        assert_eq!(cli.sources.table, TableSource::Url("https://x.test/t.csv".to_string()));
        assert_eq!(cli.sources.window().before, 1);
    }

    #[test]
    fn test_after_must_be_positive() {
        assert!(TestCli::try_parse_from(["test", "--after", "0"]).is_err());
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(TestCli::try_parse_from(["test", "-v", "-q"]).is_err());
    }
}
