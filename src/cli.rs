use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

/// Collect content published this year into one CSV report per feed
#[derive(Parser, Debug)]
#[command(name = "content-analyser", version)]
#[command(about = "Aggregate videos and podcast episodes into per-feed CSV reports", long_about = None)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory the reports are written to
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Include content published after midnight (local time) of this date instead of January 1st
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub since: Option<NaiveDate>,

    /// Only run the named producer(s)
    #[arg(long, value_name = "NAME")]
    pub only: Vec<String>,

    /// List the configured producers and exit
    #[arg(long)]
    pub list: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from([
            "content-analyser", "--since", "2024-03-01", "--only", "coffeesoftware", "--only", "podcasts", "-o", "/tmp/csv",
        ])
        .unwrap();
        assert_eq!(cli.since, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(cli.only, ["coffeesoftware", "podcasts"]);
        assert_eq!(cli.output_dir, Some(PathBuf::from("/tmp/csv")));
        assert!(!cli.list);
    }

    #[test]
    fn rejects_bad_dates() {
        assert!(Cli::try_parse_from(["content-analyser", "--since", "03/01/2024"]).is_err());
    }
}
