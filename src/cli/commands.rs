//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Paginated export and key-preserving re-import of REST tables
#[derive(Parser, Debug)]
#[command(name = "rowferry")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Snapshot directory (overrides the settings file)
    #[arg(short = 'd', long, global = true)]
    pub snapshot_dir: Option<PathBuf>,

    /// Backend URL (overrides the settings file and SUPABASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export backend tables into JSON snapshots
    Export {
        /// Collections to export (comma-separated, empty = configured list)
        #[arg(long, value_delimiter = ',')]
        collections: Vec<String>,
    },

    /// Import JSON snapshots following the configured plan
    Import,

    /// Forward meetings (optionally of one day) to the webhook
    Meetings {
        /// Only meetings starting on this UTC date
        #[arg(value_name = "yyyy-mm-dd", value_parser = parse_date)]
        date: Option<chrono::NaiveDate>,
    },

    /// List CRM contacts owned by a user
    Contacts {
        /// Owner id
        #[arg(long)]
        owner: String,
    },

    /// Format a transcript file (JSON array of sentences)
    Transcript {
        /// Sentences file
        file: PathBuf,
    },
}

fn parse_date(input: &str) -> Result<chrono::NaiveDate, String> {
    crate::meetings::parse_date_filter(input).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_export_collections() {
        let cli = Cli::parse_from(["rowferry", "export", "--collections", "notes,profiles"]);
        match cli.command {
            Commands::Export { collections } => assert_eq!(collections, vec!["notes", "profiles"]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["rowferry", "import", "-d", "/tmp/snaps", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.snapshot_dir, Some(PathBuf::from("/tmp/snaps")));
        assert!(matches!(cli.command, Commands::Import));
    }

    #[test]
    fn test_parse_meetings_date() {
        let cli = Cli::parse_from(["rowferry", "meetings", "2025-02-03"]);
        match cli.command {
            Commands::Meetings { date } => {
                assert_eq!(date, chrono::NaiveDate::from_ymd_opt(2025, 2, 3));
            }
            other => panic!("unexpected command {other:?}"),
        }

        let cli = Cli::parse_from(["rowferry", "meetings"]);
        assert!(matches!(cli.command, Commands::Meetings { date: None }));
    }

    #[test]
    fn test_meetings_rejects_bad_date() {
        let err = Cli::try_parse_from(["rowferry", "meetings", "3/2/2025"]).unwrap_err();
        assert!(err.to_string().contains("yyyy-mm-dd"));
    }

    #[test]
    fn test_contacts_requires_owner() {
        assert!(Cli::try_parse_from(["rowferry", "contacts"]).is_err());
    }
}
