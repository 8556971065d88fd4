//! CLI argument definitions using clap
//!
//! Commands:
//! - collator collate --document-id <ID>... [--input <path>] [--config <path>]
//! - collator classify --index <N>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// collator - collate document transaction logs into history events
#[derive(Parser, Debug)]
#[command(name = "collator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Collate an NDJSON transaction log into a history timeline
    Collate {
        /// Document of interest; repeat for drafts and published ids
        #[arg(long = "document-id", required = true)]
        document_ids: Vec<String>,

        /// Log file to read; stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,

        /// Path to configuration file; defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Classify one JSON array of mutations read from stdin
    Classify {
        /// Position of the transaction in the sorted, filtered sequence
        #[arg(long, default_value_t = 0)]
        index: usize,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collate_args() {
        let cli = Cli::try_parse_from([
            "collator",
            "collate",
            "--document-id",
            "doc1",
            "--document-id",
            "drafts.doc1",
            "--input",
            "history.ndjson",
        ])
        .unwrap();

        match cli.command {
            Command::Collate {
                document_ids,
                input,
                config,
            } => {
                assert_eq!(document_ids, vec!["doc1", "drafts.doc1"]);
                assert_eq!(input, Some(PathBuf::from("history.ndjson")));
                assert!(config.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_collate_requires_document_id() {
        assert!(Cli::try_parse_from(["collator", "collate"]).is_err());
    }

    #[test]
    fn test_classify_default_index() {
        let cli = Cli::try_parse_from(["collator", "classify"]).unwrap();
        assert!(matches!(cli.command, Command::Classify { index: 0 }));
    }
}
