use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "scripture-ref")]
#[command(about = "Parse, canonicalize and compare scripture references", long_about = None)]
pub struct Cli {
    #[arg(long, global = true, help = "Log directory (JSONL diagnostics are kept in memory when omitted)")]
    pub log_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "JSON file overriding range separators and the open-ended marker")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Pretty-print JSON output")]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Split a reference into chunks
    Parse {
        #[arg(help = "Reference such as 1:1-2,4b,5-7a")]
        reference: String,
    },

    /// Canonicalize a reference and summarize its first chunk
    Clean {
        #[arg(help = "Reference to clean up")]
        reference: String,
    },

    /// Check whether a reference covers a search term
    Contains {
        #[arg(help = "Reference to search in")]
        reference: String,

        #[arg(help = "Reference to look for")]
        search_term: String,

        #[arg(long, help = "Require every search chunk to be covered")]
        strict: bool,
    },

    /// List the verses a reference selects from a book file
    Verses {
        #[arg(long, help = "Book JSON file keyed by chapter, then verse")]
        book: PathBuf,

        #[arg(help = "Reference to look up")]
        reference: String,
    },

    /// Write JSON schemas for the command output
    Schema {
        #[arg(long, default_value = "schema", help = "Output directory")]
        out: PathBuf,
    },
}

impl Cli {
    pub fn parse() -> Self {
        Parser::parse()
    }
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Parse { .. } => "parse",
            Command::Clean { .. } => "clean",
            Command::Contains { .. } => "contains",
            Command::Verses { .. } => "verses",
            Command::Schema { .. } => "schema",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_arguments() {
        let cli = Cli::try_parse_from(["scripture-ref", "contains", "1:1-10", "1:4", "--strict"]).unwrap();
        match cli.command {
            Command::Contains { reference, search_term, strict } => {
                assert_eq!(reference, "1:1-10");
                assert_eq!(search_term, "1:4");
                assert!(strict);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["scripture-ref", "parse", "2:4-5", "--pretty"]).unwrap();
        assert!(cli.pretty);
        assert!(cli.log_dir.is_none());
        assert_eq!(cli.command.name(), "parse");
    }
}
