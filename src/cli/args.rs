//! CLI argument definitions using clap
//!
//! Commands:
//! - docstore init --config <path>
//! - docstore put --type <T> [--key <K>] [--data <JSON>]
//! - docstore get --key <K> [--type <T>]
//! - docstore update --key <K> --data <JSON> [--type <T>]
//! - docstore delete --key <K> [--type <T>]
//! - docstore search --type <T> [--where name=value]...

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docstore - A minimal embedded key/value document store
#[derive(Parser, Debug)]
#[command(name = "docstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./docstore.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory and an empty document log
    Init,

    /// Create and persist a new document
    Put {
        /// Document type tag
        #[arg(long = "type")]
        doc_type: String,

        /// Document key (generated when omitted)
        #[arg(long)]
        key: Option<String>,

        /// Attribute bag as a JSON object
        #[arg(long)]
        data: Option<String>,
    },

    /// Find a document by key
    Get {
        #[arg(long)]
        key: String,

        /// Only match a document of this type
        #[arg(long = "type")]
        doc_type: Option<String>,
    },

    /// Merge attributes into an existing document and persist it
    Update {
        #[arg(long)]
        key: String,

        /// Attributes to merge, as a JSON object
        #[arg(long)]
        data: String,

        /// Only match a document of this type
        #[arg(long = "type")]
        doc_type: Option<String>,
    },

    /// Delete a document by key
    Delete {
        #[arg(long)]
        key: String,

        /// Only match a document of this type
        #[arg(long = "type")]
        doc_type: Option<String>,
    },

    /// Search documents of a type by exact attribute values
    Search {
        #[arg(long = "type")]
        doc_type: String,

        /// Attribute filter as name=value; repeat for AND
        #[arg(long = "where", value_name = "NAME=VALUE")]
        filters: Vec<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
