use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Inspect METS/ALTO archives: documents, articles, and token matches.
#[derive(Debug, Parser)]
#[command(name = "altopress", about, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the archive's documents with their metadata
    Info {
        /// Path to the archive (directory or ZIP)
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,

        /// Archive family (newspapers, books, library). Default: probe
        #[arg(long)]
        family: Option<String>,
    },

    /// Dump resolved articles as JSON
    Articles {
        /// Path to the archive (directory or ZIP)
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,

        /// Restrict to one document code. Default: all documents
        #[arg(long)]
        document: Option<String>,
    },

    /// Match tokens across every text block of the archive
    Search {
        /// Path to the archive (directory or ZIP)
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,

        /// Query strings (or patterns with --regex)
        #[arg(value_name = "QUERY", required = true)]
        queries: Vec<String>,

        /// Fuzzy method (ratio, partial_ratio, token_sort_ratio,
        /// token_set_ratio)
        #[arg(long, default_value = "token_set_ratio")]
        method: String,

        /// Minimum fuzzy score to keep a match
        #[arg(long, default_value_t = 85.0)]
        min_ratio: f64,

        /// Treat queries as case-insensitive regular expressions
        #[arg(long)]
        regex: bool,

        /// Keep every scored token instead of filtering
        #[arg(long)]
        all_results: bool,
    },
}
