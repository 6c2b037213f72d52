use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "docmark",
    version,
    about = "Convert documents to markdown with section extraction and a local parse history"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse a document into markdown and store it in history.
    ///
    /// Supported: pdf, docx, xlsx, ppt/pptx, txt, png, jpg/jpeg.
    /// Images go through the tesseract OCR binary configured in
    /// .docmark/config.toml. Progress is reported on stderr.
    Convert {
        /// Source file path
        file: String,
        /// Do not record the result in history
        #[arg(long)]
        no_history: bool,
        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// List previously parsed documents, newest first
    History {
        /// Maximum number of entries
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Print a stored document
    Show {
        /// Document id
        id: String,
        /// Print only the markdown body
        #[arg(long)]
        markdown: bool,
    },

    /// Search history by name or markdown content
    Search {
        /// Case-insensitive search term
        term: String,
    },

    /// Export a stored document to a file
    Export {
        /// Document id
        id: String,
        /// Export format: markdown, json, or text
        #[arg(short, long, default_value = "markdown")]
        format: String,
        /// Output path (default: source name with swapped extension)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Remove a document from history
    Remove {
        /// Document id
        id: String,
    },

    /// Clear the entire history
    Clear,

    /// Print the section outline of a file without storing it
    Sections {
        /// Source file path
        file: String,
    },

    /// List supported file types
    Supported,
}
