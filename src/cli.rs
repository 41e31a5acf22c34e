use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "wbprovider")]
#[command(author, version, about = "Metadata enrichment client for a custom movie metadata server")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the metadata server ip
    #[arg(long, global = true)]
    pub server_ip: Option<String>,

    /// Override the metadata server port
    #[arg(long, global = true)]
    pub server_port: Option<u16>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Enrich a media file with metadata from the server
    Enrich {
        /// Media file path; its base name is the lookup key
        #[arg(required = true)]
        path: String,

        /// Display name to keep when the server has nothing
        #[arg(long)]
        name: Option<String>,

        /// Year to keep when the server has no date
        #[arg(long)]
        year: Option<i32>,
    },

    /// Search the server by name
    Search {
        /// Name to search for
        #[arg(required = true)]
        query: String,
    },

    /// List poster images for a media file
    Images {
        /// Media file path
        #[arg(required = true)]
        path: String,
    },

    /// Fetch an image by URL or share path
    Image {
        /// http(s) URL or \\host\share\... path
        #[arg(required = true)]
        url: String,

        /// Write the image bytes to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show how a share path maps onto the local filesystem
    Translate {
        /// \\host\share\... path
        #[arg(required = true)]
        path: String,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },
}
