use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "ythistory",
    about = "Recently watched YouTube videos",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Show storage paths and lookup details
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Record a watched video (moves it to the front if already present)
    Add {
        /// YouTube video URL or video ID
        url: String,

        /// Title to store instead of looking it up
        #[arg(short, long)]
        title: Option<String>,

        /// Don't look the title up via oEmbed
        #[arg(long)]
        no_fetch: bool,
    },

    /// List history, newest first
    List {
        /// Output format: text (default), json
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Show at most this many entries
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Delete all history
    Clear,

    /// Show derived URLs and oEmbed metadata for a video
    Info {
        /// YouTube video URL or video ID
        url: String,
    },
}
