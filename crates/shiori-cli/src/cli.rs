use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shiori")]
#[command(about = "Sync anime episode progress to Kitsu from downloaded release files")]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "SHIORI_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record an episode as watched and move its file into watched/
    Watch {
        /// Part of the series name, as it appears in the file name
        name: String,

        /// Episode number in the file name
        episode: u32,

        /// Progress to store instead of the file's episode number (0 = unset)
        #[arg(short, long)]
        force: Option<u32>,

        /// Directory holding the episode files
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Refresh the cached currently-watching list from Kitsu
    Sync,

    /// Show cached entries and their progress
    List,

    /// Log in to Kitsu and store the access token
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(long, env = "SHIORI_KITSU_PASSWORD", hide_env_values = true)]
        password: String,
    },
}
