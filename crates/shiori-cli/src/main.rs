mod cli;
mod error;
mod session;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use shiori_core::bindings::BindingStore;
use shiori_core::config::ConfigStore;
use shiori_core::orchestrator::{complete_watch, prepare_watch, WatchRequest};
use shiori_core::sync::{refresh_cache, SyncOutcome};

use cli::{Cli, Command};
use error::CliError;

const DEFAULT_LOG_FILTER: &str = "warn,shiori=info,shiori_core=info,shiori_api=info";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            if let Some(hint) = e.hint() {
                eprintln!("hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SHIORI_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { DEFAULT_LOG_FILTER })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.unwrap_or_else(ConfigStore::default_path);
    tracing::debug!(path = %config_path.display(), "loading config");
    let mut store = ConfigStore::load(config_path)?;

    match cli.command {
        Command::Watch {
            name,
            episode,
            force,
            dir,
        } => {
            let working_dir = match dir {
                Some(dir) => dir,
                None => std::env::current_dir().map_err(CliError::CurrentDir)?,
            };
            let request = WatchRequest {
                search_term: name,
                episode,
                forced_episode: force,
                working_dir,
            };

            let prepared = prepare_watch(&store, &request)?;
            let client = session::client(&mut store).await?;
            let report = complete_watch(&client, &mut store, &request, prepared).await?;

            match &report.outcome {
                SyncOutcome::Updated { entry, .. } => {
                    println!("{}: {}", entry.original_title, entry.progress_label());
                }
                SyncOutcome::Completed { entry } => {
                    println!(
                        "{}: {} completed, removed from the watch cache",
                        entry.original_title,
                        entry.progress_label()
                    );
                }
            }
            println!("moved to {}", report.moved_to.display());
        }

        Command::Sync => {
            let client = session::client(&mut store).await?;
            let count = refresh_cache(&client, &mut store).await?;
            println!("cached {count} currently-watching entries");
        }

        Command::List => {
            if store.cache().is_empty() {
                println!("cache is empty, run `shiori sync`");
            }
            for entry in store.cache() {
                match store.binding(&entry.library_id) {
                    Some(binding) => println!(
                        "{:>8}  {}  [{}]",
                        entry.progress_label(),
                        entry.original_title,
                        binding
                    ),
                    None => println!("{:>8}  {}", entry.progress_label(), entry.original_title),
                }
            }
        }

        Command::Login { username, password } => {
            session::login(&mut store, &username, &password).await?;
            println!("logged in as {username}");
        }
    }

    Ok(())
}
