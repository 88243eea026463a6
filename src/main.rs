//! git-atlas - browse every git repository in a workspace directory
//!
//! # Usage
//! ```bash
//! git-atlas config set-root ~/code          # Remember the workspace root
//! git-atlas serve --port 3001               # Start the HTTP API
//! git-atlas list                            # Repositories in the workspace
//! git-atlas log my-repo --branch main       # Commit history
//! git-atlas show my-repo 1a2b3c4            # Full commit details
//! git-atlas clone https://host/owner/x.git  # Clone into the workspace
//! ```

use std::path::PathBuf;

use anyhow::Context;
use axum::Router;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use git_atlas::GitEngine;
use git_atlas::routes::{self, AppState};
use git_atlas::settings::Settings;

/// git-atlas - inspect the git repositories of a workspace directory
#[derive(Parser)]
#[command(name = "git-atlas")]
#[command(about = "Inspect every git repository in a workspace directory", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Workspace root (defaults to the saved directoryPath setting)
    #[arg(long, global = true, env = "GIT_ATLAS_ROOT", value_name = "DIR")]
    root: Option<PathBuf>,

    /// Settings file location
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Enable debug logging for git-atlas
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the operations over HTTP
    Serve {
        /// Port to run the server on
        #[arg(short, long, default_value = "3001", env = "GIT_ATLAS_PORT")]
        port: u16,
    },
    /// Create the workspace directory
    Setup,
    /// List repositories in the workspace
    List,
    /// Clone a repository into the workspace
    Clone {
        url: String,
        /// Target directory (defaults to <root>/<name from url>)
        target: Option<PathBuf>,
    },
    /// Show the commit history of a repository
    Log {
        repo: String,
        #[arg(short, long)]
        branch: Option<String>,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        #[arg(long, default_value = "0")]
        offset: usize,
    },
    /// List branches of a repository
    Branches { repo: String },
    /// Show full details of one commit
    Show { repo: String, hash: String },
    /// Manage persisted settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the current settings
    Show,
    /// Save the workspace root
    SetRoot { dir: PathBuf },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,git_atlas=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn settings_file(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => Settings::default_path().context("no config directory on this platform"),
    }
}

/// The `--root` flag, else the saved setting. The settings file is only read
/// when no root was passed.
fn configured_root(
    cli_root: Option<PathBuf>,
    settings_path: Option<PathBuf>,
) -> anyhow::Result<Option<PathBuf>> {
    if cli_root.is_some() {
        return Ok(cli_root);
    }
    let settings = Settings::load(&settings_file(settings_path)?)?;
    Ok(settings.directory_path)
}

fn resolve_root(
    cli_root: Option<PathBuf>,
    settings_path: Option<PathBuf>,
) -> anyhow::Result<PathBuf> {
    configured_root(cli_root, settings_path)?
        .context("no workspace root: pass --root or run `git-atlas config set-root <DIR>`")
}

async fn serve(engine: GitEngine, root: Option<PathBuf>, port: u16) -> anyhow::Result<()> {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::create_router(AppState::new(engine, root.clone())))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to port {} (try --port <PORT>)", port))?;

    let url = format!("http://{}", addr);
    println!();
    println!("  ┌─────────────────────────────────────────────┐");
    println!("  │                  git-atlas                  │");
    println!("  └─────────────────────────────────────────────┘");
    println!();
    match &root {
        Some(root) => println!("  Workspace: {}", root.display()),
        None => println!("  Workspace: (pass ?path= on each request)"),
    }
    println!("  Server:    {}", url);
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        println!("\n  Shutting down...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let engine = GitEngine::default();
    let command = cli.command.unwrap_or(Commands::Serve { port: 3001 });
    let (cli_root, settings_path) = (cli.root, cli.settings);

    match command {
        Commands::Serve { port } => {
            let root = configured_root(cli_root, settings_path)?;
            serve(engine, root, port).await?;
        }
        Commands::Setup => {
            let root = resolve_root(cli_root, settings_path)?;
            print_json(&engine.setup(root).await?)?;
        }
        Commands::List => {
            let root = resolve_root(cli_root, settings_path)?;
            print_json(&engine.list_repositories(root).await?)?;
        }
        Commands::Clone { url, target } => {
            let response = match target {
                Some(target) => engine.git_clone(url, target).await?,
                None => {
                    let root = resolve_root(cli_root, settings_path)?;
                    engine.git_clone_into_root(url, &root).await?
                }
            };
            print_json(&response)?;
        }
        Commands::Log {
            repo,
            branch,
            limit,
            offset,
        } => {
            let root = resolve_root(cli_root, settings_path)?;
            let page = engine
                .get_repository_commits(root, repo, branch, limit, offset)
                .await?;
            print_json(&page)?;
        }
        Commands::Branches { repo } => {
            let root = resolve_root(cli_root, settings_path)?;
            print_json(&engine.get_repository_branches(root, repo).await?)?;
        }
        Commands::Show { repo, hash } => {
            let root = resolve_root(cli_root, settings_path)?;
            print_json(&engine.get_commit_details(root, repo, hash).await?)?;
        }
        Commands::Config { action } => {
            let settings_path = settings_file(settings_path)?;
            let mut settings = Settings::load(&settings_path)?;
            match action {
                ConfigAction::Show => print_json(&settings)?,
                ConfigAction::SetRoot { dir } => {
                    let dir = std::fs::canonicalize(&dir).unwrap_or(dir);
                    settings.directory_path = Some(dir);
                    settings.save(&settings_path)?;
                    println!("Saved workspace root to {}", settings_path.display());
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_root_ignores_malformed_settings() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("settings.json");
        std::fs::write(&settings, "{ not json").unwrap();

        let root =
            resolve_root(Some(PathBuf::from("/srv/repos")), Some(settings.clone())).unwrap();
        assert_eq!(root, PathBuf::from("/srv/repos"));
        assert!(resolve_root(None, Some(settings)).is_err());
    }

    #[test]
    fn saved_root_is_used_without_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        Settings {
            directory_path: Some(PathBuf::from("/work")),
        }
        .save(&path)
        .unwrap();

        assert_eq!(resolve_root(None, Some(path)).unwrap(), PathBuf::from("/work"));
    }

    #[test]
    fn missing_settings_and_flag_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert_eq!(configured_root(None, Some(path.clone())).unwrap(), None);
        assert!(resolve_root(None, Some(path)).is_err());
    }
}
