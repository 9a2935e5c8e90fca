//! Notas - list and serve a directory of documents
//!
//! This is the main entry point for the Notas CLI. Every subcommand is a
//! thin front end over the same listing and serving core.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use notas_core::config::{ConfigLoader, NotasConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration file picked up from the working directory
const DEFAULT_CONFIG: &str = "notas.toml";

/// Notas - document listing and download server
#[derive(Parser)]
#[command(name = "notas")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (JSON or TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the listing and file endpoints over HTTP
    Serve {
        /// Address to listen on
        #[arg(long)]
        listen: Option<String>,

        /// Document directory
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Write the listing to a static JSON manifest
    Index {
        /// Manifest path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Document directory
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Print the listing as JSON
    List {
        /// Document directory
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Validate a configuration file
    Validate,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::load_or_default(cli.config.as_ref(), Path::new(DEFAULT_CONFIG))?;

    let level = if cli.verbose { "debug" } else { config.logging.level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Serve { listen, dir } => {
            if let Some(listen) = listen {
                config.server.listen = listen;
            }
            override_dir(&mut config, dir);
            config.validate()?;
            serve(config).await?;
        }

        Commands::Index { output, dir } => {
            if let Some(output) = output {
                config.index.output = output;
            }
            override_dir(&mut config, dir);
            config.validate()?;

            let (lister, _) = notas_static::from_config(&config);
            let files = notas_static::write_index(&lister, &config.index.output)
                .await
                .context("Error updating file list")?;

            println!("✅ Updated {} with {} files.", config.index.output.display(), files.len());
            let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
            println!("Files found: {}", names.join(", "));
        }

        Commands::List { dir } => {
            override_dir(&mut config, dir);
            config.validate()?;

            let (lister, _) = notas_static::from_config(&config);
            let files = lister.list().await?;
            println!("{}", serde_json::to_string(&files)?);
        }

        Commands::Validate => {
            let source = cli
                .config
                .as_deref()
                .unwrap_or(Path::new(DEFAULT_CONFIG))
                .display()
                .to_string();
            match config.validate() {
                Ok(()) => println!("✅ Configuration '{}' is valid!", source),
                Err(e) => {
                    eprintln!("❌ Configuration Error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Version => {
            println!("Notas v{}", notas_core::VERSION);
        }
    }

    Ok(())
}

fn override_dir(config: &mut NotasConfig, dir: Option<PathBuf>) {
    if let Some(dir) = dir {
        config.library.dir = dir;
    }
}

async fn serve(config: NotasConfig) -> anyhow::Result<()> {
    tracing::info!("🚀 Starting Notas v{}", notas_core::VERSION);
    tracing::info!(
        "📁 Serving *.{} from {} ({:?} locators)",
        config.library.extension,
        config.library.dir.display(),
        config.library.locator
    );

    let router = Arc::new(notas_api::ApiRouter::new(&config)?);
    let listener = notas_api::bind(&config.server.listen).await?;

    notas_api::run_server(listener, router, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("❌ Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["notas", "serve", "--listen", "127.0.0.1:9000", "--dir", "docs"]).unwrap();
        match cli.command {
            Commands::Serve { listen, dir } => {
                assert_eq!(listen.as_deref(), Some("127.0.0.1:9000"));
                assert_eq!(dir, Some(PathBuf::from("docs")));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_override_dir() {
        let mut config = NotasConfig::default();
        override_dir(&mut config, None);
        assert_eq!(config.library.dir, PathBuf::from("notas"));
        override_dir(&mut config, Some(PathBuf::from("public/notas")));
        assert_eq!(config.library.dir, PathBuf::from("public/notas"));
    }
}
