//! atlas-index — create a search index and wait for it to become queryable.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use atlas_index::{
    IndexDefinition, IndexKind, IndexSpec, ProvisionConfig, ShellCoordinator,
    StatusSource, TimeoutPolicy, extract,
};

#[derive(Parser, Debug)]
#[command(name = "atlas-index")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file; ATLAS_INDEX_* variables override it.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Run the shell inside this container instead of on the host.
    #[arg(long, global = true)]
    container: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit an index definition and wait until it is READY.
    Provision {
        #[arg(long)]
        collection: String,
        #[arg(long)]
        name: String,
        /// text | vector
        #[arg(long, value_parser = parse_kind)]
        kind: IndexKind,
        /// File holding the index definition, embedded verbatim.
        #[arg(long)]
        spec_file: PathBuf,
        #[arg(long)]
        max_attempts: Option<u32>,
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Return the last status instead of failing when attempts run out.
        #[arg(long)]
        soft_timeout: bool,
    },
    /// Print the current status of one index.
    Status {
        #[arg(long)]
        collection: String,
        #[arg(long)]
        name: String,
    },
}

fn parse_kind(raw: &str) -> std::result::Result<IndexKind, String> {
    raw.parse().map_err(|e: atlas_index::Error| e.to_string())
}

fn load_config(args: &Args) -> Result<ProvisionConfig> {
    let mut config = match &args.config {
        Some(path) => ProvisionConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ProvisionConfig::default(),
    };
    config = config.with_env_overrides()?;
    if let Some(name) = &args.container {
        config = config.with_container(name.clone());
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("atlas_index=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("atlas_index=info"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = load_config(&args)?;

    match args.command {
        Command::Provision {
            collection,
            name,
            kind,
            spec_file,
            max_attempts,
            interval_ms,
            soft_timeout,
        } => {
            if let Some(n) = max_attempts {
                config.poll.max_attempts = n;
            }
            if let Some(ms) = interval_ms {
                config.poll.interval_ms = ms;
            }
            if soft_timeout {
                config.poll.timeout_policy = TimeoutPolicy::ReturnLast;
            }

            let spec = IndexSpec::from_file(&spec_file)
                .with_context(|| format!("reading {}", spec_file.display()))?;
            let definition = IndexDefinition::new(collection, name, kind, spec);
            let coordinator = ShellCoordinator::from_config(&config)?;

            let cancel = CancellationToken::new();
            let on_ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_ctrl_c.cancel();
                }
            });

            tracing::info!(
                max_wait_ms = coordinator.poller().config().max_wait().as_millis() as u64,
                "provisioning {} index '{}' on '{}'",
                definition.kind,
                definition.name,
                definition.collection
            );
            let report = coordinator
                .provision_and_wait_with_cancel(&definition, &cancel)
                .await?;

            println!("{}", report.status);
            if report.timed_out {
                tracing::warn!(
                    elapsed_ms = report.elapsed.as_millis() as u64,
                    "gave up waiting; index may not be queryable yet"
                );
            }
        }
        Command::Status { collection, name } => {
            let coordinator = ShellCoordinator::from_config(&config)?;
            let entries = coordinator
                .poller()
                .source()
                .list_search_indexes(&collection, &name)
                .await?;
            println!("{}", extract::status_of(&name, entries.first()));
        }
    }

    Ok(())
}
