use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sivart::telemetry::{init_logging, LogFormat};
use sivart::travis::{TravisClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use sivart::{views, AppContext, Error};

#[derive(Debug, Parser)]
#[command(name = "sivart", version, about = "Travis CI status front-end")]
struct Cli {
    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::infer(), global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve and validate settings, then log a summary.
    Check,
    /// Print the status page context for a repository as JSON.
    Status {
        /// Repository slug, e.g. `owner/name`.
        repo_slug: String,
        #[arg(long, env = "SIVART_TRAVIS_URL", default_value = DEFAULT_BASE_URL)]
        api_url: String,
        /// Request timeout in seconds.
        #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
        timeout: u64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(cli.log_format) {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if matches!(err.downcast_ref::<Error>(), Some(Error::NotFound)) => {
            tracing::warn!("repository not found");
            ExitCode::from(2)
        }
        Err(err) => {
            tracing::error!("sivart failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> anyhow::Result<()> {
    // settings problems must stop startup before anything else happens
    let ctx = AppContext::from_env().context("failed to load settings")?;

    match command {
        Command::Check => {
            let settings = ctx.settings();
            tracing::info!(
                site_name = %settings.general.site_name,
                debug = settings.general.debug,
                database_engine = settings.database.engine.backend_name(),
                database_name = %settings.database.name,
                cache_backend = settings.cache.backend.backend_name(),
                cache_location = %settings.cache.location,
                build_id = ctx.build_id(),
                "settings ok"
            );
            tracing::debug!(?settings, "materialized settings");
        }
        Command::Status {
            repo_slug,
            api_url,
            timeout,
        } => {
            let client = TravisClient::with_base_url(&api_url, Duration::from_secs(timeout))?;
            let page = views::repo_page(&ctx, &client, &repo_slug)?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
    }

    Ok(())
}
