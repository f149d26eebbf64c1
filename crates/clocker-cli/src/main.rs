use anyhow::{Context, Result};
use clap::Parser;
use clocker_core::SystemClock;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use clocker_cli::{Cli, Config, Session, Termination, session, sink};

/// Resolves once Ctrl-C is received.
async fn interrupt() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so the echo and a stdout sink stay clean
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let options = cli.format_options(&config);
    let out = sink::open(cli.file.as_deref(), cli.open_mode())?;

    let mut session = Session::new(out, options, SystemClock);
    let mut echo = std::io::stdout();
    let stdin = BufReader::new(tokio::io::stdin());

    let termination = session::run(stdin, &mut echo, &mut session, interrupt())
        .await
        .context("clocker session failed")?;

    if termination == Termination::Interrupted {
        // The stdin reader may still be blocked; leave without waiting on it.
        std::process::exit(0);
    }

    Ok(())
}
