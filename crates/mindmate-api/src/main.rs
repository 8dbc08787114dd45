//! MindMate CLI and REST API entry point.
//!
//! Binary name: `mindmate`
//!
//! Parses CLI arguments, initializes database and services, then dispatches
//! to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use mindmate_infra::config::load_config;
use mindmate_infra::filesystem::resolve_data_dir;
use mindmate_observe::tracing_setup::{
    filter_for_verbosity, init_tracing, otel_requested_by_env, shutdown_tracing,
};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_tracing(
        filter_for_verbosity(cli.verbose, cli.quiet),
        cli.otel || otel_requested_by_env(),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Commands that don't need app state
    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(*shell, &mut cmd, "mindmate", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Screen { text } => {
            let config = load_config(&resolve_data_dir()).await;
            return cli::screen::screen(&config, text, cli.json);
        }
        _ => {}
    }

    let state = AppState::init().await?;

    match cli.command {
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {addr}"))?;

            if !cli.quiet {
                println!(
                    "  {} MindMate API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }
            tracing::info!(
                %addr,
                data_dir = %state.data_dir.display(),
                responder = %state.config.responder.base_url,
                "Server started"
            );

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::IssueKey { pseudonym } => {
            cli::key::issue_key(&state, pseudonym, cli.json).await?;
        }

        Commands::Sessions { pseudonym } => {
            cli::session::list_sessions(&state, &pseudonym, cli.json).await?;
        }

        Commands::Completions { .. } | Commands::Screen { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
