//! formcraft CLI and REST API entry point.
//!
//! Binary name: `formcraft`
//!
//! Parses CLI arguments, loads configuration, then dispatches to the
//! terminal renderer, the config checker, or the session API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::fill::FormSource;
use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,formcraft_api=debug,formcraft_core=debug,formcraft_infra=debug",
        _ => "trace",
    };

    // The server gets span timing and optional OTel export; one-shot
    // commands keep the terse fmt output.
    if let Commands::Serve { otel, .. } = &cli.command {
        let directive = if cli.verbose == 0 && !cli.quiet {
            "info"
        } else {
            filter
        };
        formcraft_observe::tracing_setup::init_tracing(directive, *otel)
            .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(formcraft_observe::tracing_setup::env_filter(filter))
            .with_target(false)
            .init();
    }

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "formcraft", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(cli.api_url.clone()).await?;

    match cli.command {
        Commands::Fill {
            config,
            form_id,
            forms_dir,
            offline,
        } => {
            let source = match (config, form_id, forms_dir) {
                (Some(path), _, _) => FormSource::File(path),
                (None, Some(form_id), Some(dir)) => FormSource::Directory { dir, form_id },
                (None, Some(form_id), None) => FormSource::Remote(form_id),
                (None, None, _) => anyhow::bail!("a config file or --form-id is required"),
            };
            cli::fill::fill(&state, source, offline, cli.json).await?;
        }

        Commands::Check { config } => {
            cli::check::check(&config, cli.json).await?;
        }

        Commands::Serve { port, host, .. } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} formcraft session API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!(
                "  {}",
                console::style(format!("Forms from {}", state.config.api_base_url)).dim()
            );
            println!(
                "  {}",
                console::style(format!(
                    "Config from {}",
                    state.data_dir.join("config.toml").display()
                ))
                .dim()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            state.spawn_session_sweeper();
            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            formcraft_observe::tracing_setup::shutdown_tracing();
            println!("\n  Server stopped.");
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
