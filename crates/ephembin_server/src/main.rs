//! Headless API server entrypoint.

use ephembin_server::reaper::spawn_reaper;
use ephembin_server::{
    config::Config, resolve_bind_address, serve_router, AppState, PasteStore, DEFAULT_PORT,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn parse_cli_flags(args: &[String]) -> anyhow::Result<bool> {
    let mut help = false;
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" => help = true,
            value => {
                anyhow::bail!(
                    "Unknown argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(help)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ephembin_server=info,ephembin_core=info,tower_http=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if parse_cli_flags(&args)? {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();
    let store = Arc::new(PasteStore::new());
    let reaper = spawn_reaper(
        Arc::clone(&store),
        Duration::from_secs(config.sweep_interval_secs),
    );
    let state = AppState::new(config.clone(), store);

    let allow_public = ephembin_server::config::env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    if allow_public {
        tracing::warn!("Public access enabled - server will accept requests from any origin");
    }

    let bind_addr = resolve_bind_address(&config, allow_public);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Binding to non-localhost address: {} - ensure proper security measures are in place",
            bind_addr
        );
    }

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("ephembin running at http://{}", actual_addr);

    let serve_result = serve_router(listener, state, allow_public, shutdown_signal()).await;

    reaper.abort();
    serve_result?;

    Ok(())
}

fn print_help() {
    println!("ephembin server\n");
    println!("Usage: ephembin [OPTIONS]\n");
    println!("Options:");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables:");
    println!("  PORT                 Server port (default: {})", DEFAULT_PORT);
    println!("  MAX_PASTE_SIZE       Maximum paste size in bytes (default: 1MB)");
    println!("  SWEEP_INTERVAL_SECS  Reaper sweep interval (default: 30)");
    println!("  BASE_URL             Public base URL used in paste links");
    println!("  ALLOW_PUBLIC_ACCESS  Allow CORS from any origin");
    println!(
        "  BIND                 Override bind address (e.g. 0.0.0.0:{})",
        DEFAULT_PORT
    );
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
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

#[cfg(test)]
mod tests {
    use super::parse_cli_flags;

    #[test]
    fn parse_cli_flags_accepts_help() {
        let args = vec!["ephembin".to_string(), "--help".to_string()];
        assert!(parse_cli_flags(&args).expect("help should parse"));
    }

    #[test]
    fn parse_cli_flags_defaults_to_serving() {
        let args = vec!["ephembin".to_string()];
        assert!(!parse_cli_flags(&args).expect("no flags should parse"));
    }

    #[test]
    fn parse_cli_flags_rejects_unknown_arguments() {
        let cases = [
            vec!["ephembin".to_string(), "--hlep".to_string()],
            vec!["ephembin".to_string(), "serve".to_string()],
        ];
        for args in cases {
            let err = parse_cli_flags(&args).expect_err("invalid args should be rejected");
            assert!(err.to_string().contains("Unknown argument"));
        }
    }
}
