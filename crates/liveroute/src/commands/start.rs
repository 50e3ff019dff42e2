//! Start command - runs the HTTP server in the foreground.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tracing::{info, warn};

use liveroute_config::{LiverouteConfig, LoadedConfig};
use liveroute_maps::{
    DISTANCE_MATRIX_URL, ExpandOptions, LinkExpander, RoutingClient, RoutingOptions,
};
use liveroute_server::{AppState, Server, ServerConfig};
use liveroute_session::{MemorySessionStore, SESSION_TTL, SessionStore, StoreConfig, spawn_sweeper};

use super::Context;

/// Arguments for the start command.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind to (overrides config)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Path to config file (replaces default discovery)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Run the start command.
pub async fn run(args: StartArgs, ctx: &Context) -> Result<()> {
    // ── Load configuration ──────────────────────────────────────────────

    let loaded = match args.config {
        Some(ref path) => LoadedConfig::from_file(path)?,
        None => liveroute_config::load_config(None)?,
    };

    for warning in &loaded.warnings {
        eprintln!("warning: {}", warning);
    }

    if ctx.verbose {
        let sources = loaded.loaded_from();
        if sources.is_empty() {
            println!("No config files found, using defaults + CLI args");
        } else {
            for source in sources {
                println!("Loaded config: {}", source.display());
            }
        }
    }

    let config = &loaded.config;

    // ── Server settings ─────────────────────────────────────────────────

    let server_config = server_config(config, &args)?;
    let addr = server_config.bind_address;

    // ── Session store ───────────────────────────────────────────────────

    let store_config = store_config(config);
    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new(store_config.clone()));

    // ── Collaborators ───────────────────────────────────────────────────

    let expand = config.expand();
    let expander = LinkExpander::new(ExpandOptions {
        user_agent: expand.user_agent.clone(),
        timeout: expand.timeout(),
        max_redirects: expand.max_redirects,
    })?;

    let mut state = AppState::new(store.clone(), server_config)?.with_expander(expander);

    let routing = config.routing();
    match routing.resolve_api_key() {
        Ok(key) => {
            let options = RoutingOptions {
                base_url: routing
                    .base_url
                    .clone()
                    .unwrap_or_else(|| DISTANCE_MATRIX_URL.to_string()),
                language: routing.language.clone(),
                timeout: routing.timeout(),
            };
            state = state.with_routing(RoutingClient::new(key, options)?);
        }
        Err(e) => {
            warn!(error = %e, "Route-time lookups disabled");
            eprintln!("warning: {e}; /api/calculate-time will return a config error");
        }
    }

    // ── Run ─────────────────────────────────────────────────────────────

    let sweeper = store_config
        .enable_sweeper
        .then(|| spawn_sweeper(store.clone(), store_config.sweep_interval));

    if !ctx.json_output {
        println!("Liveroute listening on http://{}", addr);
        println!("Session TTL: {}s", SESSION_TTL.as_secs());
    }

    let result = Server::new(state).run_until(shutdown_signal()).await;

    if let Some(handle) = sweeper {
        handle.abort();
    }

    result?;
    info!("Shutdown complete");
    Ok(())
}

/// Server settings from config, with CLI flags on top.
fn server_config(config: &LiverouteConfig, args: &StartArgs) -> Result<ServerConfig> {
    let mut server = config.server();
    if let Some(port) = args.port {
        server.port = port;
    }
    if let Some(ref bind) = args.bind {
        server.bind = bind.clone();
    }
    Ok(ServerConfig::try_from(&server)?)
}

fn store_config(config: &LiverouteConfig) -> StoreConfig {
    let session = config.session();
    StoreConfig::new()
        .with_payload_created_at(session.honor_payload_created_at)
        .with_sweeper(session.sweep)
        .with_sweep_interval(session.sweep_interval())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn args(port: Option<u16>, bind: Option<&str>) -> StartArgs {
        StartArgs {
            port,
            bind: bind.map(str::to_string),
            config: None,
        }
    }

    #[test]
    fn test_cli_flags_override_config() {
        let config = LiverouteConfig::from_toml(
            r#"
[server]
port = 8080
bind = "0.0.0.0"
"#,
        )
        .unwrap();

        let from_file = server_config(&config, &args(None, None)).unwrap();
        assert_eq!(from_file.bind_address, "0.0.0.0:8080".parse().unwrap());

        let overridden = server_config(&config, &args(Some(9001), Some("127.0.0.1"))).unwrap();
        assert_eq!(overridden.bind_address, "127.0.0.1:9001".parse().unwrap());
    }

    #[test]
    fn test_bad_bind_is_error() {
        let config = LiverouteConfig::default();
        assert!(server_config(&config, &args(None, Some("nowhere"))).is_err());
    }

    #[test]
    fn test_store_config_from_session_section() {
        let config = LiverouteConfig::from_toml(
            r#"
[session]
honor_payload_created_at = false
sweep = false
sweep_interval_secs = 5
"#,
        )
        .unwrap();

        let store = store_config(&config);
        assert!(!store.honor_payload_created_at);
        assert!(!store.enable_sweeper);
        assert_eq!(store.sweep_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_session_ttl_not_configurable() {
        let config = LiverouteConfig::from_toml("[session]\nttl_secs = 60\n").unwrap();
        let store = MemorySessionStore::new(store_config(&config));
        assert_eq!(store.stats().ttl, Duration::from_secs(4 * 3600));
    }
}
