//! Common test utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use liveroute_maps::{RoutingClient, RoutingOptions};
use liveroute_server::{AppState, Server, ServerConfig};
use liveroute_session::{ManualClock, MemorySessionStore, StoreConfig};

/// A test server that runs in the background.
pub struct TestServer {
    /// The server's address.
    pub addr: SocketAddr,
    /// HTTP client for this server.
    pub client: Client,
    /// Clock seen by the session store.
    pub clock: ManualClock,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Start a server without a routing client.
    pub async fn start() -> Result<Self> {
        Self::start_with_routing(None).await
    }

    /// Start a server whose Distance Matrix calls go to `base_url`.
    pub async fn start_with_routing(base_url: Option<String>) -> Result<Self> {
        let addr = find_available_port().await?;
        let clock = ManualClock::new(1_700_000_000_000);

        let store = Arc::new(MemorySessionStore::with_clock(
            StoreConfig::default().with_sweeper(false),
            clock.clone(),
        ));
        let config = ServerConfig::new()
            .with_bind_address(addr)
            .with_request_logging(false);

        let mut state = AppState::new(store, config)?;
        if let Some(base_url) = base_url {
            let options = RoutingOptions {
                base_url,
                ..Default::default()
            };
            state = state.with_routing(RoutingClient::new("test-key", options)?);
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = Server::new(state);
        let handle = tokio::spawn(async move {
            let _ = server
                .run_until(async {
                    shutdown_rx.await.ok();
                })
                .await;
        });

        let client = Client::new();
        wait_for_server(&client, addr).await?;

        Ok(Self {
            addr,
            client,
            clock,
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Get the base URL for the server.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(format!("{}{}", self.base_url(), path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.post(format!("{}{}", self.base_url(), path))
    }

    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.put(format!("{}{}", self.base_url(), path))
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.delete(format!("{}{}", self.base_url(), path))
    }

    /// Stop the server and wait for it to drain.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            timeout(Duration::from_secs(5), handle).await??;
        }
        Ok(())
    }
}

/// Find an available port for the test server.
async fn find_available_port() -> Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(addr)
}

/// Wait for the server to become ready.
async fn wait_for_server(client: &Client, addr: SocketAddr) -> Result<()> {
    let url = format!("http://{}/health", addr);

    let result = timeout(Duration::from_secs(5), async {
        loop {
            match client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => return,
                _ => tokio::time::sleep(Duration::from_millis(50)).await,
            }
        }
    })
    .await;

    match result {
        Ok(()) => Ok(()),
        Err(_) => anyhow::bail!("Timeout waiting for server to start"),
    }
}
