use crate::adapters::clock::SystemClock;
use crate::adapters::fixtures::ReqResFixtures;
use crate::adapters::fs::loader::JsonMappingSource;
use crate::app::engine::StubEngine;
use crate::client::admin::AdminClient;
use crate::config::ServerConfig;
use crate::domain::registry::StubRegistry;
use crate::server::http;
use anyhow::{Context as _, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A running stub server. Dropping it signals shutdown; [`MockServer::stop`]
/// also waits for the server task to finish.
pub struct MockServer {
    addr: SocketAddr,
    engine: StubEngine,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<()>>>,
}

impl MockServer {
    /// Build an engine from `config`, preload its mappings and start serving.
    pub async fn start(config: ServerConfig) -> Result<Self> {
        let registry = StubRegistry::with_journal_limit(config.journal_limit);
        let engine = StubEngine::with_parts(registry, Arc::new(SystemClock));

        if config.reqres_fixtures {
            engine.load_from(&ReqResFixtures::new(engine.clock()))?;
        }
        if let Some(path) = &config.mappings {
            engine.load_from(&JsonMappingSource::new(path))?;
        }

        Self::start_with_engine(engine, config.socket_addr()).await
    }

    pub async fn start_with_engine(engine: StubEngine, addr: SocketAddr) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind stub server to {addr}"))?;
        let addr = listener.local_addr()?;

        let (tx, rx) = oneshot::channel::<()>();
        let task = tokio::spawn(http::serve(listener, engine.clone(), async move {
            let _ = rx.await;
        }));

        Ok(Self {
            addr,
            engine,
            shutdown: Some(tx),
            task: Some(task),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Absolute URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url(), path)
        } else {
            format!("{}/{}", self.base_url(), path)
        }
    }

    pub fn engine(&self) -> &StubEngine {
        &self.engine
    }

    pub fn admin(&self) -> AdminClient {
        AdminClient::new(self.base_url())
    }

    pub async fn stop(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.await.context("stub server task failed to join")??;
        }
        tracing::info!(addr = %self.addr, "stub server stopped");
        Ok(())
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
