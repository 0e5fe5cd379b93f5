//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use service_host::{Host, HostConfig, HostError};
use tokio::task::JoinHandle;

/// A host listening on an ephemeral loopback port.
pub struct RunningHost {
    pub host: Arc<Host>,
    pub addr: SocketAddr,
    pub task: JoinHandle<Result<(), HostError>>,
}

impl RunningHost {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Signal shutdown and wait for `listen` to return.
    pub async fn stop(self) -> Result<(), HostError> {
        self.host.stop();
        tokio::time::timeout(Duration::from_secs(5), self.task)
            .await
            .expect("host did not stop in time")
            .expect("listen task panicked")
    }
}

/// Build a host, let `setup` register services, then start it on 127.0.0.1:0.
pub async fn start_host<F>(config: HostConfig, setup: F) -> RunningHost
where
    F: FnOnce(&Host),
{
    let host = Arc::new(Host::new(config));
    setup(&host);

    let listening = Arc::clone(&host);
    let task = tokio::spawn(async move { listening.listen("127.0.0.1:0").await });

    let addr = tokio::time::timeout(Duration::from_secs(5), host.ready())
        .await
        .expect("host never became ready")
        .expect("host stopped before binding");

    RunningHost { host, addr, task }
}

/// HTTP/1.1 client without connection pooling or proxies.
#[allow(dead_code)]
pub fn http1_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// HTTP/2 cleartext client (prior knowledge, no upgrade).
#[allow(dead_code)]
pub fn h2c_client() -> reqwest::Client {
    reqwest::Client::builder()
        .http2_prior_knowledge()
        .no_proxy()
        .build()
        .unwrap()
}
