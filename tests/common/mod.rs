//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{body::Body, http::Request, Router};
use dynamic_proxy::config::ProxyConfig;
use dynamic_proxy::lifecycle::{bind_listeners, Shutdown};
use dynamic_proxy::HttpServer;
use tokio::net::TcpListener;

/// Start a mock backend that answers every request with `name`.
#[allow(dead_code)]
pub async fn start_mock_backend(name: &'static str) -> SocketAddr {
    start_backend(Router::new().fallback(move || async move { name })).await
}

/// Start a mock backend that echoes `<name> <method> <path?query>` plus
/// the forwarding headers it received.
#[allow(dead_code)]
pub async fn start_echo_backend(name: &'static str) -> SocketAddr {
    start_backend(Router::new().fallback(move |request: Request<Body>| async move {
        let header = |key: &str| {
            request
                .headers()
                .get(key)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-")
                .to_string()
        };
        format!(
            "{} {} {} xff={} rid={}",
            name,
            request.method(),
            request.uri(),
            header("x-forwarded-for"),
            header("x-request-id"),
        )
    }))
    .await
}

async fn start_backend(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// An address nothing listens on.
#[allow(dead_code)]
pub fn closed_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// A running proxy on ephemeral ports.
pub struct TestProxy {
    pub proxy: SocketAddr,
    pub admin: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestProxy {
    pub async fn start() -> Self {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "127.0.0.1:0".into();
        config.admin.bind_address = "127.0.0.1:0".into();
        config.timeouts.connect_secs = 1;

        let listeners = bind_listeners(&config).await.unwrap();
        let proxy = listeners.proxy.local_addr().unwrap();
        let admin = listeners.admin.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let server_shutdown = shutdown.clone();
        tokio::spawn(async move {
            let _ = HttpServer::new(config).run(listeners, &server_shutdown).await;
        });

        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap();

        Self {
            proxy,
            admin,
            client,
            shutdown,
        }
    }

    #[allow(dead_code)]
    pub fn proxy_url(&self, path: &str) -> String {
        format!("http://{}{}", self.proxy, path)
    }

    pub fn admin_url(&self) -> String {
        format!("http://{}/", self.admin)
    }

    /// POST a raw JSON payload to the admin listener.
    pub async fn post_route(&self, payload: &str) -> (u16, String) {
        let res = self
            .client
            .post(self.admin_url())
            .header("content-type", "application/json")
            .body(payload.to_string())
            .send()
            .await
            .unwrap();
        let status = res.status().as_u16();
        (status, res.text().await.unwrap())
    }

    /// GET the admin route listing as JSON.
    #[allow(dead_code)]
    pub async fn routes(&self) -> serde_json::Value {
        self.client
            .get(self.admin_url())
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    /// GET a path on the proxy listener.
    #[allow(dead_code)]
    pub async fn get(&self, path: &str) -> (u16, String) {
        let res = self.client.get(self.proxy_url(path)).send().await.unwrap();
        let status = res.status().as_u16();
        (status, res.text().await.unwrap())
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}
