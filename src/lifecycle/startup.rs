//! Startup orchestration.
//!
//! # Responsibilities
//! - Bind the proxy and admin listeners
//! - Fail fast: a listener that cannot bind is fatal
//!
//! # Design Decisions
//! - Both listeners are bound before either starts serving, so a bad
//!   address never leaves a half-started process

use tokio::net::TcpListener;

use crate::config::ProxyConfig;

/// Error raised while binding a listener.
#[derive(Debug, thiserror::Error)]
#[error("failed to bind {role} listener on {address}: {source}")]
pub struct BindError {
    pub role: &'static str,
    pub address: String,
    #[source]
    pub source: std::io::Error,
}

/// The bound proxy and admin listeners.
#[derive(Debug)]
pub struct Listeners {
    pub proxy: TcpListener,
    pub admin: TcpListener,
}

/// Bind both listeners from the configuration.
pub async fn bind_listeners(config: &ProxyConfig) -> Result<Listeners, BindError> {
    let proxy = bind("proxy", &config.listener.bind_address).await?;
    let admin = bind("admin", &config.admin.bind_address).await?;
    Ok(Listeners { proxy, admin })
}

async fn bind(role: &'static str, address: &str) -> Result<TcpListener, BindError> {
    let listener = TcpListener::bind(address).await.map_err(|source| BindError {
        role,
        address: address.to_string(),
        source,
    })?;

    if let Ok(local) = listener.local_addr() {
        tracing::info!(role, address = %local, "Listener bound");
    }
    Ok(listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_ephemeral_ports() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "127.0.0.1:0".into();
        config.admin.bind_address = "127.0.0.1:0".into();

        let listeners = bind_listeners(&config).await.unwrap();
        assert_ne!(
            listeners.proxy.local_addr().unwrap(),
            listeners.admin.local_addr().unwrap()
        );
    }

    #[tokio::test]
    async fn test_bind_failure_names_role() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "127.0.0.1:0".into();
        config.admin.bind_address = taken.local_addr().unwrap().to_string();

        let err = bind_listeners(&config).await.unwrap_err();
        assert_eq!(err.role, "admin");
    }
}
