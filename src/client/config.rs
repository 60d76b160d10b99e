//! Configuration for the Canopy client.

/// Default retry budget for transaction write conflicts.
///
/// Bounded so sustained contention degrades into a visible conflict result
/// instead of spinning forever; `TransactionOptions::unbounded()` lifts the
/// cap explicitly.
pub const DEFAULT_TRANSACTION_RETRIES: u32 = 25;

/// Configuration for the Canopy client.
///
/// # Example
///
/// ```
/// use canopy_rs::ClientConfig;
///
/// let config = ClientConfig {
///     request_timeout_ms: 10_000,
///     ..Default::default()
/// };
/// assert_eq!(config.max_total_connections, 100); // Default
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Maximum time to wait for a request to complete, in milliseconds.
    pub request_timeout_ms: u64,

    /// Maximum time to wait for a connection to be established, in seconds.
    pub connection_timeout_secs: u64,

    /// Maximum idle connections kept per host.
    pub max_total_connections: u32,

    /// Proxy URL (optional). If set, requests are routed through this proxy.
    pub proxy_url: String,

    /// Enable request logging through the `tracing` crate.
    pub enable_logging: bool,

    /// Retry budget used by `transaction` when the caller gives no options.
    /// `None` retries conflicts without a cap.
    pub default_transaction_retries: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            request_timeout_ms: 30_000,
            connection_timeout_secs: 30,
            max_total_connections: 100,
            proxy_url: String::new(),
            enable_logging: false,
            default_transaction_retries: Some(DEFAULT_TRANSACTION_RETRIES),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.request_timeout_ms, 30_000);
        assert_eq!(config.connection_timeout_secs, 30);
        assert!(!config.enable_logging);
        assert_eq!(
            config.default_transaction_retries,
            Some(DEFAULT_TRANSACTION_RETRIES)
        );
    }

    #[test]
    fn test_partial_override() {
        let config = ClientConfig {
            request_timeout_ms: 5_000,
            ..Default::default()
        };
        assert_eq!(config.request_timeout_ms, 5_000);
        assert_eq!(config.max_total_connections, 100);
    }

    #[test]
    fn test_clone_eq() {
        let config = ClientConfig::default();
        assert_eq!(config, config.clone());
    }
}
