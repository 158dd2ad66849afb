use std::net::IpAddr;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | BIND_ADDR | 127.0.0.1 | Listen address (loopback by design) |
/// | HTTP_PORT | 8888 | HTTP API port |
/// | REQUEST_TIMEOUT_MS | 30000 | Per-request timeout (ms) |
/// | PRINT_MOCK | false | Force mock printers (no hardware I/O) |
///
/// # Example
///
/// ```ignore
/// HTTP_PORT=9099 PRINT_MOCK=1 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen address. Loopback by default: the bridge deliberately has
    /// no auth and no TLS, so it must not face the network.
    pub bind_addr: IpAddr,
    /// HTTP API port
    pub http_port: u16,
    /// Per-request timeout in milliseconds - the only bounded-latency
    /// guard over in-flight transport I/O
    pub request_timeout_ms: u64,
    /// Force the mock fallback for every printer kind
    pub mock_printers: bool,
}

impl Config {
    /// Load configuration, with env-var overrides over defaults
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR")
                .ok()
                .and_then(|a| a.parse().ok())
                .unwrap_or_else(|| "127.0.0.1".parse().expect("valid literal")),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8888),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            mock_printers: std::env::var("PRINT_MOCK")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// Override the listen port and mock flag - used by tests
    pub fn with_overrides(http_port: u16, mock_printers: bool) -> Self {
        let mut config = Self::from_env();
        config.http_port = http_port;
        config.mock_printers = mock_printers;
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
