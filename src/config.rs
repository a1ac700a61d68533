//! Configuration for Kache
//!
//! Centralized configuration with sensible defaults.

/// Default TCP port, shared with the protocol this server imitates
pub const DEFAULT_PORT: u16 = 6379;

/// Main configuration for a Kache server
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address (host:port)
    pub listen_addr: String,

    // -------------------------------------------------------------------------
    // Worker Pool Configuration
    // -------------------------------------------------------------------------
    /// Number of worker threads servicing connections.
    /// Fixed for the lifetime of the server.
    pub worker_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: format!("0.0.0.0:{}", DEFAULT_PORT),
            worker_threads: available_parallelism(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Number of hardware execution contexts, or 1 if it cannot be determined
pub fn available_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Replace the port of the listen address, keeping the host
    pub fn port(mut self, port: u16) -> Self {
        let host = match self.config.listen_addr.rsplit_once(':') {
            Some((host, _)) => host.to_string(),
            None => self.config.listen_addr.clone(),
        };
        self.config.listen_addr = format!("{}:{}", host, port);
        self
    }

    /// Set the number of worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
