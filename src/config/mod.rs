// Configuration module entry point
// Loads the typed configuration and exposes the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, LoggingConfig, PerformanceConfig, ServerConfig, SpaConfig};

impl Config {
    /// Load configuration from the specified file path (without extension).
    ///
    /// The file is optional; coded defaults describe a working dev server,
    /// and `SERVER_*` environment variables override file values.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("spa.index_file", "index.html")?
            .set_default("spa.api_prefix", "/api/")?
            .set_default("spa.no_cache_extensions", vec!["js", "css"])?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Human-readable URL for the startup banner.
    ///
    /// `FRONTEND_URL` overrides the derived value; it only changes what is
    /// printed, never what the server binds to.
    pub fn display_url(&self) -> String {
        std::env::var("FRONTEND_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", self.server.port))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config_file() {
        let config = Config::load_from("definitely-missing-config").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.spa.index_file, "index.html");
        assert_eq!(config.spa.api_prefix, "/api/");
        assert_eq!(config.spa.no_cache_extensions, vec!["js", "css"]);
        assert!(config.spa.root.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let config = test_support::test_config();
        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_display_url_defaults_to_port() {
        let mut config = test_support::test_config();
        config.server.port = 3001;
        // FRONTEND_URL is not set in the test environment
        assert_eq!(config.display_url(), "http://localhost:3001");
    }
}
