//! Command-line and environment configuration.

use clap::{Args, Parser};
use notabene_server::service::ServiceConfig;

/// Command-line interface for the notabene server.
#[derive(Debug, Parser)]
#[command(name = "notabene", version, about = "HTTP API server for the notabene notes backend")]
pub struct Cli {
    /// Service configuration (database, authentication).
    #[command(flatten)]
    pub service: ServiceConfig,

    /// HTTP server configuration.
    #[command(flatten)]
    pub server: ServerConfig,
}

/// HTTP server bind and timeout settings.
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[arg(long = "host", env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(long = "port", env = "SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Per-request timeout in seconds.
    #[arg(
        long = "request-timeout-secs",
        env = "SERVER_REQUEST_TIMEOUT_SECS",
        default_value = "30"
    )]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Returns the socket address string to bind to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
