//! Server configuration.
//!
//! Values come from command-line flags or the process environment. `main` loads a `.env` file
//! with `dotenvy` before parsing, so the same variables can live there.
//!
//! | Variable                     | Flag                 | Default   |
//! |------------------------------|----------------------|-----------|
//! | `PORT`                       | `--port`             | required  |
//! | `HOST`                       | `--host`             | `0.0.0.0` |
//! | `MATRIXOPS_MAX_UPLOAD_BYTES` | `--max-upload-bytes` | 2 MiB     |

use std::net::{IpAddr, SocketAddr};

use clap::Args;

/// Default upload limit, the same as axum's own default body limit.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Largest accepted request body, in bytes
    #[arg(long, env = "MATRIXOPS_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            host: IpAddr::from([0, 0, 0, 0]),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: ServerConfig,
    }

    #[test]
    fn test_flags() {
        let cli = TestCli::try_parse_from(["test", "--port", "8080", "--host", "127.0.0.1"]).unwrap();

        assert_eq!(cli.config.port, 8080);
        assert_eq!(cli.config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(cli.config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn test_invalid_host_rejected() {
        let result = TestCli::try_parse_from(["test", "--port", "8080", "--host", "not-an-ip"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::new(3000);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
    }
}
