//! Command line and environment configuration.

use clap::Parser;

use crate::domain::{DEFAULT_NICKNAME, Nickname};

/// Command line arguments of `hiroba-server`.
///
/// Every flag can also be supplied through its `HIROBA_*` environment variable.
#[derive(Parser, Debug, Clone)]
#[command(name = "hiroba-server")]
#[command(about = "Real-time presence, spot chat and direct messaging server", long_about = None)]
pub struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HIROBA_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "HIROBA_PORT", default_value = "8080")]
    pub port: u16,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "HIROBA_LOG_LEVEL", default_value = "debug")]
    pub log_level: String,

    /// Nickname of connections that have not sent setNickname yet
    #[arg(long, env = "HIROBA_DEFAULT_NICKNAME", default_value = DEFAULT_NICKNAME)]
    pub default_nickname: String,
}

/// Resolved server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub default_nickname: Nickname,
}

impl ServerConfig {
    /// `host:port` to bind the listener to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            log_level: args.log_level,
            default_nickname: Nickname::or_default(
                Some(args.default_nickname.as_str()),
                &Nickname::default(),
            ),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            log_level: "debug".to_string(),
            default_nickname: Nickname::default(),
        }
    }
}
