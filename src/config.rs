use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::error::{Error, Result};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// WebXR viewer HTTP server
#[derive(Parser, Debug, Clone)]
#[command(name = "webxr-serve", version, about = "WebXR viewer HTTP server")]
pub struct Config {
    /// Port to listen on
    #[arg(
        long,
        env = "WEBXR_PORT",
        default_value_t = DEFAULT_PORT,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub port: u16,

    /// Interface address to bind
    #[arg(long, env = "WEBXR_BIND", default_value = DEFAULT_BIND)]
    pub bind: String,

    /// Path to directory containing scene.ply + scene.4d.bin
    #[arg(long, env = "WEBXR_DATA")]
    pub data: Option<PathBuf>,

    /// Enable HTTPS (requires cert.pem + key.pem next to the executable)
    #[arg(long)]
    pub https: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            data: None,
            https: false,
        }
    }
}

impl Config {
    /// Resolves `bind:port` to the first matching socket address. Host names
    /// such as `localhost` are accepted as well as literal IPs.
    pub async fn socket_addr(&self) -> Result<SocketAddr> {
        tokio::net::lookup_host((self.bind.as_str(), self.port))
            .await
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| Error::Address {
                bind: self.bind.clone(),
                port: self.port,
            })
    }
}
