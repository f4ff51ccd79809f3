use std::fmt;
use std::path::{Path, PathBuf};

use axum_server::tls_rustls::RustlsConfig;

use crate::error::{Error, Result};

pub const CERT_FILE: &str = "cert.pem";
pub const KEY_FILE: &str = "key.pem";

/// Produces a self-signed pair accepted by headsets after a one-time warning.
pub const GENERATE_CERT_COMMAND: &str = r#"openssl req -x509 -newkey rsa:2048 -keyout key.pem -out cert.pem -days 365 -nodes -subj "/CN=localhost""#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => f.write_str("http"),
            Scheme::Https => f.write_str("https"),
        }
    }
}

/// Certificate and key found in the program directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsMaterial {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

impl TlsMaterial {
    /// Returns `None` unless both `cert.pem` and `key.pem` exist.
    pub fn locate(program_dir: &Path) -> Option<Self> {
        let cert_path = program_dir.join(CERT_FILE);
        let key_path = program_dir.join(KEY_FILE);
        (cert_path.exists() && key_path.exists()).then_some(Self {
            cert_path,
            key_path,
        })
    }

    pub async fn load(&self) -> Result<RustlsConfig> {
        RustlsConfig::from_pem_file(&self.cert_path, &self.key_path)
            .await
            .map_err(|source| Error::Tls {
                cert: self.cert_path.clone(),
                key: self.key_path.clone(),
                source,
            })
    }
}

/// Decides the transport once at startup. TLS is used only when `https` is
/// requested and both files exist in `program_dir`; a request without the
/// files warns, prints how to generate them and falls back to plain HTTP.
pub async fn resolve(https: bool, program_dir: &Path) -> Result<Option<RustlsConfig>> {
    if !https {
        return Ok(None);
    }

    match TlsMaterial::locate(program_dir) {
        Some(material) => Ok(Some(material.load().await?)),
        None => {
            log::warn!(
                "--https requested but {CERT_FILE}/{KEY_FILE} not found in {}",
                program_dir.display()
            );
            println!("WARNING: --https requested but {CERT_FILE}/{KEY_FILE} not found.");
            println!("Generate with:");
            println!("  {GENERATE_CERT_COMMAND}");
            println!("Falling back to HTTP.\n");
            Ok(None)
        }
    }
}
