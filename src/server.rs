use std::future::Future;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use axum_server::{tls_rustls::RustlsConfig, Handle};

use crate::app::create_routes;
use crate::error::Result;
use crate::tls::Scheme;

pub const PRODUCT_NAME: &str = "FreeSplat4D WebXR Viewer";

/// How long open connections get to finish once shutdown starts.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

pub struct Server {
    addr: SocketAddr,
    serving_root: PathBuf,
    tls: Option<RustlsConfig>,
}

impl Server {
    pub fn new(addr: SocketAddr, serving_root: PathBuf, tls: Option<RustlsConfig>) -> Self {
        Self {
            addr,
            serving_root,
            tls,
        }
    }

    pub fn scheme(&self) -> Scheme {
        if self.tls.is_some() {
            Scheme::Https
        } else {
            Scheme::Http
        }
    }

    /// Serves until `shutdown` resolves, then stops accepting connections and
    /// returns once in-flight ones finish or the grace period runs out.
    /// `handle` reports the bound address through `Handle::listening`.
    pub async fn run<F>(self, handle: Handle, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if !self.serving_root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("serving root {} is not a directory", self.serving_root.display()),
            )
            .into());
        }

        let app = create_routes(&self.serving_root)
            .into_make_service_with_connect_info::<SocketAddr>();

        let watcher = tokio::spawn({
            let handle = handle.clone();
            async move {
                shutdown.await;
                handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
            }
        });

        log::info!("listening on {}://{}", self.scheme(), self.addr);
        let result = match self.tls {
            Some(config) => {
                axum_server::bind_rustls(self.addr, config)
                    .handle(handle)
                    .serve(app)
                    .await
            }
            None => axum_server::bind(self.addr).handle(handle).serve(app).await,
        };
        watcher.abort();

        Ok(result?)
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            log::error!("failed to listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                log::error!("failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// LAN address a headset on the same network can reach us at.
pub fn lan_ip() -> Option<IpAddr> {
    local_ip_address::local_ip().ok()
}

pub fn banner(serving_root: &Path, scheme: Scheme, port: u16, lan_ip: Option<IpAddr>) -> String {
    let host = lan_ip
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "<your-ip>".to_string());

    let mut lines = vec![
        PRODUCT_NAME.to_string(),
        format!("  Serving: {}", serving_root.display()),
        format!("  URL:     {scheme}://localhost:{port}/"),
        format!("  VR URL:  {scheme}://{host}:{port}/"),
    ];
    if scheme == Scheme::Http {
        lines.push(
            "  Note: WebXR requires HTTPS on non-localhost. Use --https for VR headsets."
                .to_string(),
        );
    }
    lines.join("\n")
}
