use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use axum_server::{tls_rustls::RustlsConfig, Handle};
use tempfile::TempDir;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use webxr_serve::{tls, Result, Scheme, Server, TlsMaterial};

struct Running {
    addr: SocketAddr,
    stop: oneshot::Sender<()>,
    task: JoinHandle<Result<()>>,
}

async fn start(root: PathBuf, tls: Option<RustlsConfig>) -> Running {
    let handle = Handle::new();
    let (stop, stopped) = oneshot::channel::<()>();
    let server = Server::new("127.0.0.1:0".parse().unwrap(), root, tls);
    let task = tokio::spawn(server.run(handle.clone(), async move {
        let _ = stopped.await;
    }));
    let addr = handle.listening().await.expect("server did not bind");
    Running { addr, stop, task }
}

fn site() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>viewer</html>").unwrap();
    dir
}

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

fn assert_isolation_headers(response: &reqwest::Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["cross-origin-opener-policy"], "same-origin");
    assert_eq!(headers["cross-origin-embedder-policy"], "require-corp");
    assert_eq!(headers["cache-control"], "no-cache");
}

#[tokio::test]
async fn plain_http_end_to_end() {
    let dir = site();
    let running = start(dir.path().to_path_buf(), None).await;
    let base = format!("http://{}", running.addr);

    let response = client().get(format!("{base}/")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert_isolation_headers(&response);
    assert_eq!(response.text().await.unwrap(), "<html>viewer</html>");

    let response = client().get(format!("{base}/missing.js")).send().await.unwrap();
    assert_eq!(response.status(), 404);
    assert_isolation_headers(&response);

    let response = client()
        .request(reqwest::Method::OPTIONS, format!("{base}/missing.js"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_isolation_headers(&response);
    assert!(response.bytes().await.unwrap().is_empty());

    running.stop.send(()).unwrap();
}

#[tokio::test]
async fn tls_listener_serves_https() {
    let dir = site();
    let tls = TlsMaterial::locate(&fixtures()).unwrap().load().await.unwrap();
    let running = start(dir.path().to_path_buf(), Some(tls)).await;

    let response = client()
        .get(format!("https://{}/index.html", running.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_isolation_headers(&response);

    running.stop.send(()).unwrap();
}

#[tokio::test]
async fn tls_listener_rejects_plain_http() {
    let dir = site();
    let tls = TlsMaterial::locate(&fixtures()).unwrap().load().await.unwrap();
    let running = start(dir.path().to_path_buf(), Some(tls)).await;

    let result = client()
        .get(format!("http://{}/index.html", running.addr))
        .send()
        .await;
    assert!(result.is_err(), "plain request to TLS listener succeeded");

    running.stop.send(()).unwrap();
}

#[tokio::test]
async fn https_without_material_serves_plain_http() {
    let program_dir = site();
    std::fs::copy(fixtures().join("cert.pem"), program_dir.path().join("cert.pem")).unwrap();

    let tls = tls::resolve(true, program_dir.path()).await.unwrap();
    assert!(tls.is_none());

    let server = Server::new(
        "127.0.0.1:0".parse().unwrap(),
        program_dir.path().to_path_buf(),
        tls,
    );
    assert_eq!(server.scheme(), Scheme::Http);

    let running = start(program_dir.path().to_path_buf(), None).await;
    let response = client()
        .get(format!("http://{}/", running.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_isolation_headers(&response);

    running.stop.send(()).unwrap();
}

#[tokio::test]
async fn https_with_material_serves_tls() {
    let program_dir = site();
    for name in ["cert.pem", "key.pem"] {
        std::fs::copy(fixtures().join(name), program_dir.path().join(name)).unwrap();
    }

    let tls = tls::resolve(true, program_dir.path()).await.unwrap();
    assert!(tls.is_some());
    let running = start(program_dir.path().to_path_buf(), tls).await;

    let response = client()
        .get(format!("https://{}/", running.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    running.stop.send(()).unwrap();
}

#[tokio::test]
async fn shutdown_stops_accepting() {
    let dir = site();
    let running = start(dir.path().to_path_buf(), None).await;

    let response = client()
        .get(format!("http://{}/", running.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    drop(response);

    running.stop.send(()).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(10), running.task)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());

    assert!(tokio::net::TcpStream::connect(running.addr).await.is_err());
}

#[tokio::test]
async fn occupied_port_is_fatal() {
    let dir = site();
    let running = start(dir.path().to_path_buf(), None).await;

    let server = Server::new(running.addr, dir.path().to_path_buf(), None);
    let result = server.run(Handle::new(), std::future::pending()).await;
    assert!(matches!(result, Err(webxr_serve::Error::Io(_))));

    running.stop.send(()).unwrap();
}
