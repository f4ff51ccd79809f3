use axum_server::Handle;
use clap::Parser;
use dotenv::dotenv;
use webxr_serve::{
    link_scene_data, program_dir, select_serving_root,
    server::{banner, lan_ip, shutdown_signal},
    tls, Config, Result, Server,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenv().ok();

    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Load configuration
    let config = Config::parse();
    let addr = config.socket_addr().await?;

    let program_dir = program_dir()?;
    let serving_root = select_serving_root(&program_dir);

    // Symlink data files if provided
    if let Some(source_dir) = &config.data {
        for outcome in link_scene_data(&serving_root, source_dir)? {
            println!("  {outcome}");
        }
    }

    let tls = tls::resolve(config.https, &program_dir).await?;

    let server = Server::new(addr, serving_root.clone(), tls);
    println!("{}\n", banner(&serving_root, server.scheme(), config.port, lan_ip()));

    server
        .run(Handle::new(), async {
            shutdown_signal().await;
            println!("\nShutting down.");
        })
        .await
}
