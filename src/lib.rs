pub mod app;
pub mod config;
pub mod error;
pub mod link;
pub mod paths;
pub mod server;
pub mod tls;

pub use app::create_routes;
pub use config::Config;
pub use error::{Error, Result};
pub use link::{link_scene_data, LinkOutcome};
pub use paths::{program_dir, select_serving_root};
pub use server::Server;
pub use tls::{Scheme, TlsMaterial};
