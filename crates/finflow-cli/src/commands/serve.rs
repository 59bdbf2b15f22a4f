//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use finflow_core::Config;
use finflow_server::ServerConfig;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    settings: &Config,
    host: &str,
    port: u16,
    allowed_origins: Vec<String>,
    no_encrypt: bool,
) -> Result<()> {
    println!("🚀 Starting finflow web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);

    if allowed_origins.is_empty() {
        println!("   🔒 CORS: same-origin only");
    } else {
        println!("   🌐 CORS origins: {}", allowed_origins.join(", "));
    }
    println!();

    let db = open_db(db_path, no_encrypt)?;
    let config = ServerConfig { allowed_origins };

    finflow_server::serve_with_config(db, settings, host, port, config)
        .await
        .context("Server error")
}
