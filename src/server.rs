use std::net::SocketAddr;
use std::path::Path;

use hyper::Server;
use log::{info, warn};

use crate::config::ServeConfig;
use crate::error::ServeError;
use crate::service::AssetServiceMaker;

/// Bind the configured port and serve the root directory until the
/// process receives an interrupt.
pub async fn run(config: &ServeConfig) -> Result<(), ServeError> {
    let root = config.canonical_root()?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let builder = Server::try_bind(&addr).map_err(|source| ServeError::Bind { addr, source })?;
    let server = builder.serve(AssetServiceMaker::new(root.clone()));
    let local = server.local_addr();
    print_banner(local.port(), &root);
    info!("listening on {local}, serving {}", root.display());
    server.with_graceful_shutdown(shutdown_signal()).await?;
    println!("\nServer stopped.");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("interrupt received, shutting down"),
        Err(e) => {
            warn!("failed to install interrupt handler: {e}");
            // without a signal handler there is no shutdown trigger;
            // park instead of stopping a healthy server
            futures_util::future::pending::<()>().await;
        }
    }
}

fn print_banner(port: u16, root: &Path) {
    println!("Serving static assets with CORS enabled:");
    println!();
    println!("    http://localhost:{port}");
    println!("    http://0.0.0.0:{port}");
    println!();
    println!("  Serving from: {}", root.display());
    println!();
    println!("  Press Ctrl+C to stop");
}
