//! The groupdrop drop store daemon.
//!
//! Owns the authoritative `drops` table and evaluates joins server-side as a
//! single increment-with-clamp, so concurrent joiners cannot lose updates or
//! push a drop past its target.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use groupdrop_server::routes::router;
use groupdrop_server::store::DropTable;

#[derive(Parser)]
#[command(
    name = "groupdrop-server",
    about = "Authoritative drop store for the groupdrop storefront"
)]
struct Cli {
    /// HTTP port to listen on.
    #[arg(long, default_value_t = 3080)]
    port: u16,

    /// Path of the JSON snapshot file (default: under the OS cache dir).
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Keep the table in memory only; never touch the disk.
    #[arg(long)]
    ephemeral: bool,
}

fn default_data_file() -> PathBuf {
    let cache = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
    cache.join("groupdrop").join("drops.json")
}

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let snapshot = if cli.ephemeral {
        None
    } else {
        Some(cli.data_file.unwrap_or_else(default_data_file))
    };
    if let Some(path) = &snapshot {
        info!("snapshot file: {}", path.display());
    }

    let table = Arc::new(DropTable::load(snapshot));
    let app = router(table);

    let addr = format!("0.0.0.0:{}", cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");
    info!("drop store listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");

    info!("drop store shut down");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
