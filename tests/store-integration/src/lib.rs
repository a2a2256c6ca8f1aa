//! Test harness for the drop store: spins the real router on an ephemeral
//! port and hands back its base URL, so tests exercise the same HTTP surface
//! the browser does.

use std::net::SocketAddr;
use std::sync::Arc;

use groupdrop_server::routes::router;
use groupdrop_server::store::DropTable;

/// Start an in-process drop store with seed data on an ephemeral port.
/// Returns the base URL and a handle to the table for direct assertions.
pub async fn spawn_store() -> (String, Arc<DropTable>) {
    let table = Arc::new(DropTable::load(None));
    let app = router(table.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr: SocketAddr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    (format!("http://{addr}"), table)
}
