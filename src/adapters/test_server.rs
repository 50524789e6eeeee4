//! Local HTTP server for adapter tests. Binds 127.0.0.1 on a random port.

use axum::Router;

/// Serve `router` in the background and return its base URL (no trailing slash).
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    format!("http://{}", addr)
}
