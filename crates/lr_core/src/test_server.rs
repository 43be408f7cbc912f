//! A tiny HTTP server for download tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

/// `(path, status, body)`. Requests to other paths get a 404.
pub type Route = (String, u16, Vec<u8>);

/// Counts every request the server receives.
#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Serves the routes built by `routes`, which gets the
/// server's base url (`http://127.0.0.1:<port>`, no trailing slash).
pub async fn serve_routes(routes: impl FnOnce(&str) -> Vec<Route>) -> (String, Hits) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let routes = Arc::new(routes(&base));
    let hits = Hits::default();
    let counter = hits.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            counter.0.fetch_add(1, Ordering::SeqCst);
            let mut buf = [0u8; 2048];
            let read = socket.read(&mut buf).await.unwrap_or(0);
            let request = String::from_utf8_lossy(&buf[..read]);
            let path = request.split_whitespace().nth(1).unwrap_or("/");

            let (status, body) = routes
                .iter()
                .find(|(route, _, _)| route == path)
                .map_or((404, &b"not found"[..]), |(_, status, body)| {
                    (*status, body.as_slice())
                });
            let head = format!(
                "HTTP/1.1 {status} X\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            _ = socket.write_all(head.as_bytes()).await;
            _ = socket.write_all(body).await;
            _ = socket.shutdown().await;
        }
    });

    (base, hits)
}

/// Serves `body` with `status` at `/file.bin`, returning its url.
pub async fn serve(status: u16, body: &[u8]) -> (String, Hits) {
    let body = body.to_vec();
    let (base, hits) =
        serve_routes(move |_| vec![("/file.bin".to_owned(), status, body)]).await;
    (format!("{base}/file.bin"), hits)
}
