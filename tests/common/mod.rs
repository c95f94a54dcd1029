//! Shared utilities for integration testing.
#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use satto::config::{RouteConfig, SattoConfig};
use satto::{HttpServer, Shutdown, VersionToken};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const SHELL: &str = concat!(
    "<!DOCTYPE html>\n<html>\n<head>\n",
    "<link rel=\"stylesheet\" href=\"/styles.css\">\n",
    "</head>\n<body>\n<routes></routes>\n</body>\n</html>\n",
);

/// Start a mock data backend that always answers 200 with `body` as JSON.
pub async fn start_mock_backend(body: &'static str) -> SocketAddr {
    start_programmable_backend(move |_path| async move { (200, body.to_string()) }).await
}

/// Start a programmable mock backend. `f` receives the request path.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                let path = request
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or("/")
                    .to_string();

                let (status, body) = f(path).await;
                let status_text = match status {
                    200 => "200 OK",
                    404 => "404 Not Found",
                    500 => "500 Internal Server Error",
                    502 => "502 Bad Gateway",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// A throwaway project root on disk.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    /// Create a root holding only the default shell.
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src").join("index.html"), SHELL).unwrap();
        Self { dir }
    }

    /// Project root, i.e. the directory holding the shell and `app/`.
    pub fn root(&self) -> std::path::PathBuf {
        self.dir.path().join("src")
    }

    /// Write `app/<id>/<id>.<ext>`.
    pub fn page_file(&self, id: &str, ext: &str, content: &str) -> &Self {
        let dir = self.root().join("app").join(id);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("{id}.{ext}")), content).unwrap();
        self
    }

    /// Write a file under `static/`.
    pub fn static_file(&self, name: &str, content: &str) -> &Self {
        let dir = self.root().join("static");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(name), content).unwrap();
        self
    }

    /// Build a config serving this project on the given routes.
    pub fn config(&self, routes: &[(&str, &str)]) -> SattoConfig {
        let mut config = SattoConfig::default();
        config.project.root = self.root();
        config.routes = routes
            .iter()
            .map(|(path, page)| RouteConfig {
                path: path.to_string(),
                page: page.to_string(),
            })
            .collect();
        config
    }
}

/// Start the server on an ephemeral port.
pub async fn start_server(config: SattoConfig, version: VersionToken) -> (SocketAddr, Shutdown) {
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, version).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}
