// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal `/healthz` and `/metrics` endpoints, on the two separate
//! listeners `--health-probe-bind-address`/`--metrics-bind-address`
//! bind (matching the kubebuilder convention of keeping probe and
//! metrics surfaces independently reachable). No web framework — a
//! couple of raw listeners is simpler than a new dependency.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::metrics::Metrics;

async fn serve_one(addr: SocketAddr, respond: impl Fn(&str) -> (&'static str, &'static str, String) + Send + Sync + 'static) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    let respond = Arc::new(respond);
    loop {
        let (mut stream, _) = listener.accept().await?;
        let respond = respond.clone();
        tokio::spawn(async move {
            let mut buf = [0u8; 1024];
            let Ok(n) = stream.read(&mut buf).await else { return };
            let request = String::from_utf8_lossy(&buf[..n]);
            let path = request.lines().next().and_then(|line| line.split_whitespace().nth(1)).unwrap_or("/");

            let (status, content_type, body) = respond(path);
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes()).await;
        });
    }
}

/// Serves `/healthz` only, for `--health-probe-bind-address`.
pub async fn serve_health(addr: SocketAddr) -> std::io::Result<()> {
    tracing::info!(%addr, "health probe endpoint listening");
    serve_one(addr, |path| match path {
        "/healthz" => ("200 OK", "text/plain", "ok".to_string()),
        _ => ("404 Not Found", "text/plain", "not found".to_string()),
    })
    .await
}

/// Serves `/metrics` only, for `--metrics-bind-address`.
pub async fn serve_metrics(addr: SocketAddr, metrics: Arc<Metrics>) -> std::io::Result<()> {
    tracing::info!(%addr, "metrics endpoint listening");
    serve_one(addr, move |path| match path {
        "/metrics" => ("200 OK", "text/plain; version=0.0.4", metrics.gather()),
        _ => ("404 Not Found", "text/plain", "not found".to_string()),
    })
    .await
}
