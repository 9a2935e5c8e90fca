//! HTTP server

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use notas_core::error::{Error, Result};

use crate::handlers::Body;
use crate::routes::ApiRouter;

/// Bind the listening socket
pub async fn bind(addr: &str) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Server(format!("Failed to bind {}: {}", addr, e)))
}

/// Accept connections until `shutdown` resolves
pub async fn run_server(
    listener: TcpListener,
    router: Arc<ApiRouter>,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("📚 Notas API listening on http://{}", addr);
    }

    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!("Accept error: {}", e);
                    continue;
                }
            },
            _ = &mut shutdown => {
                tracing::info!("🛑 Shutting down");
                return Ok(());
            }
        };

        let io = TokioIo::new(stream);
        let router = router.clone();

        tokio::task::spawn(async move {
            if let Err(err) = http1::Builder::new()
                .serve_connection(io, service_fn(move |req| handle_request(req, router.clone())))
                .await
            {
                tracing::debug!("Error serving connection from {}: {:?}", peer, err);
            }
        });
    }
}

async fn handle_request(
    req: Request<hyper::body::Incoming>,
    router: Arc<ApiRouter>,
) -> std::result::Result<Response<Body>, Infallible> {
    let resp = router.handle(req.method(), req.uri()).await;
    tracing::debug!("{} {} -> {}", req.method(), req.uri(), resp.status().as_u16());
    Ok(resp)
}
