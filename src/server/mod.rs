use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use log::{error, info, warn};

use crate::config::AppConfig;

pub mod api;
pub mod routes;

/// Serve the lineup API until ctrl-c.
pub fn run_server(config: AppConfig) -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(Arc::new(config)))
}

async fn serve(config: Arc<AppConfig>) -> std::io::Result<()> {
    let bind_addr = config.server.bind.clone();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("tiller server listening on http://{bind_addr}");

    let app = Router::new().fallback(dispatch).with_state(config);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("could not listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn dispatch(
    State(config): State<Arc<AppConfig>>,
    method: Method,
    uri: Uri,
    body: String,
) -> Response {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let method_name = method.as_str().to_string();
    let log_path = path.clone();

    let routed = tokio::task::spawn_blocking(move || {
        routes::route_request(&method_name, &path, &body, &config)
    })
    .await;

    match routed {
        Ok(response) => {
            info!("{method} {log_path} -> {}", response.status_code);
            let status =
                StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                [(header::CONTENT_TYPE, response.content_type)],
                Body::from(response.body),
            )
                .into_response()
        }
        Err(err) => {
            error!("{method} {log_path} handler failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
