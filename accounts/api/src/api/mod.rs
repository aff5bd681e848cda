use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::StatusCode;
use hyper_util::rt::TokioIo;
use serde_json::json;
use tokio::net::TcpSocket;
use tokio::select;
use utils::http::router::Router;
use utils::make_response;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::global::ApiGlobal;

pub mod extract;
pub mod request_context;
pub mod v1;

pub type Body = Full<Bytes>;

pub type Response = hyper::Response<Body>;

async fn health(_: hyper::Request<Incoming>) -> Result<Response, ApiError> {
	Ok(make_response!(StatusCode::OK, json!({ "status": "OK" })))
}

/// Renders a handler error as the JSON error body.
async fn error_handler(req: hyper::Request<()>, err: ApiError) -> Response {
	if err.status().is_server_error() {
		tracing::error!(method = %req.method(), path = req.uri().path(), status = err.status().as_u16(), kind = %err.kind(), "{}", err.message());
	} else {
		tracing::debug!(method = %req.method(), path = req.uri().path(), status = err.status().as_u16(), kind = %err.kind(), "{}", err.message());
	}

	make_response!(err.status(), err.to_json())
}

pub fn routes<G: ApiGlobal>(global: &Arc<G>) -> Router<Incoming, Body, ApiError> {
	let weak = Arc::downgrade(global);
	Router::builder()
		.data(weak)
		// Every request runs under its own context, a child of the global one.
		.middleware(request_context::request_context_middleware(global))
		.get("/health", health)
		.scope("/api/v1", v1::routes(global))
		.error_handler(error_handler)
		.not_found(|req: hyper::Request<Incoming>| async move {
			Err::<Response, _>(ApiError::not_found(format!("no route for {} {}", req.method(), req.uri().path())))
		})
		.build()
}

pub async fn run<G: ApiGlobal>(global: Arc<G>) -> anyhow::Result<()> {
	let config = global.config::<ApiConfig>();

	tracing::info!("Listening on {}", config.bind_address);
	let socket = if config.bind_address.is_ipv6() {
		TcpSocket::new_v6()?
	} else {
		TcpSocket::new_v4()?
	};

	socket.set_reuseaddr(true)?;
	socket.bind(config.bind_address)?;
	let listener = socket.listen(1024)?;

	// The router only keeps a weak reference to the global state so open
	// keep-alive connections do not hold up shutdown.
	let router = Arc::new(routes(&global));
	let service = service_fn(move |req| {
		let this = router.clone();
		async move { this.handle(req).await }
	});

	loop {
		select! {
			_ = global.ctx().done() => {
				return Ok(());
			},
			r = listener.accept() => {
				let (socket, addr) = r?;

				let service = service.clone();

				tracing::debug!("Accepted connection from {}", addr);

				tokio::spawn(async move {
					if let Err(err) = http1::Builder::new().serve_connection(TokioIo::new(socket), service).await {
						tracing::debug!(error = %err, "connection closed with error");
					}
				});
			},
		}
	}
}
