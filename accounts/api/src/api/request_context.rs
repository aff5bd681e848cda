use std::sync::Arc;
use std::time::Duration;

use hyper::body::Incoming;
use hyper::StatusCode;
use tokio::time::Instant;
use utils::context::{CancelReason, Context};
use utils::http::router::{Middleware, NextFn, RequestExt};
use utils::prelude::ContextExt;

use super::Body;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::global::ApiGlobal;

/// The context a request runs under, derived from the global context with
/// the request timeout as its deadline.
#[derive(Clone)]
pub struct RequestContext(pub Context);

impl RequestContext {
	pub fn ctx(&self) -> &Context {
		&self.0
	}
}

/// Batch requests get the job budget, everything else the API budget.
fn timeout_for(config: &ApiConfig, path: &str) -> Duration {
	if path.ends_with("/batch") {
		config.timeouts.job()
	} else {
		config.timeouts.api()
	}
}

/// How long a handler may run past its deadline to roll back and report the
/// timeout itself before the response is cut off.
const ROLLBACK_GRACE: Duration = Duration::from_millis(500);

pub fn shutting_down() -> ApiError {
	ApiError::custom(StatusCode::SERVICE_UNAVAILABLE, "service is shutting down")
}

pub fn request_context_middleware<G: ApiGlobal>(global: &Arc<G>) -> impl Middleware<Incoming, Body, ApiError> {
	let weak = Arc::downgrade(global);
	move |mut req: hyper::Request<Incoming>, next: NextFn<Incoming, Body, ApiError>| {
		let weak = weak.clone();
		async move {
			let ((outer, _outer_handler), (ctx, _handler)) = {
				let global = weak.upgrade().ok_or_else(shutting_down)?;
				let deadline = Instant::now() + timeout_for(global.config::<ApiConfig>(), req.uri().path());

				// Handlers see `ctx`. The response is only cut off once `outer` ends, so
				// an open transaction is rolled back by its own coordinator first.
				let outer = Context::with_parent(global.ctx().clone(), Some(deadline + ROLLBACK_GRACE));
				let ctx = Context::with_parent(outer.0.clone(), Some(deadline));
				(outer, ctx)
			};

			req.provide(RequestContext(ctx));

			match next(req).with_context(&outer).await {
				Ok(res) => res,
				Err(CancelReason::Deadline) => Err(ApiError::gateway_timeout("request timed out")),
				Err(CancelReason::Parent) if outer.is_expired() => Err(ApiError::gateway_timeout("request timed out")),
				Err(_) => Err(shutting_down()),
			}
		}
	}
}
