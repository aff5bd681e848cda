use std::sync::Arc;

use hyper::body::Incoming;
use utils::http::router::{Router, RouterBuilder};
use uuid::Uuid;

use super::Body;
use crate::error::ApiError;
use crate::global::ApiGlobal;

pub mod organizations;
pub mod users;

/// One element of a batch update body.
#[derive(Debug, serde::Deserialize)]
pub struct BatchPatch<P> {
	pub id: Uuid,
	pub patch: P,
}

impl<P> From<BatchPatch<P>> for (Uuid, P) {
	fn from(item: BatchPatch<P>) -> Self {
		(item.id, item.patch)
	}
}

pub fn routes<G: ApiGlobal>(global: &Arc<G>) -> RouterBuilder<Incoming, Body, ApiError> {
	Router::builder()
		.scope("/organizations", organizations::routes(global))
		.scope("/users", users::routes(global))
}
