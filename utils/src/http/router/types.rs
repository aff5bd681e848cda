use std::sync::Arc;

use futures_util::future::BoxFuture;

pub(crate) type RouteHandler<I, O, E> =
	Arc<dyn Fn(hyper::Request<I>) -> BoxFuture<'static, Result<hyper::Response<O>, E>> + Send + Sync + 'static>;

pub(crate) type ErrorHandler<O, E> =
	Arc<dyn Fn(hyper::Request<()>, E) -> BoxFuture<'static, hyper::Response<O>> + Send + Sync + 'static>;

/// The path parameters bound while matching a route.
#[derive(Debug, Clone, Default)]
pub struct RouteParams(pub Box<[(String, String)]>);

impl RouteParams {
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
	}
}
