use std::fmt::{Debug, Formatter};
use std::sync::Arc;

pub use self::builder::RouterBuilder;
pub use self::error::RouterError;
pub use self::ext::RequestExt;
pub use self::middleware::{Middleware, NextFn, NextFut};
use self::types::{ErrorHandler, RouteHandler, RouteParams};

mod builder;
mod error;
mod ext;
mod middleware;
mod types;

/// Dispatches requests to handlers by method and path.
///
/// Paths use `path-tree` syntax, so `/organizations/:id` binds `id`. Static
/// segments win over parameters.
pub struct Router<I, O, E> {
	routes: Vec<RouteHandler<I, O, E>>,
	middlewares: Vec<Arc<dyn Middleware<I, O, E>>>,
	error_handler: Option<ErrorHandler<O, E>>,
	not_found: Option<RouteHandler<I, O, E>>,
	tree: path_tree::PathTree<usize>,
}

impl<I: Send + 'static, O: Send + 'static, E: Send + 'static> Router<I, O, E> {
	pub fn builder() -> RouterBuilder<I, O, E> {
		RouterBuilder::new()
	}

	pub async fn handle(&self, mut req: hyper::Request<I>) -> Result<hyper::Response<O>, RouterError<E>> {
		let path = format!("/{}{}", req.method().as_str(), req.uri().path());

		let handler = match self.tree.find(&path) {
			Some((route, path)) => {
				req.extensions_mut().insert(RouteParams(
					path.params_iter().map(|(k, v)| (k.to_owned(), v.to_owned())).collect(),
				));
				self.routes[*route].clone()
			}
			None => self.not_found.clone().ok_or(RouterError::NotFound)?,
		};

		let next: NextFn<I, O, E> = Box::new(move |req| handler(req));
		let next = self.middlewares.iter().rev().cloned().fold(next, |next, middleware| {
			Box::new(move |req| Box::pin(async move { middleware.handle(req, next).await }) as NextFut<O, E>) as NextFn<I, O, E>
		});

		let Some(error_handler) = self.error_handler.clone() else {
			return next(req).await.map_err(RouterError::Unhandled);
		};

		let (parts, body) = req.into_parts();
		match next(hyper::Request::from_parts(parts.clone(), body)).await {
			Ok(res) => Ok(res),
			Err(err) => Ok(error_handler(hyper::Request::from_parts(parts, ()), err).await),
		}
	}
}

impl<I, O, E> Debug for Router<I, O, E> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Router")
			.field("routes", &self.routes.len())
			.field("middlewares", &self.middlewares.len())
			.finish()
	}
}

#[cfg(test)]
mod tests;
