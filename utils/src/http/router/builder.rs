use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use super::middleware::{Middleware, NextFn};
use super::types::{ErrorHandler, RouteHandler};
use super::Router;

pub struct RouterBuilder<I, O, E> {
	routes: Vec<(hyper::Method, String, RouteHandler<I, O, E>)>,
	middlewares: Vec<Arc<dyn Middleware<I, O, E>>>,
	error_handler: Option<ErrorHandler<O, E>>,
	not_found: Option<RouteHandler<I, O, E>>,
}

impl<I: Send + 'static, O: Send + 'static, E: Send + 'static> Default for RouterBuilder<I, O, E> {
	fn default() -> Self {
		Self::new()
	}
}

fn join(parent: &str, path: &str) -> String {
	let parent = parent.trim_matches('/');
	let path = path.trim_matches('/');

	match (parent.is_empty(), path.is_empty()) {
		(true, _) => path.to_owned(),
		(false, true) => parent.to_owned(),
		(false, false) => format!("{parent}/{path}"),
	}
}

impl<I: Send + 'static, O: Send + 'static, E: Send + 'static> RouterBuilder<I, O, E> {
	pub fn new() -> Self {
		Self {
			routes: Vec::new(),
			middlewares: Vec::new(),
			error_handler: None,
			not_found: None,
		}
	}

	/// Middlewares run in the order they are added, outermost first.
	pub fn middleware(mut self, middleware: impl Middleware<I, O, E>) -> Self {
		self.middlewares.push(Arc::new(middleware));
		self
	}

	/// Attaches a clone of `data` to every request.
	pub fn data<T: Clone + Send + Sync + 'static>(self, data: T) -> Self {
		self.middleware(move |mut req: hyper::Request<I>, next: NextFn<I, O, E>| {
			req.extensions_mut().insert(data.clone());
			next(req)
		})
	}

	/// Turns handler errors into responses.
	pub fn error_handler<F: Future<Output = hyper::Response<O>> + Send + 'static>(
		mut self,
		handler: impl Fn(hyper::Request<()>, E) -> F + Send + Sync + 'static,
	) -> Self {
		let handler: ErrorHandler<O, E> = Arc::new(move |req, err| Box::pin(handler(req, err)) as BoxFuture<'static, _>);
		self.error_handler = Some(handler);
		self
	}

	pub fn get<F: Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>(
		self,
		path: &str,
		handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static,
	) -> Self {
		self.add_route(hyper::Method::GET, path, handler)
	}

	pub fn post<F: Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>(
		self,
		path: &str,
		handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static,
	) -> Self {
		self.add_route(hyper::Method::POST, path, handler)
	}

	pub fn patch<F: Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>(
		self,
		path: &str,
		handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static,
	) -> Self {
		self.add_route(hyper::Method::PATCH, path, handler)
	}

	pub fn delete<F: Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>(
		self,
		path: &str,
		handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static,
	) -> Self {
		self.add_route(hyper::Method::DELETE, path, handler)
	}

	/// Registers a handler for one method.
	pub fn add_route<F: Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>(
		mut self,
		method: hyper::Method,
		path: &str,
		handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static,
	) -> Self {
		let handler: RouteHandler<I, O, E> = Arc::new(move |req| Box::pin(handler(req)) as BoxFuture<'static, _>);
		self.routes.push((method, join("", path), handler));
		self
	}

	/// Mounts the routes of `router` under `path`. Middlewares and handlers
	/// of the nested builder are not carried over.
	pub fn scope(mut self, path: &str, router: RouterBuilder<I, O, E>) -> Self {
		self.routes.extend(
			router
				.routes
				.into_iter()
				.map(|(method, route, handler)| (method, join(path, &route), handler)),
		);
		self
	}

	pub fn not_found<F: Future<Output = Result<hyper::Response<O>, E>> + Send + 'static>(
		mut self,
		handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static,
	) -> Self {
		let handler: RouteHandler<I, O, E> = Arc::new(move |req| Box::pin(handler(req)) as BoxFuture<'static, _>);
		self.not_found = Some(handler);
		self
	}

	pub fn build(self) -> Router<I, O, E> {
		let mut router = Router {
			routes: Vec::with_capacity(self.routes.len()),
			middlewares: self.middlewares,
			error_handler: self.error_handler,
			not_found: self.not_found,
			tree: path_tree::PathTree::new(),
		};

		for (method, path, handler) in self.routes {
			let full_path = format!("/{}/{path}", method.as_str());
			tracing::debug!(full_path, "adding route");

			router.routes.push(handler);
			let _ = router.tree.insert(&full_path, router.routes.len() - 1);
		}

		router
	}
}
