use super::types::RouteParams;

pub trait RequestExt {
	/// A path parameter bound by the matched route.
	fn param(&self, key: &str) -> Option<&str>;

	/// Data attached with [`RouterBuilder::data`](super::RouterBuilder::data)
	/// or by a middleware.
	fn data<T: Send + Sync + 'static>(&self) -> Option<&T>;

	fn provide<T: Send + Sync + Clone + 'static>(&mut self, data: T);
}

impl<I> RequestExt for hyper::Request<I> {
	fn param(&self, key: &str) -> Option<&str> {
		self.extensions().get::<RouteParams>().and_then(|params| params.get(key))
	}

	fn data<T: Send + Sync + 'static>(&self) -> Option<&T> {
		self.extensions().get::<T>()
	}

	fn provide<T: Send + Sync + Clone + 'static>(&mut self, data: T) {
		self.extensions_mut().insert(data);
	}
}
