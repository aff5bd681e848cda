pub use {bytes, hyper};

pub mod router;

/// Builds a JSON response from anything that displays as JSON, such as a
/// `serde_json::Value`.
#[macro_export]
macro_rules! make_response {
	($status:expr, $body:expr) => {
		$crate::http::hyper::Response::builder()
			.status($status)
			.header($crate::http::hyper::header::CONTENT_TYPE, "application/json")
			.body($crate::http::bytes::Bytes::from($body.to_string()).into())
			.expect("failed to build response")
	};
}
