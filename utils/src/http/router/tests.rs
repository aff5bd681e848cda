use super::*;

type TestRouter = Router<(), String, String>;

fn ok(body: impl ToString) -> Result<hyper::Response<String>, String> {
	Ok(hyper::Response::new(body.to_string()))
}

fn request(method: hyper::Method, uri: &str) -> hyper::Request<()> {
	hyper::Request::builder().method(method).uri(uri).body(()).unwrap()
}

fn router() -> TestRouter {
	let organizations = Router::builder()
		.get("/", |_| async { ok("list") })
		.post("/batch", |_| async { ok("batch") })
		.get("/code/:code", |req| async move { ok(format!("code {}", req.param("code").unwrap_or_default())) })
		.get("/:id", |req| async move { ok(format!("get {}", req.param("id").unwrap_or_default())) })
		.patch("/:id", |_| async { Err("patch failed".to_string()) });

	Router::builder()
		.data(42_u32)
		.get("/health", |req| async move { ok(format!("data {}", req.data::<u32>().copied().unwrap_or_default())) })
		.scope("/api/v1/organizations", organizations)
		.error_handler(|_, err| async move { hyper::Response::new(format!("error: {err}")) })
		.build()
}

#[tokio::test]
async fn test_static_and_param_routes() {
	let router = router();

	let res = router
		.handle(request(hyper::Method::GET, "/api/v1/organizations"))
		.await
		.unwrap();
	assert_eq!(res.body(), "list");

	let res = router
		.handle(request(hyper::Method::GET, "/api/v1/organizations/code/12"))
		.await
		.unwrap();
	assert_eq!(res.body(), "code 12");

	let res = router
		.handle(request(hyper::Method::GET, "/api/v1/organizations/abc"))
		.await
		.unwrap();
	assert_eq!(res.body(), "get abc");

	let res = router
		.handle(request(hyper::Method::POST, "/api/v1/organizations/batch"))
		.await
		.unwrap();
	assert_eq!(res.body(), "batch");
}

#[tokio::test]
async fn test_data_and_error_handler() {
	let router = router();

	let res = router.handle(request(hyper::Method::GET, "/health")).await.unwrap();
	assert_eq!(res.body(), "data 42");

	let res = router
		.handle(request(hyper::Method::PATCH, "/api/v1/organizations/abc"))
		.await
		.unwrap();
	assert_eq!(res.body(), "error: patch failed");
}

#[tokio::test]
async fn test_not_found() {
	let router = router();

	let err = router
		.handle(request(hyper::Method::DELETE, "/api/v1/organizations/abc"))
		.await
		.unwrap_err();
	assert!(matches!(err, RouterError::NotFound));

	let router: TestRouter = Router::builder()
		.not_found(|_| async { ok("fallback") })
		.build();
	let res = router.handle(request(hyper::Method::GET, "/missing")).await.unwrap();
	assert_eq!(res.body(), "fallback");
}
