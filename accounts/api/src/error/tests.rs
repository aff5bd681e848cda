use super::*;

#[test]
fn test_kind_names_and_statuses() {
	let cases = [
		(ErrorKind::BadRequest, "BAD_REQUEST_ERROR", 400),
		(ErrorKind::Unauthorized, "UNAUTHORIZED_ERROR", 401),
		(ErrorKind::Forbidden, "FORBIDDEN_ERROR", 403),
		(ErrorKind::NotFound, "NOT_FOUND_ERROR", 404),
		(ErrorKind::NotAcceptable, "NOT_ACCEPTABLE_ERROR", 406),
		(ErrorKind::UnprocessableEntity, "UNPROCESSABLE_ENTITY_ERROR", 422),
		(ErrorKind::FailedDependency, "FAILED_DEPENDENCY_ERROR", 424),
		(ErrorKind::GatewayTimeout, "GATEWAY_TIMEOUT_ERROR", 504),
		(ErrorKind::InternalServerError, "INTERNAL_SERVER_ERROR", 500),
	];

	for (kind, name, status) in cases {
		let err = ApiError::new(kind, "message");
		assert_eq!(err.kind().name(), name);
		assert_eq!(err.status().as_u16(), status, "{kind}");
	}
}

#[test]
fn test_custom_keeps_status() {
	let err = ApiError::custom(StatusCode::SERVICE_UNAVAILABLE, "busy");
	assert_eq!(err.kind(), ErrorKind::Custom);
	assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(err.kind().name(), "CUSTOM_ERROR");
}

#[test]
fn test_json_body() {
	let err = ApiError::not_found("organization missing");
	assert_eq!(
		err.to_json(),
		serde_json::json!({
			"message": "organization missing",
			"status": 404,
			"errorType": "NOT_FOUND_ERROR",
		})
	);
}

#[test]
fn test_translate_not_found() {
	for message in [
		"organization not found",
		"Row NOT FOUND",
		"relation \"organizations\" does not exist",
		"Column Does Not Exist",
	] {
		let err = translate_storage_error(message);
		assert_eq!(err.kind(), ErrorKind::NotFound, "{message}");
		assert_eq!(err.status(), StatusCode::NOT_FOUND);
		assert_eq!(err.message(), "not found");
		assert!(!err.to_json().to_string().contains("organizations"), "{message}");
	}
}

#[test]
fn test_translate_hides_detail() {
	let err = translate_storage_error("duplicate key value violates unique constraint \"users_email_key\"");
	assert_eq!(err.kind(), ErrorKind::InternalServerError);
	assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(err.message(), "internal server error");
}

#[test]
fn test_pool_error_is_generic() {
	let err = ApiError::from(PoolError::Closed);
	assert_eq!(err.kind(), ErrorKind::InternalServerError);
	assert_eq!(err.message(), "internal server error");
}

#[test]
fn test_scope_errors() {
	let err = ApiError::from(ScopeError::DeadlineExceeded);
	assert_eq!(err.kind(), ErrorKind::GatewayTimeout);
	assert_eq!(err.status(), StatusCode::GATEWAY_TIMEOUT);

	let err = ApiError::from(ScopeError::Cancelled);
	assert_eq!(err.kind(), ErrorKind::Custom);
	assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);

	let err = ApiError::from(ScopeError::Commit(PoolError::Closed));
	assert_eq!(err.kind(), ErrorKind::InternalServerError);
}

#[test]
fn test_unclassified() {
	let err = ApiError::unclassified("failed to hash password", "argon2 exploded");
	assert_eq!(err.kind(), ErrorKind::InternalServerError);
	assert_eq!(err.message(), "failed to hash password");
}
