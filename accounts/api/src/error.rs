use std::fmt;

use hyper::StatusCode;
use utils::database::{is_statement_timeout, PoolError, ScopeError};

/// The closed set of failures the service reports to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	BadRequest,
	Unauthorized,
	Forbidden,
	NotFound,
	NotAcceptable,
	UnprocessableEntity,
	FailedDependency,
	GatewayTimeout,
	InternalServerError,
	Custom,
}

impl ErrorKind {
	/// The machine readable name sent as `errorType`.
	pub const fn name(self) -> &'static str {
		match self {
			Self::BadRequest => "BAD_REQUEST_ERROR",
			Self::Unauthorized => "UNAUTHORIZED_ERROR",
			Self::Forbidden => "FORBIDDEN_ERROR",
			Self::NotFound => "NOT_FOUND_ERROR",
			Self::NotAcceptable => "NOT_ACCEPTABLE_ERROR",
			Self::UnprocessableEntity => "UNPROCESSABLE_ENTITY_ERROR",
			Self::FailedDependency => "FAILED_DEPENDENCY_ERROR",
			Self::GatewayTimeout => "GATEWAY_TIMEOUT_ERROR",
			Self::InternalServerError => "INTERNAL_SERVER_ERROR",
			Self::Custom => "CUSTOM_ERROR",
		}
	}

	/// The status each kind maps to. `Custom` errors carry their own, this is
	/// only its fallback.
	pub const fn status(self) -> StatusCode {
		match self {
			Self::BadRequest => StatusCode::BAD_REQUEST,
			Self::Unauthorized => StatusCode::UNAUTHORIZED,
			Self::Forbidden => StatusCode::FORBIDDEN,
			Self::NotFound => StatusCode::NOT_FOUND,
			Self::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
			Self::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
			Self::FailedDependency => StatusCode::FAILED_DEPENDENCY,
			Self::GatewayTimeout => StatusCode::GATEWAY_TIMEOUT,
			Self::InternalServerError | Self::Custom => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// A classified failure. The message is safe to show to callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
	kind: ErrorKind,
	status: StatusCode,
	message: String,
}

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

impl ApiError {
	pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
		Self {
			kind,
			status: kind.status(),
			message: message.into(),
		}
	}

	pub fn bad_request(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::BadRequest, message)
	}

	pub fn unauthorized(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::Unauthorized, message)
	}

	pub fn forbidden(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::Forbidden, message)
	}

	pub fn not_found(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::NotFound, message)
	}

	pub fn not_acceptable(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::NotAcceptable, message)
	}

	pub fn unprocessable_entity(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::UnprocessableEntity, message)
	}

	pub fn failed_dependency(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::FailedDependency, message)
	}

	pub fn gateway_timeout(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::GatewayTimeout, message)
	}

	pub fn internal_server(message: impl Into<String>) -> Self {
		Self::new(ErrorKind::InternalServerError, message)
	}

	pub fn custom(status: StatusCode, message: impl Into<String>) -> Self {
		Self {
			kind: ErrorKind::Custom,
			status,
			message: message.into(),
		}
	}

	/// Wraps a failure nobody classified. The detail goes to the log, the
	/// caller only sees `context`.
	pub fn unclassified(context: &str, err: impl fmt::Display) -> Self {
		tracing::error!(error = %err, "{context}");
		Self::internal_server(context)
	}

	pub fn kind(&self) -> ErrorKind {
		self.kind
	}

	pub fn status(&self) -> StatusCode {
		self.status
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	/// The JSON body sent to callers.
	pub fn to_json(&self) -> serde_json::Value {
		serde_json::json!({
			"message": self.message,
			"status": self.status.as_u16(),
			"errorType": self.kind.name(),
		})
	}
}

/// Classifies a storage failure by its message.
///
/// Messages mentioning "not found" or "does not exist" become
/// [`ErrorKind::NotFound`] and everything else becomes an internal error.
/// Either way callers get a fixed message and the underlying one is only
/// logged.
pub fn translate_storage_error(message: &str) -> ApiError {
	let lower = message.to_lowercase();

	if lower.contains("not found") || lower.contains("does not exist") {
		tracing::debug!(error = message, "storage reported missing row");
		return ApiError::not_found("not found");
	}

	tracing::error!(error = message, "storage error");
	ApiError::internal_server("internal server error")
}

impl From<PoolError> for ApiError {
	fn from(err: PoolError) -> Self {
		if is_statement_timeout(&err) {
			tracing::warn!(error = %err, "statement cancelled by timeout");
			return Self::gateway_timeout("deadline exceeded");
		}

		match err {
			PoolError::Timeout(kind) => {
				tracing::warn!(?kind, "timed out waiting for a database connection");
				Self::gateway_timeout("deadline exceeded")
			}
			PoolError::Backend(err) => match err.as_db_error() {
				Some(db) => translate_storage_error(db.message()),
				None => translate_storage_error(&err.to_string()),
			},
			err => translate_storage_error(&err.to_string()),
		}
	}
}

impl From<ScopeError> for ApiError {
	fn from(err: ScopeError) -> Self {
		if err.is_deadline_exceeded() {
			return Self::gateway_timeout("deadline exceeded");
		}

		match err {
			ScopeError::Acquire(err) | ScopeError::Timeout(err) | ScopeError::Begin(err) | ScopeError::Commit(err) => {
				err.into()
			}
			ScopeError::Cancelled => Self::custom(StatusCode::SERVICE_UNAVAILABLE, "service is shutting down"),
			ScopeError::DeadlineExceeded => Self::gateway_timeout("deadline exceeded"),
		}
	}
}

#[cfg(test)]
mod tests;
