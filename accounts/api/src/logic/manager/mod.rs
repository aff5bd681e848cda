use crate::error::ApiError;

mod organization;
mod user;

pub use organization::OrganizationManager;
pub use user::UserManager;

/// Errors leave the managers unchanged, they are only recorded here.
fn trace_error(operation: &'static str) -> impl Fn(&ApiError) {
	move |err: &ApiError| {
		if err.status().is_server_error() {
			tracing::warn!(operation, kind = %err.kind(), status = err.status().as_u16(), "{}", err.message());
		} else {
			tracing::debug!(operation, kind = %err.kind(), status = err.status().as_u16(), "{}", err.message());
		}
	}
}
