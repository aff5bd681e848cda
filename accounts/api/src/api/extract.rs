use std::sync::{Arc, Weak};

use http_body_util::{BodyExt, Limited};
use hyper::body::Incoming;
use hyper::{Request, StatusCode};
use serde::de::DeserializeOwned;
use utils::context::Context;
use utils::http::router::RequestExt;
use utils::make_response;
use uuid::Uuid;

use super::request_context::{shutting_down, RequestContext};
use super::Response;
use crate::error::{ApiError, Result};
use crate::models::SearchFilter;

/// Request bodies larger than this are rejected.
pub const MAX_BODY_SIZE: usize = 4 * 1024 * 1024;

pub fn global<G: Send + Sync + 'static>(req: &Request<Incoming>) -> Result<Arc<G>> {
	req.data::<Weak<G>>().and_then(Weak::upgrade).ok_or_else(shutting_down)
}

pub fn context(req: &Request<Incoming>) -> Result<Context> {
	req.data::<RequestContext>()
		.map(|data| data.ctx().clone())
		.ok_or_else(|| ApiError::internal_server("request context missing"))
}

pub fn path_id(req: &Request<Incoming>) -> Result<Uuid> {
	let id = req.param("id").ok_or_else(|| ApiError::bad_request("missing id"))?;
	Uuid::parse_str(id).map_err(|_| ApiError::bad_request(format!("invalid id: {id}")))
}

pub fn path_code(req: &Request<Incoming>) -> Result<i64> {
	let code = req.param("code").ok_or_else(|| ApiError::bad_request("missing code"))?;
	code.parse()
		.map_err(|_| ApiError::bad_request(format!("invalid code: {code}")))
}

/// Reads the body as JSON.
pub async fn json_body<T: DeserializeOwned>(req: Request<Incoming>) -> Result<T> {
	let body = Limited::new(req.into_body(), MAX_BODY_SIZE)
		.collect()
		.await
		.map_err(|err| ApiError::bad_request(format!("failed to read request body: {err}")))?
		.to_bytes();

	serde_json::from_slice(&body).map_err(|err| ApiError::bad_request(format!("invalid request body: {err}")))
}

pub fn json_response<T: serde::Serialize>(status: StatusCode, value: &T) -> Result<Response> {
	let body = serde_json::to_value(value).map_err(|err| ApiError::unclassified("failed to serialize response", err))?;
	Ok(make_response!(status, body))
}

fn parse_uuid(key: &str, value: &str) -> Result<Uuid> {
	Uuid::parse_str(value).map_err(|_| ApiError::bad_request(format!("invalid {key}: {value}")))
}

/// Builds a list filter from the query string.
///
/// Numbers that do not parse keep their default and flags are only true when
/// they are literally `true`. `limit` has to end up between 1 and
/// `max_page_size`.
pub fn search_filter(query: Option<&str>, max_page_size: i64) -> Result<SearchFilter> {
	let mut filter = SearchFilter::default();

	for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
		match key.as_ref() {
			"text" => filter.text = Some(value.into_owned()),
			"sortBy" => filter.sort_by = value.parse().ok(),
			"sortDir" => filter.sort_dir = value.parse().ok(),
			"offset" => {
				if let Ok(offset) = value.parse() {
					filter.offset = offset;
				}
			}
			"limit" => {
				if let Ok(limit) = value.parse() {
					filter.limit = limit;
				}
			}
			"isFinal" => filter.is_final = Some(value == "true"),
			"isAccepted" => filter.is_accepted = Some(value == "true"),
			"isApproved" => filter.is_approved = Some(value == "true"),
			"isArchived" => filter.is_archived = Some(value == "true"),
			"orgId" => filter.org_id = Some(parse_uuid("orgId", &value)?),
			"creatorId" => filter.creator_id = Some(parse_uuid("creatorId", &value)?),
			_ => {}
		}
	}

	if filter.limit < 1 || filter.limit > max_page_size {
		return Err(ApiError::bad_request(format!("limit must be between 1 and {max_page_size}")));
	}

	Ok(filter)
}

#[cfg(test)]
mod tests;
