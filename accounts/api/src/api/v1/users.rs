use std::sync::Arc;

use hyper::body::Incoming;
use hyper::{Request, StatusCode};
use utils::http::router::{Router, RouterBuilder};

use super::BatchPatch;
use crate::api::extract::{self, json_response};
use crate::api::{Body, Response};
use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::global::ApiGlobal;
use crate::models::{UserInput, UserPatch};

async fn list<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response> {
	let global = extract::global::<G>(&req)?;
	let ctx = extract::context(&req)?;
	let filter = extract::search_filter(req.uri().query(), global.config::<ApiConfig>().max_page_size)?;

	let page = global.logic().user.list(&ctx, filter).await?;

	json_response(StatusCode::OK, &page)
}

async fn get<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response> {
	let global = extract::global::<G>(&req)?;
	let ctx = extract::context(&req)?;
	let id = extract::path_id(&req)?;

	let user = global.logic().user.get_by_id(&ctx, id).await?;

	json_response(StatusCode::OK, &user)
}

async fn create<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response> {
	let global = extract::global::<G>(&req)?;
	let ctx = extract::context(&req)?;
	let input: UserInput = extract::json_body(req).await?;

	let user = global.logic().user.create(&ctx, input).await?;

	json_response(StatusCode::CREATED, &user)
}

async fn create_many<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response> {
	let global = extract::global::<G>(&req)?;
	let ctx = extract::context(&req)?;
	let inputs: Vec<UserInput> = extract::json_body(req).await?;

	let users = global.logic().user.create_many(&ctx, inputs).await?;

	json_response(StatusCode::CREATED, &users)
}

async fn update<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response> {
	let global = extract::global::<G>(&req)?;
	let ctx = extract::context(&req)?;
	let id = extract::path_id(&req)?;
	let patch: UserPatch = extract::json_body(req).await?;

	let user = global.logic().user.update(&ctx, id, patch).await?;

	json_response(StatusCode::OK, &user)
}

async fn update_many<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response> {
	let global = extract::global::<G>(&req)?;
	let ctx = extract::context(&req)?;
	let patches: Vec<BatchPatch<UserPatch>> = extract::json_body(req).await?;

	let users = global
		.logic()
		.user
		.update_many(&ctx, patches.into_iter().map(Into::into).collect())
		.await?;

	json_response(StatusCode::OK, &users)
}

pub fn routes<G: ApiGlobal>(_: &Arc<G>) -> RouterBuilder<Incoming, Body, ApiError> {
	Router::builder()
		.get("/", list::<G>)
		.post("/", create::<G>)
		.post("/batch", create_many::<G>)
		.patch("/batch", update_many::<G>)
		.get("/:id", get::<G>)
		.patch("/:id", update::<G>)
}
