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
use crate::models::{OrganizationInput, OrganizationPatch};

async fn list<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response> {
	let global = extract::global::<G>(&req)?;
	let ctx = extract::context(&req)?;
	let filter = extract::search_filter(req.uri().query(), global.config::<ApiConfig>().max_page_size)?;

	let page = global.logic().org.list(&ctx, filter).await?;

	json_response(StatusCode::OK, &page)
}

async fn get<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response> {
	let global = extract::global::<G>(&req)?;
	let ctx = extract::context(&req)?;
	let id = extract::path_id(&req)?;

	let org = global.logic().org.get_by_id(&ctx, id).await?;

	json_response(StatusCode::OK, &org)
}

async fn get_by_code<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response> {
	let global = extract::global::<G>(&req)?;
	let ctx = extract::context(&req)?;
	let code = extract::path_code(&req)?;

	let org = global.logic().org.get_by_code(&ctx, code).await?;

	json_response(StatusCode::OK, &org)
}

async fn create<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response> {
	let global = extract::global::<G>(&req)?;
	let ctx = extract::context(&req)?;
	let input: OrganizationInput = extract::json_body(req).await?;

	let org = global.logic().org.create(&ctx, input).await?;

	json_response(StatusCode::CREATED, &org)
}

async fn create_many<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response> {
	let global = extract::global::<G>(&req)?;
	let ctx = extract::context(&req)?;
	let inputs: Vec<OrganizationInput> = extract::json_body(req).await?;

	let orgs = global.logic().org.create_many(&ctx, inputs).await?;

	json_response(StatusCode::CREATED, &orgs)
}

async fn update<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response> {
	let global = extract::global::<G>(&req)?;
	let ctx = extract::context(&req)?;
	let id = extract::path_id(&req)?;
	let patch: OrganizationPatch = extract::json_body(req).await?;

	let org = global.logic().org.update(&ctx, id, patch).await?;

	json_response(StatusCode::OK, &org)
}

async fn update_many<G: ApiGlobal>(req: Request<Incoming>) -> Result<Response> {
	let global = extract::global::<G>(&req)?;
	let ctx = extract::context(&req)?;
	let patches: Vec<BatchPatch<OrganizationPatch>> = extract::json_body(req).await?;

	let orgs = global
		.logic()
		.org
		.update_many(&ctx, patches.into_iter().map(Into::into).collect())
		.await?;

	json_response(StatusCode::OK, &orgs)
}

pub fn routes<G: ApiGlobal>(_: &Arc<G>) -> RouterBuilder<Incoming, Body, ApiError> {
	Router::builder()
		.get("/", list::<G>)
		.post("/", create::<G>)
		.post("/batch", create_many::<G>)
		.patch("/batch", update_many::<G>)
		.get("/code/:code", get_by_code::<G>)
		.get("/:id", get::<G>)
		.patch("/:id", update::<G>)
}
