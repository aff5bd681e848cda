use std::sync::Arc;

use utils::context::Context;
use uuid::Uuid;

use super::trace_error;
use crate::error::Result;
use crate::logic::usecase::OrganizationUsecase;
use crate::models::{Organization, OrganizationInput, OrganizationPatch, Page, SearchFilter};
use crate::store::PgStore;

pub struct OrganizationManager {
	store: Arc<PgStore>,
	usecase: OrganizationUsecase,
}

impl OrganizationManager {
	pub fn new(store: Arc<PgStore>, usecase: OrganizationUsecase) -> Self {
		Self { store, usecase }
	}

	pub async fn list(&self, ctx: &Context, filter: SearchFilter) -> Result<Page<Organization>> {
		let filter = filter.normalized();

		async {
			let conn = self.store.tx.connect(ctx).await?;
			self.store.org.list(&conn, &filter).await
		}
		.await
		.inspect_err(trace_error("list organizations"))
	}

	pub async fn get_by_id(&self, ctx: &Context, id: Uuid) -> Result<Organization> {
		async {
			let conn = self.store.tx.connect(ctx).await?;
			self.store.org.get_by_id(&conn, id).await
		}
		.await
		.inspect_err(trace_error("get organization"))
	}

	pub async fn get_by_code(&self, ctx: &Context, code: i64) -> Result<Organization> {
		async {
			let conn = self.store.tx.connect(ctx).await?;
			self.store.org.get_by_code(&conn, code).await
		}
		.await
		.inspect_err(trace_error("get organization by code"))
	}

	pub async fn create(&self, ctx: &Context, input: OrganizationInput) -> Result<Organization> {
		self.usecase
			.create(ctx, input)
			.await
			.inspect_err(trace_error("create organization"))
	}

	pub async fn create_many(&self, ctx: &Context, inputs: Vec<OrganizationInput>) -> Result<Vec<Organization>> {
		self.usecase
			.create_many(ctx, inputs)
			.await
			.inspect_err(trace_error("create organizations"))
	}

	pub async fn update(&self, ctx: &Context, id: Uuid, patch: OrganizationPatch) -> Result<Organization> {
		self.usecase
			.update(ctx, id, patch)
			.await
			.inspect_err(trace_error("update organization"))
	}

	pub async fn update_many(&self, ctx: &Context, patches: Vec<(Uuid, OrganizationPatch)>) -> Result<Vec<Organization>> {
		self.usecase
			.update_many(ctx, patches)
			.await
			.inspect_err(trace_error("update organizations"))
	}
}
