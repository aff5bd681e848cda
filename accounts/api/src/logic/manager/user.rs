use std::sync::Arc;

use utils::context::Context;
use uuid::Uuid;

use super::trace_error;
use crate::error::Result;
use crate::logic::usecase::UserUsecase;
use crate::models::{Page, SearchFilter, User, UserInput, UserPatch};
use crate::store::PgStore;

pub struct UserManager {
	store: Arc<PgStore>,
	usecase: UserUsecase,
}

impl UserManager {
	pub fn new(store: Arc<PgStore>, usecase: UserUsecase) -> Self {
		Self { store, usecase }
	}

	pub async fn list(&self, ctx: &Context, filter: SearchFilter) -> Result<Page<User>> {
		let filter = filter.normalized();

		async {
			let conn = self.store.tx.connect(ctx).await?;
			self.store.user.list(&conn, &filter).await
		}
		.await
		.inspect_err(trace_error("list users"))
	}

	pub async fn get_by_id(&self, ctx: &Context, id: Uuid) -> Result<User> {
		async {
			let conn = self.store.tx.connect(ctx).await?;
			self.store.user.get_by_id(&conn, id).await
		}
		.await
		.inspect_err(trace_error("get user"))
	}

	pub async fn create(&self, ctx: &Context, input: UserInput) -> Result<User> {
		self.usecase
			.create(ctx, input)
			.await
			.inspect_err(trace_error("create user"))
	}

	pub async fn create_many(&self, ctx: &Context, inputs: Vec<UserInput>) -> Result<Vec<User>> {
		self.usecase
			.create_many(ctx, inputs)
			.await
			.inspect_err(trace_error("create users"))
	}

	pub async fn update(&self, ctx: &Context, id: Uuid, patch: UserPatch) -> Result<User> {
		self.usecase
			.update(ctx, id, patch)
			.await
			.inspect_err(trace_error("update user"))
	}

	pub async fn update_many(&self, ctx: &Context, patches: Vec<(Uuid, UserPatch)>) -> Result<Vec<User>> {
		self.usecase
			.update_many(ctx, patches)
			.await
			.inspect_err(trace_error("update users"))
	}
}
