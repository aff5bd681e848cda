use std::sync::Arc;

use utils::context::Context;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::logic::builder::OrganizationBuilder;
use crate::models::{Organization, OrganizationInput, OrganizationPatch};
use crate::store::PgStore;

#[derive(Clone)]
pub struct OrganizationUsecase {
	store: Arc<PgStore>,
	builder: OrganizationBuilder,
}

impl OrganizationUsecase {
	pub fn new(store: Arc<PgStore>, builder: OrganizationBuilder) -> Self {
		Self { store, builder }
	}

	pub async fn create(&self, ctx: &Context, input: OrganizationInput) -> Result<Organization> {
		let new = self.builder.build(input)?;

		let store = Arc::clone(&self.store);
		self.store
			.tx
			.with_tx(ctx, move |tx| Box::pin(async move { store.org.insert(tx, &new).await }))
			.await
	}

	/// Creates every organization or none of them.
	pub async fn create_many(&self, ctx: &Context, inputs: Vec<OrganizationInput>) -> Result<Vec<Organization>> {
		let new = inputs
			.into_iter()
			.map(|input| self.builder.build(input))
			.collect::<Result<Vec<_>>>()?;

		if new.is_empty() {
			return Ok(Vec::new());
		}

		let store = Arc::clone(&self.store);
		self.store
			.tx
			.with_tx(ctx, move |tx| Box::pin(async move { store.org.bulk_insert(tx, &new).await }))
			.await
	}

	pub async fn update(&self, ctx: &Context, id: Uuid, patch: OrganizationPatch) -> Result<Organization> {
		self.builder.validate_patch(&patch)?;

		let store = Arc::clone(&self.store);
		self.store
			.tx
			.with_tx(ctx, move |tx| Box::pin(async move { store.org.update(tx, id, &patch).await }))
			.await
	}

	/// Applies each patch to its organization in one transaction. A missing
	/// organization fails the whole batch.
	pub async fn update_many(&self, ctx: &Context, patches: Vec<(Uuid, OrganizationPatch)>) -> Result<Vec<Organization>> {
		for (_, patch) in &patches {
			self.builder.validate_patch(patch)?;
		}

		let store = Arc::clone(&self.store);
		self.store
			.tx
			.with_tx(ctx, move |tx| {
				Box::pin(async move {
					let mut orgs = Vec::with_capacity(patches.len());
					for (id, patch) in patches {
						let mut org = store
							.org
							.find_by_id(tx, id)
							.await?
							.ok_or_else(|| ApiError::not_found(format!("organization {id} not found")))?;
						patch.apply(&mut org);
						orgs.push(org);
					}

					store.org.bulk_update(tx, &orgs).await
				})
			})
			.await
	}
}
