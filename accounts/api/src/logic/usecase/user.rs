use std::sync::Arc;

use utils::context::Context;
use utils::database::PgTransaction;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::logic::builder::UserBuilder;
use crate::models::{User, UserInput, UserPatch, UserUpdate};
use crate::store::PgStore;

#[derive(Clone)]
pub struct UserUsecase {
	store: Arc<PgStore>,
	builder: UserBuilder,
}

async fn ensure_organization(store: &PgStore, tx: &PgTransaction, id: Uuid) -> Result<()> {
	match store.org.find_by_id(tx, id).await? {
		Some(_) => Ok(()),
		None => Err(ApiError::unprocessable_entity(format!("organization {id} does not exist"))),
	}
}

/// Fails when `email` belongs to a user other than `except`.
async fn ensure_email_unused(store: &PgStore, tx: &PgTransaction, email: &str, except: Option<Uuid>) -> Result<()> {
	match store.user.find_by_email(tx, email).await? {
		Some(user) if Some(user.id) != except => Err(ApiError::unprocessable_entity(format!(
			"email {email} is already in use"
		))),
		_ => Ok(()),
	}
}

async fn update_in_tx(store: &PgStore, tx: &PgTransaction, id: Uuid, update: &UserUpdate) -> Result<User> {
	let current = store.user.get_by_id(tx, id).await?;

	if let Some(email) = &update.email {
		if !email.eq_ignore_ascii_case(&current.email) {
			ensure_email_unused(store, tx, email, Some(id)).await?;
		}
	}

	if let Some(Some(org_id)) = update.organization_id {
		if current.organization_id != Some(org_id) {
			ensure_organization(store, tx, org_id).await?;
		}
	}

	store.user.update(tx, id, update).await
}

impl UserUsecase {
	pub fn new(store: Arc<PgStore>, builder: UserBuilder) -> Self {
		Self { store, builder }
	}

	/// Creates a user. The referenced organization has to exist and the e-mail
	/// must not be taken.
	pub async fn create(&self, ctx: &Context, input: UserInput) -> Result<User> {
		self.create_many(ctx, vec![input])
			.await?
			.pop()
			.ok_or_else(|| ApiError::internal_server("insert returned no row"))
	}

	pub async fn create_many(&self, ctx: &Context, inputs: Vec<UserInput>) -> Result<Vec<User>> {
		let new = inputs
			.into_iter()
			.map(|input| self.builder.build(input))
			.collect::<Result<Vec<_>>>()?;

		if new.is_empty() {
			return Ok(Vec::new());
		}

		for (idx, user) in new.iter().enumerate() {
			if new[..idx].iter().any(|other| other.email.eq_ignore_ascii_case(&user.email)) {
				return Err(ApiError::unprocessable_entity(format!(
					"email {} appears more than once",
					user.email
				)));
			}
		}

		let store = Arc::clone(&self.store);
		self.store
			.tx
			.with_tx(ctx, move |tx| {
				Box::pin(async move {
					for user in &new {
						ensure_email_unused(&store, tx, &user.email, None).await?;
						if let Some(org_id) = user.organization_id {
							ensure_organization(&store, tx, org_id).await?;
						}
					}

					store.user.bulk_insert(tx, &new).await
				})
			})
			.await
	}

	pub async fn update(&self, ctx: &Context, id: Uuid, patch: UserPatch) -> Result<User> {
		let update = self.builder.validate_patch(patch)?;

		let store = Arc::clone(&self.store);
		self.store
			.tx
			.with_tx(ctx, move |tx| Box::pin(async move { update_in_tx(&store, tx, id, &update).await }))
			.await
	}

	/// Applies every patch in one transaction.
	pub async fn update_many(&self, ctx: &Context, patches: Vec<(Uuid, UserPatch)>) -> Result<Vec<User>> {
		let updates = patches
			.into_iter()
			.map(|(id, patch)| Ok((id, self.builder.validate_patch(patch)?)))
			.collect::<Result<Vec<_>>>()?;

		let store = Arc::clone(&self.store);
		self.store
			.tx
			.with_tx(ctx, move |tx| {
				Box::pin(async move {
					let mut users = Vec::with_capacity(updates.len());
					for (id, update) in &updates {
						users.push(update_in_tx(&store, tx, *id, update).await?);
					}
					Ok(users)
				})
			})
			.await
	}
}
