use std::sync::Arc;

use futures_util::future::BoxFuture;
use utils::context::Context;
use utils::database::{PgConnection, PgTransaction, Pool};

use crate::error::Result;

mod organization;
mod sql;
mod user;

pub use organization::OrganizationStore;
pub use user::UserStore;

/// Every store the service talks to, sharing one pool.
pub struct PgStore {
	pub tx: DbTxStore,
	pub org: OrganizationStore,
	pub user: UserStore,
}

impl PgStore {
	pub fn new(pool: Arc<Pool>) -> Self {
		Self {
			tx: DbTxStore::new(pool),
			org: OrganizationStore,
			user: UserStore,
		}
	}
}

/// Hands out the connection scopes the record stores run on.
#[derive(Clone)]
pub struct DbTxStore {
	pool: Arc<Pool>,
}

impl DbTxStore {
	pub fn new(pool: Arc<Pool>) -> Self {
		Self { pool }
	}

	/// Runs `work` in a transaction bounded by `ctx`. See
	/// [`utils::database::with_transaction`].
	pub async fn with_tx<F, T>(&self, ctx: &Context, work: F) -> Result<T>
	where
		F: for<'t> FnOnce(&'t PgTransaction) -> BoxFuture<'t, Result<T>>,
		T: Send,
	{
		utils::database::with_transaction(self.pool.as_ref(), ctx, work).await
	}

	/// A connection for reads, with the statement timeout of `ctx` applied.
	pub async fn connect(&self, ctx: &Context) -> Result<PgConnection> {
		Ok(utils::database::connect(self.pool.as_ref(), ctx).await?)
	}
}
