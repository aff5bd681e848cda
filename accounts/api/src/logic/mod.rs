//! Business logic, layered the same way for every entity:
//!
//! - builders validate input and construct new rows without touching the
//!   database,
//! - use-cases own the transaction of a mutation and the cross-entity rules
//!   checked inside it,
//! - managers are what the HTTP layer calls.

use std::sync::Arc;

use crate::store::PgStore;

pub mod builder;
pub mod manager;
pub mod usecase;

pub use manager::{OrganizationManager, UserManager};

pub struct Logic {
	pub org: OrganizationManager,
	pub user: UserManager,
}

impl Logic {
	pub fn new(store: Arc<PgStore>) -> Self {
		let builder = builder::Builder::default();
		let usecase = usecase::Usecase::new(&store, builder);

		Self {
			org: OrganizationManager::new(Arc::clone(&store), usecase.org),
			user: UserManager::new(store, usecase.user),
		}
	}
}
