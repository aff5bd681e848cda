use std::sync::Arc;

use crate::store::PgStore;

mod organization;
mod user;

pub use organization::OrganizationUsecase;
pub use user::UserUsecase;

pub struct Usecase {
	pub org: OrganizationUsecase,
	pub user: UserUsecase,
}

impl Usecase {
	pub fn new(store: &Arc<PgStore>, builder: super::builder::Builder) -> Self {
		Self {
			org: OrganizationUsecase::new(Arc::clone(store), builder.org),
			user: UserUsecase::new(Arc::clone(store), builder.user),
		}
	}
}
