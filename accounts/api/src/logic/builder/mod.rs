use uuid::Uuid;

mod organization;
mod user;

pub use organization::OrganizationBuilder;
pub use user::UserBuilder;

#[derive(Debug, Default, Clone, Copy)]
pub struct Builder {
	pub org: OrganizationBuilder,
	pub user: UserBuilder,
}

/// A fresh identifier. ULIDs sort by creation time, which keeps inserts
/// local in the primary key index.
pub fn new_id() -> Uuid {
	Uuid::from(ulid::Ulid::new())
}

#[cfg(test)]
mod tests;
