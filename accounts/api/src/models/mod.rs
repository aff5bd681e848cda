use serde::{Deserialize, Deserializer};

mod filter;
mod organization;
mod user;

pub use filter::{Page, SearchFilter, SortBy, SortDir, DEFAULT_LIMIT};
pub use organization::{NewOrganization, Organization, OrganizationInput, OrganizationPatch, OrganizationStatus};
pub use user::{NewUser, User, UserInput, UserPatch, UserUpdate};

/// Lets a patch tell an absent field (`None`) apart from an explicit `null`
/// (`Some(None)`). Needs `#[serde(default)]` on the field.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
	T: Deserialize<'de>,
	D: Deserializer<'de>,
{
	Option::<T>::deserialize(deserializer).map(Some)
}
