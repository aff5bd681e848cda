use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A user as stored. The password hash is never selected into this type.
#[derive(Debug, Clone, PartialEq, Eq, postgres_from_row::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub id: Uuid,
	pub email: String,
	pub first_name: String,
	pub last_name: String,
	pub organization_id: Option<Uuid>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserInput {
	pub email: String,
	pub first_name: String,
	pub last_name: String,
	pub password: Option<String>,
	pub organization_id: Option<Uuid>,
}

/// A validated user that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
	pub id: Uuid,
	pub email: String,
	pub first_name: String,
	pub last_name: String,
	/// argon2 PHC string
	pub password_hash: Option<String>,
	pub organization_id: Option<Uuid>,
}

/// Sparse update as received from callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPatch {
	pub email: Option<String>,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub password: Option<String>,
	#[serde(deserialize_with = "super::double_option")]
	pub organization_id: Option<Option<Uuid>>,
}

/// A validated [`UserPatch`] with the password already hashed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
	pub email: Option<String>,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub password_hash: Option<String>,
	pub organization_id: Option<Option<Uuid>>,
}

impl From<&User> for UserUpdate {
	/// Every visible column set. The stored password is left alone.
	fn from(user: &User) -> Self {
		Self {
			email: Some(user.email.clone()),
			first_name: Some(user.first_name.clone()),
			last_name: Some(user.last_name.clone()),
			password_hash: None,
			organization_id: Some(user.organization_id),
		}
	}
}
