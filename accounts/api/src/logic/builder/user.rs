use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};

use crate::error::{ApiError, Result};
use crate::models::{NewUser, UserInput, UserPatch, UserUpdate};

#[derive(Debug, Default, Clone, Copy)]
pub struct UserBuilder;

fn validate_email(email: &str) -> Result<()> {
	if email.is_empty() {
		return Err(ApiError::bad_request("email is required"));
	}

	if !email_address::EmailAddress::is_valid(email) {
		return Err(ApiError::bad_request("email is not a valid email address"));
	}

	Ok(())
}

fn validate_name(field: &str, value: &str) -> Result<()> {
	if value.trim().is_empty() {
		return Err(ApiError::bad_request(format!("{field} is required")));
	}

	Ok(())
}

/// Hashes a password with argon2 and a random salt.
pub fn hash_password(password: &str) -> Result<String> {
	if password.is_empty() {
		return Err(ApiError::bad_request("password must not be empty"));
	}

	let salt = SaltString::generate(&mut rand::rngs::OsRng);

	Argon2::default()
		.hash_password(password.as_bytes(), &salt)
		.map(|hash| hash.to_string())
		.map_err(|err| ApiError::unclassified("failed to hash password", err))
}

impl UserBuilder {
	pub fn build(&self, input: UserInput) -> Result<NewUser> {
		validate_email(&input.email)?;
		validate_name("first name", &input.first_name)?;
		validate_name("last name", &input.last_name)?;

		let password_hash = input.password.as_deref().map(hash_password).transpose()?;

		Ok(NewUser {
			id: super::new_id(),
			email: input.email,
			first_name: input.first_name,
			last_name: input.last_name,
			password_hash,
			organization_id: input.organization_id,
		})
	}

	/// Checks a patch and hashes its password, if it carries one.
	pub fn validate_patch(&self, patch: UserPatch) -> Result<UserUpdate> {
		if let Some(email) = &patch.email {
			validate_email(email)?;
		}

		if let Some(first_name) = &patch.first_name {
			validate_name("first name", first_name)?;
		}

		if let Some(last_name) = &patch.last_name {
			validate_name("last name", last_name)?;
		}

		Ok(UserUpdate {
			password_hash: patch.password.as_deref().map(hash_password).transpose()?,
			email: patch.email,
			first_name: patch.first_name,
			last_name: patch.last_name,
			organization_id: patch.organization_id,
		})
	}
}
