use crate::error::{ApiError, Result};
use crate::models::{NewOrganization, OrganizationInput, OrganizationPatch, OrganizationStatus};

#[derive(Debug, Default, Clone, Copy)]
pub struct OrganizationBuilder;

fn validate_name(name: &str) -> Result<()> {
	if name.trim().is_empty() {
		return Err(ApiError::bad_request("organization name is required"));
	}

	Ok(())
}

fn validate_status(status: &str) -> Result<()> {
	status
		.parse::<OrganizationStatus>()
		.map(|_| ())
		.map_err(|_| ApiError::bad_request(format!("invalid organization status: {status}")))
}

impl OrganizationBuilder {
	/// Checks `input` and assigns the new organization its id. Everything the
	/// caller sent is kept as is.
	pub fn build(&self, input: OrganizationInput) -> Result<NewOrganization> {
		validate_name(&input.name)?;

		let status = match input.status {
			Some(status) => {
				validate_status(&status)?;
				status
			}
			None => OrganizationStatus::default().to_string(),
		};

		Ok(NewOrganization {
			id: super::new_id(),
			name: input.name,
			website: input.website,
			pan: input.pan,
			tan: input.tan,
			gst: input.gst,
			cin: input.cin,
			logo: input.logo,
			sector: input.sector.unwrap_or_default(),
			status,
			is_final: input.is_final,
			is_archived: input.is_archived,
		})
	}

	pub fn validate_patch(&self, patch: &OrganizationPatch) -> Result<()> {
		if let Some(name) = &patch.name {
			validate_name(name)?;
		}

		if let Some(status) = &patch.status {
			validate_status(status)?;
		}

		Ok(())
	}
}
