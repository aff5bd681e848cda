use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An organization as stored.
#[derive(Debug, Clone, PartialEq, Eq, postgres_from_row::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
	pub id: Uuid,
	/// Short numeric code assigned by the database.
	pub code: i64,
	pub name: String,
	pub website: Option<String>,
	pub pan: Option<String>,
	pub tan: Option<String>,
	pub gst: Option<String>,
	pub cin: Option<String>,
	pub logo: Option<Uuid>,
	pub sector: String,
	pub status: String,
	pub is_final: bool,
	pub is_archived: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrganizationStatus {
	#[default]
	Active,
	Pending,
	Suspended,
}

impl OrganizationStatus {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Active => "ACTIVE",
			Self::Pending => "PENDING",
			Self::Suspended => "SUSPENDED",
		}
	}
}

impl fmt::Display for OrganizationStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for OrganizationStatus {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"ACTIVE" => Ok(Self::Active),
			"PENDING" => Ok(Self::Pending),
			"SUSPENDED" => Ok(Self::Suspended),
			_ => Err(()),
		}
	}
}

/// Creation payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrganizationInput {
	pub name: String,
	pub website: Option<String>,
	pub pan: Option<String>,
	pub tan: Option<String>,
	pub gst: Option<String>,
	pub cin: Option<String>,
	pub logo: Option<Uuid>,
	pub sector: Option<String>,
	pub status: Option<String>,
	pub is_final: bool,
	pub is_archived: bool,
}

/// A validated organization that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrganization {
	pub id: Uuid,
	pub name: String,
	pub website: Option<String>,
	pub pan: Option<String>,
	pub tan: Option<String>,
	pub gst: Option<String>,
	pub cin: Option<String>,
	pub logo: Option<Uuid>,
	pub sector: String,
	pub status: String,
	pub is_final: bool,
	pub is_archived: bool,
}

/// Sparse update. `None` leaves a column alone; for nullable columns
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrganizationPatch {
	pub name: Option<String>,
	#[serde(deserialize_with = "super::double_option")]
	pub website: Option<Option<String>>,
	#[serde(deserialize_with = "super::double_option")]
	pub pan: Option<Option<String>>,
	#[serde(deserialize_with = "super::double_option")]
	pub tan: Option<Option<String>>,
	#[serde(deserialize_with = "super::double_option")]
	pub gst: Option<Option<String>>,
	#[serde(deserialize_with = "super::double_option")]
	pub cin: Option<Option<String>>,
	#[serde(deserialize_with = "super::double_option")]
	pub logo: Option<Option<Uuid>>,
	pub sector: Option<String>,
	pub status: Option<String>,
	pub is_final: Option<bool>,
	pub is_archived: Option<bool>,
}

impl OrganizationPatch {
	/// Writes the columns set in the patch onto `org`.
	pub fn apply(self, org: &mut Organization) {
		if let Some(name) = self.name {
			org.name = name;
		}
		if let Some(website) = self.website {
			org.website = website;
		}
		if let Some(pan) = self.pan {
			org.pan = pan;
		}
		if let Some(tan) = self.tan {
			org.tan = tan;
		}
		if let Some(gst) = self.gst {
			org.gst = gst;
		}
		if let Some(cin) = self.cin {
			org.cin = cin;
		}
		if let Some(logo) = self.logo {
			org.logo = logo;
		}
		if let Some(sector) = self.sector {
			org.sector = sector;
		}
		if let Some(status) = self.status {
			org.status = status;
		}
		if let Some(is_final) = self.is_final {
			org.is_final = is_final;
		}
		if let Some(is_archived) = self.is_archived {
			org.is_archived = is_archived;
		}
	}
}

impl From<&Organization> for OrganizationPatch {
	/// Every column set, so applying it replaces the stored row.
	fn from(org: &Organization) -> Self {
		Self {
			name: Some(org.name.clone()),
			website: Some(org.website.clone()),
			pan: Some(org.pan.clone()),
			tan: Some(org.tan.clone()),
			gst: Some(org.gst.clone()),
			cin: Some(org.cin.clone()),
			logo: Some(org.logo),
			sector: Some(org.sector.clone()),
			status: Some(org.status.clone()),
			is_final: Some(org.is_final),
			is_archived: Some(org.is_archived),
		}
	}
}
