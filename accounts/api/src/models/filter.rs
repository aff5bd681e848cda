use std::str::FromStr;

use uuid::Uuid;

pub const DEFAULT_LIMIT: i64 = 10;

/// Sort keys accepted by list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SortBy {
	Alphabetical,
	Count,
	DateCreated,
	DateUpdated,
}

impl FromStr for SortBy {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"Alphabetical" => Ok(Self::Alphabetical),
			"Count" => Ok(Self::Count),
			"DateCreated" => Ok(Self::DateCreated),
			"DateUpdated" => Ok(Self::DateUpdated),
			_ => Err(()),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SortDir {
	Ascending,
	Descending,
}

impl SortDir {
	/// Anything but an explicit ascending request sorts descending.
	pub fn sql(dir: Option<Self>) -> &'static str {
		match dir {
			Some(Self::Ascending) => "ASC",
			Some(Self::Descending) | None => "DESC",
		}
	}
}

impl FromStr for SortDir {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"Ascending" => Ok(Self::Ascending),
			"Descending" => Ok(Self::Descending),
			_ => Err(()),
		}
	}
}

/// Query shaping for list operations.
///
/// `sort_by` and `sort_dir` are `None` when the caller sent something that is
/// not a known key, the stores then fall back to the update time, descending.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilter {
	pub text: Option<String>,
	pub sort_by: Option<SortBy>,
	pub sort_dir: Option<SortDir>,
	pub offset: i64,
	pub limit: i64,
	pub is_final: Option<bool>,
	pub is_accepted: Option<bool>,
	pub is_approved: Option<bool>,
	pub is_archived: Option<bool>,
	pub org_id: Option<Uuid>,
	pub creator_id: Option<Uuid>,
}

impl Default for SearchFilter {
	fn default() -> Self {
		Self {
			text: None,
			sort_by: Some(SortBy::DateCreated),
			sort_dir: Some(SortDir::Ascending),
			offset: 0,
			limit: DEFAULT_LIMIT,
			is_final: None,
			is_accepted: None,
			is_approved: None,
			is_archived: None,
			org_id: None,
			creator_id: None,
		}
	}
}

impl SearchFilter {
	/// Clamps pagination into range and drops blank search text.
	pub fn normalized(mut self) -> Self {
		self.offset = self.offset.max(0);
		if self.limit < 1 {
			self.limit = DEFAULT_LIMIT;
		}

		self.text = self
			.text
			.map(|text| text.trim().to_owned())
			.filter(|text| !text.is_empty());

		self
	}
}

/// One page of a list operation. `total` counts every matching row, ignoring
/// pagination.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
	pub total: i64,
	pub list: Vec<T>,
}
