use super::*;
use crate::error::ErrorKind;
use crate::models::{SortBy, SortDir};

#[test]
fn test_empty_query_is_default() {
	assert_eq!(search_filter(None, 100).unwrap(), SearchFilter::default());
	assert_eq!(search_filter(Some(""), 100).unwrap(), SearchFilter::default());
}

#[test]
fn test_full_query() {
	let org = Uuid::from(ulid::Ulid::new());
	let query = format!(
		"text=acme%20corp&sortBy=Alphabetical&sortDir=Descending&offset=20&limit=5&isFinal=true&isArchived=false&isAccepted=yes&orgId={org}"
	);

	let filter = search_filter(Some(&query), 100).unwrap();
	assert_eq!(filter.text.as_deref(), Some("acme corp"));
	assert_eq!(filter.sort_by, Some(SortBy::Alphabetical));
	assert_eq!(filter.sort_dir, Some(SortDir::Descending));
	assert_eq!(filter.offset, 20);
	assert_eq!(filter.limit, 5);
	assert_eq!(filter.is_final, Some(true));
	assert_eq!(filter.is_archived, Some(false));
	assert_eq!(filter.is_accepted, Some(false));
	assert_eq!(filter.is_approved, None);
	assert_eq!(filter.org_id, Some(org));
	assert_eq!(filter.creator_id, None);
}

#[test]
fn test_unknown_sort_is_none() {
	let filter = search_filter(Some("sortBy=name&sortDir=up"), 100).unwrap();
	assert_eq!(filter.sort_by, None);
	assert_eq!(filter.sort_dir, None);
}

#[test]
fn test_bad_numbers_keep_defaults() {
	let filter = search_filter(Some("offset=abc&limit=1.5"), 100).unwrap();
	assert_eq!(filter.offset, 0);
	assert_eq!(filter.limit, 10);
}

#[test]
fn test_limit_bounds() {
	assert!(search_filter(Some("limit=100"), 100).is_ok());
	assert!(search_filter(Some("limit=1"), 100).is_ok());

	for query in ["limit=0", "limit=-3", "limit=101"] {
		let err = search_filter(Some(query), 100).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::BadRequest, "{query}");
	}
}

#[test]
fn test_bad_ids() {
	assert_eq!(
		search_filter(Some("orgId=nope"), 100).unwrap_err().kind(),
		ErrorKind::BadRequest
	);
	assert_eq!(
		search_filter(Some("creatorId=1"), 100).unwrap_err().kind(),
		ErrorKind::BadRequest
	);
}
