use std::collections::HashSet;

use argon2::{Argon2, PasswordHash, PasswordVerifier};

use super::*;
use crate::error::ErrorKind;
use crate::models::{OrganizationInput, OrganizationPatch, UserInput, UserPatch};

fn org_input(name: &str) -> OrganizationInput {
	OrganizationInput {
		name: name.to_owned(),
		..Default::default()
	}
}

fn user_input() -> UserInput {
	UserInput {
		email: "ada@example.com".into(),
		first_name: "Ada".into(),
		last_name: "Lovelace".into(),
		password: Some("correct horse".into()),
		organization_id: None,
	}
}

#[test]
fn test_ids_are_unique_and_ordered() {
	let ids = (0..256).map(|_| new_id()).collect::<Vec<_>>();
	assert!(ids.iter().all(|id| !id.is_nil()));
	assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());

	let first = ulid::Ulid::from(ids[0]);
	let last = ulid::Ulid::from(ids[255]);
	assert!(first.timestamp_ms() <= last.timestamp_ms());
}

#[test]
fn test_org_defaults() {
	let org = OrganizationBuilder.build(org_input("Acme")).unwrap();
	assert_eq!(org.name, "Acme");
	assert_eq!(org.status, "ACTIVE");
	assert_eq!(org.sector, "");
	assert!(!org.is_final);
	assert!(!org.is_archived);
}

#[test]
fn test_org_copies_input() {
	let input = OrganizationInput {
		name: "  Acme ".into(),
		website: Some("https://acme.test".into()),
		gst: Some("GST".into()),
		sector: Some("retail".into()),
		status: Some("PENDING".into()),
		is_final: true,
		..Default::default()
	};

	let org = OrganizationBuilder.build(input).unwrap();
	assert_eq!(org.name, "  Acme ");
	assert_eq!(org.website.as_deref(), Some("https://acme.test"));
	assert_eq!(org.gst.as_deref(), Some("GST"));
	assert_eq!(org.sector, "retail");
	assert_eq!(org.status, "PENDING");
	assert!(org.is_final);
}

#[test]
fn test_org_name_required() {
	for name in ["", "   ", "\t\n"] {
		let err = OrganizationBuilder.build(org_input(name)).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::BadRequest);
	}
}

#[test]
fn test_org_status_checked() {
	let input = OrganizationInput {
		status: Some("active".into()),
		..org_input("Acme")
	};
	assert_eq!(OrganizationBuilder.build(input).unwrap_err().kind(), ErrorKind::BadRequest);

	let patch = OrganizationPatch {
		status: Some("GONE".into()),
		..Default::default()
	};
	assert_eq!(OrganizationBuilder.validate_patch(&patch).unwrap_err().kind(), ErrorKind::BadRequest);

	let patch = OrganizationPatch {
		name: Some(" ".into()),
		..Default::default()
	};
	assert_eq!(OrganizationBuilder.validate_patch(&patch).unwrap_err().kind(), ErrorKind::BadRequest);

	assert!(OrganizationBuilder.validate_patch(&OrganizationPatch::default()).is_ok());
}

#[test]
fn test_user_build_hashes_password() {
	let user = UserBuilder.build(user_input()).unwrap();
	assert_eq!(user.email, "ada@example.com");

	let hash = user.password_hash.expect("password hash");
	assert_ne!(hash, "correct horse");

	let parsed = PasswordHash::new(&hash).unwrap();
	assert!(Argon2::default().verify_password(b"correct horse", &parsed).is_ok());
}

#[test]
fn test_user_without_password() {
	let user = UserBuilder
		.build(UserInput {
			password: None,
			..user_input()
		})
		.unwrap();
	assert_eq!(user.password_hash, None);
}

#[test]
fn test_user_validation() {
	let cases = [
		UserInput {
			email: String::new(),
			..user_input()
		},
		UserInput {
			email: "not-an-email".into(),
			..user_input()
		},
		UserInput {
			first_name: " ".into(),
			..user_input()
		},
		UserInput {
			last_name: String::new(),
			..user_input()
		},
		UserInput {
			password: Some(String::new()),
			..user_input()
		},
	];

	for input in cases {
		assert_eq!(UserBuilder.build(input).unwrap_err().kind(), ErrorKind::BadRequest);
	}
}

#[test]
fn test_user_patch() {
	let update = UserBuilder
		.validate_patch(UserPatch {
			last_name: Some("Byron".into()),
			password: Some("hunter2".into()),
			..Default::default()
		})
		.unwrap();

	assert_eq!(update.last_name.as_deref(), Some("Byron"));
	assert_eq!(update.email, None);
	assert!(update.password_hash.is_some_and(|hash| hash.starts_with("$argon2")));

	let err = UserBuilder
		.validate_patch(UserPatch {
			email: Some("nope".into()),
			..Default::default()
		})
		.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::BadRequest);
}
