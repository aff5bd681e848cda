use utils::database::{ClientLike, PgTransaction, QueryBuilder};
use uuid::Uuid;

use super::sql::{self, Assignments, INSERT_CHUNK_SIZE};
use crate::error::{ApiError, Result};
use crate::models::{NewUser, Page, SearchFilter, User, UserUpdate};

const TABLE: &str = "users";

/// Everything but the password.
const COLUMNS: &str = "users.id, users.email, users.first_name, users.last_name, users.organization_id, users.created_at, users.updated_at";

const INSERT_COLUMNS: &str = "INSERT INTO users (id, email, first_name, last_name, password, organization_id) ";

#[derive(Debug, Default, Clone, Copy)]
pub struct UserStore;

fn push_filter(qb: &mut QueryBuilder<'_>, filter: &SearchFilter) {
	qb.push(" WHERE TRUE");

	if let Some(org_id) = filter.org_id {
		qb.push(" AND users.organization_id = ").push_bind(org_id);
	}

	if let Some(text) = &filter.text {
		let pattern = sql::contains_pattern(text);
		qb.push(" AND (users.email ILIKE ").push_bind(pattern.clone());
		qb.push(" OR users.first_name ILIKE ").push_bind(pattern.clone());
		qb.push(" OR users.last_name ILIKE ").push_bind(pattern);
		qb.push(")");
	}
}

fn not_found(id: Uuid) -> ApiError {
	ApiError::not_found(format!("user {id} not found"))
}

impl UserStore {
	/// One page of users plus the number of rows matching the filter. The
	/// `count` sort key is the size of the user's organization.
	pub async fn list(&self, conn: impl ClientLike, filter: &SearchFilter) -> Result<Page<User>> {
		let mut qb = utils::database::query(format!(
			"SELECT {COLUMNS}, (SELECT COUNT(*) FROM users AS members WHERE members.organization_id = users.organization_id) AS count FROM users"
		));
		push_filter(&mut qb, filter);
		sql::push_order_and_page(&mut qb, TABLE, filter);

		let list = qb.build_query_as::<User>().fetch_all(&conn).await?;

		let mut qb = utils::database::query("SELECT COUNT(*) FROM users");
		push_filter(&mut qb, filter);

		let total = qb.build_query_single_scalar::<i64>().fetch_one(&conn).await?;

		Ok(Page { total, list })
	}

	pub async fn find_by_id(&self, conn: impl ClientLike, id: Uuid) -> Result<Option<User>> {
		Ok(utils::database::query(format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
			.bind(id)
			.build_query_as()
			.fetch_optional(conn)
			.await?)
	}

	pub async fn get_by_id(&self, conn: impl ClientLike, id: Uuid) -> Result<User> {
		self.find_by_id(conn, id).await?.ok_or_else(|| not_found(id))
	}

	/// Case-insensitive lookup, used to keep e-mails unique.
	pub async fn find_by_email(&self, conn: impl ClientLike, email: &str) -> Result<Option<User>> {
		Ok(
			utils::database::query(format!("SELECT {COLUMNS} FROM users WHERE lower(email) = lower($1)"))
				.bind(email)
				.build_query_as()
				.fetch_optional(conn)
				.await?,
		)
	}

	pub async fn insert(&self, tx: &PgTransaction, user: &NewUser) -> Result<User> {
		let mut rows = self.bulk_insert(tx, std::slice::from_ref(user)).await?;
		rows.pop()
			.ok_or_else(|| ApiError::internal_server("insert returned no row"))
	}

	pub async fn bulk_insert(&self, tx: &PgTransaction, users: &[NewUser]) -> Result<Vec<User>> {
		let mut inserted = Vec::with_capacity(users.len());

		for chunk in users.chunks(INSERT_CHUNK_SIZE) {
			let mut qb = utils::database::query(INSERT_COLUMNS);
			qb.push_values(chunk, |mut sep, user| {
				sep.push_bind(user.id);
				sep.push_bind(&user.email);
				sep.push_bind(&user.first_name);
				sep.push_bind(&user.last_name);
				sep.push_bind(&user.password_hash);
				sep.push_bind(user.organization_id);
			});
			qb.push(format!(" RETURNING {COLUMNS}"));

			inserted.extend(qb.build_query_as::<User>().fetch_all(tx).await?);
		}

		Ok(inserted)
	}

	/// Applies the columns set in `update` and refreshes `updated_at`. The
	/// password only changes when a new hash is given.
	pub async fn update(&self, tx: &PgTransaction, id: Uuid, update: &UserUpdate) -> Result<User> {
		let mut assignments = Assignments::new();
		assignments
			.set("email", update.email.clone())
			.set("first_name", update.first_name.clone())
			.set("last_name", update.last_name.clone())
			.set("password", update.password_hash.clone())
			.set("organization_id", update.organization_id);

		assignments
			.into_update(TABLE, id, COLUMNS)
			.build_query_as()
			.fetch_optional(tx)
			.await?
			.ok_or_else(|| not_found(id))
	}

	/// Replaces each user's visible columns with the given values.
	pub async fn bulk_update(&self, tx: &PgTransaction, users: &[User]) -> Result<Vec<User>> {
		let mut updated = Vec::with_capacity(users.len());
		for user in users {
			updated.push(self.update(tx, user.id, &UserUpdate::from(user)).await?);
		}
		Ok(updated)
	}

	pub async fn delete(&self, tx: &PgTransaction, id: Uuid) -> Result<()> {
		let affected = utils::database::query("DELETE FROM users WHERE id = $1")
			.bind(id)
			.build()
			.execute(tx)
			.await?;

		if affected == 0 {
			return Err(not_found(id));
		}

		Ok(())
	}
}
