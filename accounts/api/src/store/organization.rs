use utils::database::{ClientLike, PgTransaction, QueryBuilder};
use uuid::Uuid;

use super::sql::{self, Assignments, INSERT_CHUNK_SIZE};
use crate::error::{ApiError, Result};
use crate::models::{NewOrganization, Organization, OrganizationPatch, Page, SearchFilter};

const TABLE: &str = "organizations";

const LIST_COLUMNS: &str = "organizations.*, (SELECT COUNT(*) FROM users WHERE users.organization_id = organizations.id) AS count";

const INSERT_COLUMNS: &str =
	"INSERT INTO organizations (id, name, website, pan, tan, gst, cin, logo, sector, status, is_final, is_archived) ";

/// Queries over the `organizations` table. Reads run on any client, writes only
/// on a transaction.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrganizationStore;

fn push_filter(qb: &mut QueryBuilder<'_>, filter: &SearchFilter) {
	qb.push(" WHERE TRUE");

	if let Some(is_archived) = filter.is_archived {
		qb.push(" AND organizations.is_archived = ").push_bind(is_archived);
	}

	if let Some(is_final) = filter.is_final {
		qb.push(" AND organizations.is_final = ").push_bind(is_final);
	}

	if let Some(text) = &filter.text {
		qb.push(" AND organizations.name ILIKE ").push_bind(sql::contains_pattern(text));
	}
}

fn not_found(id: impl std::fmt::Display) -> ApiError {
	ApiError::not_found(format!("organization {id} not found"))
}

impl OrganizationStore {
	/// One page of organizations plus the number of rows matching the filter.
	pub async fn list(&self, conn: impl ClientLike, filter: &SearchFilter) -> Result<Page<Organization>> {
		let mut qb = utils::database::query(format!("SELECT {LIST_COLUMNS} FROM organizations"));
		push_filter(&mut qb, filter);
		sql::push_order_and_page(&mut qb, TABLE, filter);

		let list = qb.build_query_as::<Organization>().fetch_all(&conn).await?;

		let mut qb = utils::database::query("SELECT COUNT(*) FROM organizations");
		push_filter(&mut qb, filter);

		let total = qb.build_query_single_scalar::<i64>().fetch_one(&conn).await?;

		Ok(Page { total, list })
	}

	pub async fn find_by_id(&self, conn: impl ClientLike, id: Uuid) -> Result<Option<Organization>> {
		Ok(utils::database::query("SELECT * FROM organizations WHERE id = $1")
			.bind(id)
			.build_query_as()
			.fetch_optional(conn)
			.await?)
	}

	pub async fn get_by_id(&self, conn: impl ClientLike, id: Uuid) -> Result<Organization> {
		self.find_by_id(conn, id).await?.ok_or_else(|| not_found(id))
	}

	pub async fn get_by_code(&self, conn: impl ClientLike, code: i64) -> Result<Organization> {
		utils::database::query("SELECT * FROM organizations WHERE code = $1")
			.bind(code)
			.build_query_as()
			.fetch_optional(conn)
			.await?
			.ok_or_else(|| ApiError::not_found(format!("organization with code {code} not found")))
	}

	pub async fn insert(&self, tx: &PgTransaction, org: &NewOrganization) -> Result<Organization> {
		let mut rows = self.bulk_insert(tx, std::slice::from_ref(org)).await?;
		rows.pop()
			.ok_or_else(|| ApiError::internal_server("insert returned no row"))
	}

	/// Inserts every organization, in statements of at most
	/// [`INSERT_CHUNK_SIZE`] rows.
	pub async fn bulk_insert(&self, tx: &PgTransaction, orgs: &[NewOrganization]) -> Result<Vec<Organization>> {
		let mut inserted = Vec::with_capacity(orgs.len());

		for chunk in orgs.chunks(INSERT_CHUNK_SIZE) {
			let mut qb = utils::database::query(INSERT_COLUMNS);
			qb.push_values(chunk, |mut sep, org| {
				sep.push_bind(org.id);
				sep.push_bind(&org.name);
				sep.push_bind(&org.website);
				sep.push_bind(&org.pan);
				sep.push_bind(&org.tan);
				sep.push_bind(&org.gst);
				sep.push_bind(&org.cin);
				sep.push_bind(org.logo);
				sep.push_bind(&org.sector);
				sep.push_bind(&org.status);
				sep.push_bind(org.is_final);
				sep.push_bind(org.is_archived);
			});
			qb.push(" RETURNING *");

			inserted.extend(qb.build_query_as::<Organization>().fetch_all(tx).await?);
		}

		Ok(inserted)
	}

	/// Applies the columns set in `patch` and refreshes `updated_at`.
	pub async fn update(&self, tx: &PgTransaction, id: Uuid, patch: &OrganizationPatch) -> Result<Organization> {
		let mut assignments = Assignments::new();
		assignments
			.set("name", patch.name.clone())
			.set("website", patch.website.clone())
			.set("pan", patch.pan.clone())
			.set("tan", patch.tan.clone())
			.set("gst", patch.gst.clone())
			.set("cin", patch.cin.clone())
			.set("logo", patch.logo)
			.set("sector", patch.sector.clone())
			.set("status", patch.status.clone())
			.set("is_final", patch.is_final)
			.set("is_archived", patch.is_archived);

		assignments
			.into_update(TABLE, id, "*")
			.build_query_as()
			.fetch_optional(tx)
			.await?
			.ok_or_else(|| not_found(id))
	}

	/// Replaces each organization with the given values.
	pub async fn bulk_update(&self, tx: &PgTransaction, orgs: &[Organization]) -> Result<Vec<Organization>> {
		let mut updated = Vec::with_capacity(orgs.len());
		for org in orgs {
			updated.push(self.update(tx, org.id, &OrganizationPatch::from(org)).await?);
		}
		Ok(updated)
	}

	pub async fn delete(&self, tx: &PgTransaction, id: Uuid) -> Result<()> {
		let affected = utils::database::query("DELETE FROM organizations WHERE id = $1")
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
