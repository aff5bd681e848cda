use utils::database::{Param, QueryBuilder, ToSql};
use uuid::Uuid;

use crate::models::{SearchFilter, SortBy, SortDir};

/// Refreshes `updated_at` on every update. `clock_timestamp()` alone can tie
/// with the previous value inside one transaction, the `GREATEST` keeps it
/// strictly increasing.
pub const TOUCH_UPDATED_AT: &str = "updated_at = GREATEST(clock_timestamp(), updated_at + INTERVAL '1 microsecond')";

/// Rows per statement for bulk inserts, well below the Postgres parameter cap.
pub const INSERT_CHUNK_SIZE: usize = 1000;

/// Maps a sort key to the column it orders by. The key never reaches the SQL
/// text itself, only one of these fixed names does.
pub fn sort_column(table: &str, sort_by: Option<SortBy>) -> String {
	match sort_by {
		Some(SortBy::Alphabetical) => format!("{table}.id"),
		Some(SortBy::Count) => "count".to_owned(),
		Some(SortBy::DateCreated) => format!("{table}.created_at"),
		Some(SortBy::DateUpdated) | None => format!("{table}.updated_at"),
	}
}

/// Appends the `ORDER BY` clause followed by the bound `OFFSET` and `LIMIT`.
/// Ties are broken on the id so pages never overlap.
pub fn push_order_and_page(qb: &mut QueryBuilder<'_>, table: &str, filter: &SearchFilter) {
	let dir = SortDir::sql(filter.sort_dir);

	qb.push(format!(
		" ORDER BY {} {dir}, {table}.id {dir}",
		sort_column(table, filter.sort_by)
	));
	qb.push(" OFFSET ").push_bind(filter.offset);
	qb.push(" LIMIT ").push_bind(filter.limit);
}

/// `ILIKE` pattern matching `text` anywhere, with wildcards in `text` taken
/// literally.
pub fn contains_pattern(text: &str) -> String {
	format!("%{}%", utils::database::escape_like(text))
}

/// An ordered list of `column = value` pairs for a sparse update. Only columns
/// that were set end up in the statement.
#[derive(Default)]
pub struct Assignments {
	columns: Vec<(&'static str, Param<'static>)>,
}

impl Assignments {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds `column` when `value` is present.
	pub fn set<T: ToSql + Send + Sync + 'static>(&mut self, column: &'static str, value: Option<T>) -> &mut Self {
		if let Some(value) = value {
			self.columns.push((column, Box::new(value)));
		}
		self
	}

	pub fn is_empty(&self) -> bool {
		self.columns.is_empty()
	}

	pub fn len(&self) -> usize {
		self.columns.len()
	}

	/// Builds `UPDATE {table} SET ... WHERE id = $n RETURNING {returning}`.
	/// `updated_at` is always refreshed, even for an empty patch.
	pub fn into_update(self, table: &str, id: Uuid, returning: &str) -> QueryBuilder<'static> {
		let mut qb = utils::database::query(format!("UPDATE {table} SET "));

		let mut separated = qb.separated(", ");
		for (column, value) in self.columns {
			separated.push(format!("{column} = "));
			separated.push_bind_boxed_unseparated(value);
		}
		separated.push(TOUCH_UPDATED_AT);

		qb.push(" WHERE id = ").push_bind(id);
		qb.push(format!(" RETURNING {returning}"));

		qb
	}
}
