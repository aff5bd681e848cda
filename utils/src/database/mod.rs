mod query_builder;
mod scope;

pub use deadpool_postgres::{Pool, PoolError};
pub use postgres_from_row::FromRow;
pub use postgres_types::{Json, ToSql};
pub use query_builder::*;
pub use scope::*;
pub use {deadpool_postgres, postgres_from_row, postgres_types, tokio_postgres};

/// The transaction handle handed out by [`with_transaction`] for a pooled
/// Postgres connection.
pub type PgTransaction = Transaction<deadpool_postgres::Client>;

/// The read-only scope handed out by [`connect`] for a pooled Postgres
/// connection.
pub type PgConnection = ScopedConnection<deadpool_postgres::Client>;

/// Returns true when the error is Postgres aborting a statement because it ran
/// past `statement_timeout`.
pub fn is_statement_timeout(err: &PoolError) -> bool {
	match err {
		PoolError::Backend(err) => err.code() == Some(&tokio_postgres::error::SqlState::QUERY_CANCELED),
		_ => false,
	}
}

/// Escapes `%`, `_` and `\` so user text matches literally inside a
/// `LIKE`/`ILIKE` pattern.
pub fn escape_like(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		if matches!(c, '%' | '_' | '\\') {
			escaped.push('\\');
		}
		escaped.push(c);
	}
	escaped
}
