use std::sync::Arc;

use postgres_from_row::FromRow;
use postgres_types::{FromSql, ToSql};
use tokio_postgres::{Error, Row};

use super::{ScopedConnection, Transaction};

pub fn query<'a>(query: impl ToString) -> QueryBuilder<'a> {
	QueryBuilder::new(query)
}

pub type Param<'a> = Box<dyn ToSql + Send + Sync + 'a>;

/// Accumulates SQL text and its parameters. Values only ever enter the
/// statement as `$n` placeholders.
#[derive(Default)]
pub struct QueryBuilder<'a> {
	query: String,
	params: Vec<Param<'a>>,
}

impl<'args> QueryBuilder<'args> {
	pub fn new(query: impl ToString) -> Self {
		Self {
			query: query.to_string(),
			params: Vec::new(),
		}
	}

	pub fn push_bind(&mut self, param: impl ToSql + Send + Sync + 'args) -> &mut Self {
		self.push_bind_boxed(Box::new(param))
	}

	pub fn push_bind_boxed(&mut self, param: Param<'args>) -> &mut Self {
		self.params.push(param);
		self.query.push_str(format!("${}", self.params.len()).as_str());
		self
	}

	pub fn bind(&mut self, param: impl ToSql + Send + Sync + 'args) -> &mut Self {
		self.params.push(Box::new(param));
		self
	}

	pub fn push(&mut self, query: impl AsRef<str>) -> &mut Self {
		self.query.push_str(query.as_ref());
		self
	}

	pub fn separated(&mut self, sep: &'args str) -> Separated<'_, 'args> {
		Separated {
			sep,
			first: true,
			query_builder: self,
		}
	}

	pub fn push_values<T>(
		&mut self,
		values: impl IntoIterator<Item = T>,
		mut f: impl FnMut(Separated<'_, 'args>, T),
	) -> &mut Self {
		self.push("VALUES ");

		let mut separated = self.separated(",");

		for value in values {
			separated.push("(");

			f(separated.query_builder.separated(", "), value);

			separated.push_unseparated(")");
		}

		separated.query_builder
	}

	pub fn build(&self) -> Query<'_, NoParse, Row> {
		Query {
			query: &self.query,
			params: &self.params,
			_marker: std::marker::PhantomData,
		}
	}

	pub fn build_query_as<T: FromRow>(&self) -> Query<'_, FromRowParse<T>, T> {
		Query {
			query: &self.query,
			params: &self.params,
			_marker: std::marker::PhantomData,
		}
	}

	pub fn build_query_single_scalar<T: for<'a> FromSql<'a>>(&self) -> Query<'_, SingleScalarParse<T>, T> {
		Query {
			query: &self.query,
			params: &self.params,
			_marker: std::marker::PhantomData,
		}
	}

	pub fn sql(&self) -> &str {
		self.query.as_str()
	}

	pub fn params_len(&self) -> usize {
		self.params.len()
	}
}

pub struct SingleScalarParse<T>(std::marker::PhantomData<T>);

pub struct FromRowParse<T>(std::marker::PhantomData<T>);

pub struct NoParse;

impl<T> RowParse for SingleScalarParse<T>
where
	T: for<'a> FromSql<'a>,
{
	type Item = T;

	#[inline]
	fn try_from_row(row: Row) -> Result<Self::Item, Error> {
		row.try_get(0)
	}
}

impl<T: FromRow> RowParse for FromRowParse<T> {
	type Item = T;

	#[inline]
	fn try_from_row(row: Row) -> Result<Self::Item, Error> {
		T::try_from_row(&row)
	}
}

impl RowParse for NoParse {
	type Item = Row;

	#[inline]
	fn try_from_row(row: Row) -> Result<Self::Item, Error> {
		Ok(row)
	}
}

pub trait RowParse {
	type Item;

	fn try_from_row(row: Row) -> Result<Self::Item, Error>;
}

pub struct Query<'a, T: RowParse<Item = O>, O> {
	query: &'a str,
	params: &'a [Param<'a>],
	_marker: std::marker::PhantomData<(T, O)>,
}

fn params<'a>(params: &'a [Param<'a>]) -> Vec<&'a (dyn ToSql + Sync)> {
	params.iter().map(|param| param.as_ref() as _).collect()
}

/// A trait that represents a client-like object that can be used to run
/// queries.
pub trait ClientLike: Send + Sync {
	#[doc(hidden)]
	fn query_builder_client(
		&self,
	) -> impl std::future::Future<Output = Result<impl AsRef<tokio_postgres::Client> + '_, deadpool_postgres::PoolError>> + Send;
}

struct ClientWrapper<'a>(&'a tokio_postgres::Client);

impl AsRef<tokio_postgres::Client> for ClientWrapper<'_> {
	fn as_ref(&self) -> &tokio_postgres::Client {
		self.0
	}
}

struct PoolClientWrapperOwned(deadpool_postgres::Client);

impl AsRef<tokio_postgres::Client> for PoolClientWrapperOwned {
	fn as_ref(&self) -> &tokio_postgres::Client {
		self.0.as_ref()
	}
}

impl ClientLike for tokio_postgres::Client {
	async fn query_builder_client(&self) -> Result<impl AsRef<tokio_postgres::Client> + '_, deadpool_postgres::PoolError> {
		Ok(ClientWrapper(self))
	}
}

impl ClientLike for deadpool_postgres::Pool {
	async fn query_builder_client(&self) -> Result<impl AsRef<tokio_postgres::Client> + '_, deadpool_postgres::PoolError> {
		Ok(PoolClientWrapperOwned(self.get().await?))
	}
}

impl ClientLike for deadpool_postgres::Client {
	async fn query_builder_client(&self) -> Result<impl AsRef<tokio_postgres::Client> + '_, deadpool_postgres::PoolError> {
		Ok(ClientWrapper(self.as_ref()))
	}
}

impl ClientLike for Transaction<deadpool_postgres::Client> {
	async fn query_builder_client(&self) -> Result<impl AsRef<tokio_postgres::Client> + '_, deadpool_postgres::PoolError> {
		Ok(ClientWrapper(self.connection().as_ref()))
	}
}

impl ClientLike for ScopedConnection<deadpool_postgres::Client> {
	async fn query_builder_client(&self) -> Result<impl AsRef<tokio_postgres::Client> + '_, deadpool_postgres::PoolError> {
		Ok(ClientWrapper(self.connection().as_ref()))
	}
}

impl<T: ClientLike + Sync + Send> ClientLike for Arc<T> {
	async fn query_builder_client(&self) -> Result<impl AsRef<tokio_postgres::Client> + '_, deadpool_postgres::PoolError> {
		self.as_ref().query_builder_client().await
	}
}

impl<T: ClientLike + Sync> ClientLike for &T {
	async fn query_builder_client(&self) -> Result<impl AsRef<tokio_postgres::Client> + '_, deadpool_postgres::PoolError> {
		(*self).query_builder_client().await
	}
}

impl<T: RowParse<Item = O>, O> Query<'_, T, O> {
	pub async fn execute(self, conn: impl ClientLike) -> Result<u64, deadpool_postgres::PoolError> {
		Ok(conn
			.query_builder_client()
			.await?
			.as_ref()
			.execute(self.query, &params(self.params))
			.await?)
	}

	pub async fn fetch_all(self, conn: impl ClientLike) -> Result<Vec<O>, deadpool_postgres::PoolError> {
		Ok(conn
			.query_builder_client()
			.await?
			.as_ref()
			.query(self.query, &params(self.params))
			.await?
			.into_iter()
			.map(T::try_from_row)
			.collect::<Result<_, Error>>()?)
	}

	pub async fn fetch_one(self, conn: impl ClientLike) -> Result<O, deadpool_postgres::PoolError> {
		Ok(T::try_from_row(
			conn.query_builder_client()
				.await?
				.as_ref()
				.query_one(self.query, &params(self.params))
				.await?,
		)?)
	}

	pub async fn fetch_optional(self, conn: impl ClientLike) -> Result<Option<O>, deadpool_postgres::PoolError> {
		Ok(conn
			.query_builder_client()
			.await?
			.as_ref()
			.query_opt(self.query, &params(self.params))
			.await?
			.map(T::try_from_row)
			.transpose()?)
	}
}

pub struct Separated<'b, 'args> {
	sep: &'b str,
	first: bool,
	query_builder: &'b mut QueryBuilder<'args>,
}

impl<'args> Separated<'_, 'args> {
	fn separate(&mut self) {
		if self.first {
			self.first = false;
		} else {
			self.query_builder.push(self.sep);
		}
	}

	pub fn push_bind(&mut self, param: impl ToSql + Send + Sync + 'args) -> &mut Self {
		self.separate();
		self.query_builder.push_bind(param);
		self
	}

	pub fn push(&mut self, query: impl AsRef<str>) -> &mut Self {
		self.separate();
		self.query_builder.push(query.as_ref());
		self
	}

	pub fn push_unseparated(&mut self, query: impl AsRef<str>) -> &mut Self {
		self.query_builder.push(query.as_ref());
		self
	}

	pub fn push_bind_unseparated(&mut self, param: impl ToSql + Send + Sync + 'args) -> &mut Self {
		self.query_builder.push_bind(param);
		self
	}

	pub fn push_bind_boxed_unseparated(&mut self, param: Param<'args>) -> &mut Self {
		self.query_builder.push_bind_boxed(param);
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_push_bind_numbers_placeholders() {
		let mut qb = query("SELECT * FROM organizations WHERE ");
		let mut separated = qb.separated(" AND ");
		separated.push("is_final = ").push_bind_unseparated(true);
		separated.push("name = ").push_bind_unseparated("acme");
		qb.push(" LIMIT ").push_bind(10_i64);

		assert_eq!(
			qb.sql(),
			"SELECT * FROM organizations WHERE is_final = $1 AND name = $2 LIMIT $3"
		);
		assert_eq!(qb.params_len(), 3);
	}

	#[test]
	fn test_push_values() {
		let rows = [("a", 1_i64), ("b", 2_i64)];
		let mut qb = query("INSERT INTO t (name, n) ");
		qb.push_values(rows.iter(), |mut row, (name, n)| {
			row.push_bind(*name);
			row.push_bind(*n);
		});

		assert_eq!(qb.sql(), "INSERT INTO t (name, n) VALUES ($1, $2),($3, $4)");
		assert_eq!(qb.params_len(), 4);
	}

	#[test]
	fn test_bind_does_not_push_placeholder() {
		let mut qb = query("SELECT * FROM users WHERE id = $1");
		qb.bind("id");

		assert_eq!(qb.sql(), "SELECT * FROM users WHERE id = $1");
		assert_eq!(qb.params_len(), 1);
	}
}
