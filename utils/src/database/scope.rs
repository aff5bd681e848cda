use std::future::Future;
use std::sync::Arc;

use deadpool_postgres::PoolError;
use futures_util::future::BoxFuture;

use super::is_statement_timeout;
use crate::context::{CancelReason, Context};
use crate::prelude::ContextExt;

/// Something that hands out connections, normally a pool.
pub trait ConnectionSource: Send + Sync {
	type Connection: Connection;

	fn acquire(&self) -> impl Future<Output = Result<Self::Connection, PoolError>> + Send;
}

/// A single checked out connection. Dropping it returns it to where it came
/// from.
pub trait Connection: Send + Sync + Sized {
	/// Runs one or more statements that return no rows.
	fn execute_batch(&self, sql: &str) -> impl Future<Output = Result<(), PoolError>> + Send;

	/// Releases a connection whose session state can no longer be trusted.
	fn discard(self) {
		drop(self);
	}
}

impl ConnectionSource for deadpool_postgres::Pool {
	type Connection = deadpool_postgres::Client;

	async fn acquire(&self) -> Result<Self::Connection, PoolError> {
		self.get().await
	}
}

impl<T: ConnectionSource> ConnectionSource for Arc<T> {
	type Connection = T::Connection;

	async fn acquire(&self) -> Result<Self::Connection, PoolError> {
		self.as_ref().acquire().await
	}
}

impl Connection for deadpool_postgres::Client {
	async fn execute_batch(&self, sql: &str) -> Result<(), PoolError> {
		let client: &tokio_postgres::Client = self;
		Ok(client.batch_execute(sql).await?)
	}

	fn discard(self) {
		drop(deadpool_postgres::Object::take(self));
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
	#[error("failed to acquire connection: {0}")]
	Acquire(PoolError),
	#[error("failed to set statement timeout: {0}")]
	Timeout(PoolError),
	#[error("failed to begin transaction: {0}")]
	Begin(PoolError),
	#[error("failed to commit transaction: {0}")]
	Commit(PoolError),
	#[error("deadline exceeded")]
	DeadlineExceeded,
	#[error("cancelled")]
	Cancelled,
}

impl ScopeError {
	fn from_cancel(reason: CancelReason, ctx: &Context) -> Self {
		match reason {
			CancelReason::Deadline => Self::DeadlineExceeded,
			CancelReason::Parent if ctx.is_expired() => Self::DeadlineExceeded,
			CancelReason::Parent | CancelReason::Cancel => Self::Cancelled,
		}
	}

	/// True when the unit of work ran out of time, either because the context
	/// expired or because Postgres aborted a statement on `statement_timeout`.
	pub fn is_deadline_exceeded(&self) -> bool {
		match self {
			Self::DeadlineExceeded => true,
			Self::Cancelled => false,
			_ => self.source_error().is_some_and(is_statement_timeout),
		}
	}

	pub fn source_error(&self) -> Option<&PoolError> {
		match self {
			Self::Acquire(err) | Self::Timeout(err) | Self::Begin(err) | Self::Commit(err) => Some(err),
			Self::DeadlineExceeded | Self::Cancelled => None,
		}
	}
}

/// The handle passed to the work of [`with_transaction`].
///
/// A transaction that is dropped before it was committed or rolled back, for
/// example because the future running it was cancelled, discards its
/// connection so the open transaction can never be reused by another
/// borrower.
pub struct Transaction<C: Connection> {
	conn: Option<C>,
}

impl<C: Connection> Transaction<C> {
	pub fn connection(&self) -> &C {
		// `release` is the only place that takes the connection and it consumes the transaction.
		self.conn.as_ref().unwrap_or_else(|| unreachable!("transaction already released"))
	}

	/// Returns the connection to its source.
	fn release(mut self) {
		drop(self.conn.take());
	}

	async fn commit(&self) -> Result<(), ScopeError> {
		self.connection().execute_batch("COMMIT").await.map_err(ScopeError::Commit)
	}

	/// A failed rollback leaves the connection in the transaction, so it is
	/// discarded on drop.
	async fn rollback(self) {
		let rolled_back = self.connection().execute_batch("ROLLBACK").await;
		match rolled_back {
			Ok(()) => self.release(),
			Err(err) => tracing::error!(error = %err, "failed to rollback transaction"),
		}
	}
}

impl<C: Connection> Drop for Transaction<C> {
	fn drop(&mut self) {
		if let Some(conn) = self.conn.take() {
			tracing::warn!("transaction was not finished, discarding its connection");
			conn.discard();
		}
	}
}

/// A connection with the statement timeout of its context applied, for reads
/// that do not need a transaction.
pub struct ScopedConnection<C> {
	conn: C,
}

impl<C> ScopedConnection<C> {
	pub fn connection(&self) -> &C {
		&self.conn
	}
}

/// Milliseconds Postgres should allow each statement. Zero disables the
/// cutoff, which also clears whatever the previous borrower left behind.
fn statement_timeout_ms(ctx: &Context) -> u128 {
	ctx.remaining().map_or(0, |remaining| remaining.as_millis().max(1))
}

async fn open<S: ConnectionSource>(source: &S, ctx: &Context) -> Result<S::Connection, ScopeError> {
	if ctx.is_expired() {
		return Err(ScopeError::DeadlineExceeded);
	}

	let conn = source
		.acquire()
		.with_context(ctx)
		.await
		.map_err(|reason| ScopeError::from_cancel(reason, ctx))?
		.map_err(ScopeError::Acquire)?;

	let sql = format!("SET statement_timeout TO {}", statement_timeout_ms(ctx));
	conn.execute_batch(&sql)
		.with_context(ctx)
		.await
		.map_err(|reason| ScopeError::from_cancel(reason, ctx))?
		.map_err(ScopeError::Timeout)?;

	Ok(conn)
}

/// Checks out a connection bounded by `ctx` without opening a transaction.
pub async fn connect<S: ConnectionSource>(source: &S, ctx: &Context) -> Result<ScopedConnection<S::Connection>, ScopeError> {
	Ok(ScopedConnection {
		conn: open(source, ctx).await?,
	})
}

/// Runs `work` inside a transaction on a single connection.
///
/// The connection gets a statement timeout derived from `ctx` before `BEGIN`.
/// When `work` succeeds the transaction is committed. When `work` fails, the
/// context ends or `COMMIT` fails, the transaction is rolled back and the
/// original error is returned. A failed rollback is only logged and the
/// connection is discarded. The connection is released exactly once on every
/// path, including when the returned future is dropped part way through.
pub async fn with_transaction<S, F, T, E>(source: &S, ctx: &Context, work: F) -> Result<T, E>
where
	S: ConnectionSource,
	F: for<'t> FnOnce(&'t Transaction<S::Connection>) -> BoxFuture<'t, Result<T, E>>,
	T: Send,
	E: From<ScopeError> + Send,
{
	let tx = Transaction {
		conn: Some(open(source, ctx).await?),
	};

	let begun = tx.connection().execute_batch("BEGIN").await;
	if let Err(err) = begun {
		tx.release();
		return Err(ScopeError::Begin(err).into());
	}

	let result = match work(&tx).with_context(ctx).await {
		Ok(result) => result,
		Err(reason) => Err(ScopeError::from_cancel(reason, ctx).into()),
	};

	let result = match result {
		Ok(value) => {
			let committed = tx.commit().await;
			match committed {
				Ok(()) => {
					tx.release();
					return Ok(value);
				}
				Err(err) => Err(err.into()),
			}
		}
		Err(err) => Err(err),
	};

	tx.rollback().await;

	result
}

#[cfg(test)]
mod tests;
