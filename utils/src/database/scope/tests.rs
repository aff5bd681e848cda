use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::*;

#[derive(Default)]
struct FakeState {
	statements: Mutex<Vec<String>>,
	fail_on: Mutex<Vec<&'static str>>,
	acquired: AtomicUsize,
	released: AtomicUsize,
	discarded: AtomicUsize,
}

#[derive(Clone, Default)]
struct FakeSource(Arc<FakeState>);

impl FakeSource {
	fn failing_on(statements: &[&'static str]) -> Self {
		let source = Self::default();
		source.0.fail_on.lock().unwrap().extend_from_slice(statements);
		source
	}

	fn statements(&self) -> Vec<String> {
		self.0.statements.lock().unwrap().clone()
	}

	fn acquired(&self) -> usize {
		self.0.acquired.load(Ordering::SeqCst)
	}

	fn released(&self) -> usize {
		self.0.released.load(Ordering::SeqCst)
	}

	fn discarded(&self) -> usize {
		self.0.discarded.load(Ordering::SeqCst)
	}
}

struct FakeConnection(Arc<FakeState>);

impl Drop for FakeConnection {
	fn drop(&mut self) {
		self.0.released.fetch_add(1, Ordering::SeqCst);
	}
}

impl Connection for FakeConnection {
	async fn execute_batch(&self, sql: &str) -> Result<(), PoolError> {
		self.0.statements.lock().unwrap().push(sql.to_string());

		let fail = self.0.fail_on.lock().unwrap().iter().any(|prefix| sql.starts_with(prefix));
		if fail {
			Err(PoolError::Closed)
		} else {
			Ok(())
		}
	}

	fn discard(self) {
		self.0.discarded.fetch_add(1, Ordering::SeqCst);
	}
}

impl ConnectionSource for FakeSource {
	type Connection = FakeConnection;

	async fn acquire(&self) -> Result<Self::Connection, PoolError> {
		self.0.acquired.fetch_add(1, Ordering::SeqCst);
		Ok(FakeConnection(self.0.clone()))
	}
}

#[derive(Debug)]
enum TestError {
	Scope(ScopeError),
	Work(&'static str),
}

impl From<ScopeError> for TestError {
	fn from(err: ScopeError) -> Self {
		Self::Scope(err)
	}
}

fn timeout_ms(statement: &str) -> u64 {
	statement
		.strip_prefix("SET statement_timeout TO ")
		.expect("statement timeout statement")
		.parse()
		.expect("numeric timeout")
}

#[tokio::test]
async fn test_commit_on_success() {
	let source = FakeSource::default();
	let (ctx, _handler) = Context::with_timeout(Duration::from_secs(10));

	let result: Result<i32, TestError> = with_transaction(&source, &ctx, |tx| {
		Box::pin(async move {
			tx.connection().execute_batch("INSERT INTO organizations").await.map_err(ScopeError::Begin)?;
			Ok(7)
		})
	})
	.await;

	assert_eq!(result.unwrap(), 7);

	let statements = source.statements();
	assert_eq!(statements.len(), 4);
	let ms = timeout_ms(&statements[0]);
	assert!(ms > 9_000 && ms <= 10_000, "unexpected timeout {ms}");
	assert_eq!(&statements[1..], ["BEGIN", "INSERT INTO organizations", "COMMIT"]);
	assert_eq!(source.acquired(), 1);
	assert_eq!(source.released(), 1);
	assert_eq!(source.discarded(), 0);
}

#[tokio::test]
async fn test_rollback_on_work_error() {
	let source = FakeSource::default();
	let (ctx, _handler) = Context::with_timeout(Duration::from_secs(10));

	let result: Result<(), TestError> = with_transaction(&source, &ctx, |tx| {
		Box::pin(async move {
			tx.connection().execute_batch("INSERT INTO users").await?;
			Err(TestError::Work("email taken"))
		})
	})
	.await;

	assert!(matches!(result, Err(TestError::Work("email taken"))));
	assert_eq!(&source.statements()[1..], ["BEGIN", "INSERT INTO users", "ROLLBACK"]);
	assert_eq!(source.released(), 1);
}

impl From<PoolError> for TestError {
	fn from(err: PoolError) -> Self {
		Self::Scope(ScopeError::Acquire(err))
	}
}

#[tokio::test]
async fn test_rollback_failure_keeps_original_error() {
	let source = FakeSource::failing_on(&["ROLLBACK"]);
	let (ctx, _handler) = Context::with_timeout(Duration::from_secs(10));

	let result: Result<(), TestError> =
		with_transaction(&source, &ctx, |_| Box::pin(async move { Err(TestError::Work("boom")) })).await;

	assert!(matches!(result, Err(TestError::Work("boom"))));
	assert_eq!(source.statements().last().map(String::as_str), Some("ROLLBACK"));
	assert_eq!(source.discarded(), 1);
	assert_eq!(source.released(), 1);
}

#[tokio::test]
async fn test_commit_failure_rolls_back() {
	let source = FakeSource::failing_on(&["COMMIT"]);
	let (ctx, _handler) = Context::with_timeout(Duration::from_secs(10));

	let result: Result<(), TestError> = with_transaction(&source, &ctx, |_| Box::pin(async move { Ok(()) })).await;

	assert!(matches!(result, Err(TestError::Scope(ScopeError::Commit(_)))));
	assert_eq!(&source.statements()[1..], ["BEGIN", "COMMIT", "ROLLBACK"]);
	assert_eq!(source.released(), 1);
}

#[tokio::test]
async fn test_begin_failure() {
	let source = FakeSource::failing_on(&["BEGIN"]);
	let (ctx, _handler) = Context::with_timeout(Duration::from_secs(10));

	let result: Result<(), TestError> = with_transaction(&source, &ctx, |_| Box::pin(async move { Ok(()) })).await;

	assert!(matches!(result, Err(TestError::Scope(ScopeError::Begin(_)))));
	assert_eq!(source.statements().len(), 2);
	assert_eq!(source.released(), 1);
}

#[tokio::test]
async fn test_deadline_exceeded_during_work() {
	let source = FakeSource::default();
	let (ctx, _handler) = Context::with_timeout(Duration::from_millis(50));

	let result: Result<(), TestError> = with_transaction(&source, &ctx, |_| {
		Box::pin(async move {
			tokio::time::sleep(Duration::from_secs(5)).await;
			Ok(())
		})
	})
	.await;

	match result {
		Err(TestError::Scope(err)) => assert!(err.is_deadline_exceeded()),
		other => panic!("unexpected result: {other:?}"),
	}
	assert_eq!(source.statements().last().map(String::as_str), Some("ROLLBACK"));
	assert_eq!(source.released(), 1);
	assert_eq!(source.discarded(), 0);
}

#[tokio::test]
async fn test_abandoned_transaction_discards_connection() {
	let source = FakeSource::default();
	let (ctx, _handler) = Context::with_timeout(Duration::from_millis(50));

	// The caller races the transaction against the same context and wins, so
	// the transaction never gets to roll back itself.
	let outer = with_transaction(&source, &ctx, |tx| {
		Box::pin(async move {
			tx.connection().execute_batch("INSERT INTO organizations").await?;
			tokio::time::sleep(Duration::from_secs(1)).await;
			Ok::<_, TestError>(())
		})
	})
	.with_context(&ctx)
	.await;

	assert!(matches!(outer, Err(CancelReason::Deadline)));
	assert_eq!(&source.statements()[1..], ["BEGIN", "INSERT INTO organizations"]);
	assert_eq!(source.discarded(), 1);
	assert_eq!(source.released(), 1);
}

#[tokio::test]
async fn test_expired_context_never_acquires() {
	let source = FakeSource::default();
	let (ctx, _handler) = Context::with_deadline(tokio::time::Instant::now());

	let result: Result<(), TestError> = with_transaction(&source, &ctx, |_| Box::pin(async move { Ok(()) })).await;

	assert!(matches!(result, Err(TestError::Scope(ScopeError::DeadlineExceeded))));
	assert_eq!(source.acquired(), 0);
	assert!(source.statements().is_empty());
}

#[tokio::test]
async fn test_parent_cancel_is_not_a_deadline() {
	let source = FakeSource::default();
	let (parent, parent_handler) = Context::new();
	let (ctx, _handler) = Context::with_parent(parent, None);

	let task = tokio::spawn({
		let source = source.clone();
		async move {
			with_transaction(&source, &ctx, |_| {
				Box::pin(async move {
					tokio::time::sleep(Duration::from_secs(5)).await;
					Ok::<_, TestError>(())
				})
			})
			.await
		}
	});

	tokio::time::sleep(Duration::from_millis(20)).await;
	parent_handler.cancel().await;

	let result = task.await.expect("panic in task");
	match result {
		Err(TestError::Scope(err)) => {
			assert!(matches!(err, ScopeError::Cancelled));
			assert!(!err.is_deadline_exceeded());
		}
		other => panic!("unexpected result: {other:?}"),
	}
	assert_eq!(source.released(), 1);
}

#[tokio::test]
async fn test_unbounded_context_clears_statement_timeout() {
	let source = FakeSource::default();
	let (ctx, _handler) = Context::new();

	let conn = connect(&source, &ctx).await.unwrap();
	assert_eq!(source.statements(), ["SET statement_timeout TO 0"]);

	drop(conn);
	assert_eq!(source.released(), 1);
}

#[tokio::test]
async fn test_statement_timeout_failure() {
	let source = FakeSource::failing_on(&["SET statement_timeout"]);
	let (ctx, _handler) = Context::with_timeout(Duration::from_secs(1));

	let result = connect(&source, &ctx).await;

	assert!(matches!(result, Err(ScopeError::Timeout(_))));
	assert_eq!(source.released(), 1);
}
