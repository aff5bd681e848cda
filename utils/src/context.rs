use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, oneshot};
use tokio::time::Instant;

struct RawContext {
	_sender: oneshot::Sender<()>,
	deadline: Option<Instant>,
	parent: Option<Context>,
	cancel_receiver: broadcast::Receiver<()>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CancelReason {
	Parent,
	Deadline,
	Cancel,
}

impl Display for CancelReason {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Parent => write!(f, "Parent"),
			Self::Deadline => write!(f, "Deadline"),
			Self::Cancel => write!(f, "Cancel"),
		}
	}
}

impl RawContext {
	#[must_use]
	fn new(parent: Option<Context>, deadline: Option<Instant>) -> (Self, Handler) {
		let (sender, recv) = oneshot::channel();
		let (cancel_sender, cancel_receiver) = broadcast::channel(1);

		(
			Self {
				_sender: sender,
				deadline,
				parent,
				cancel_receiver,
			},
			Handler { recv, cancel_sender },
		)
	}

	fn deadline(&self) -> Option<Instant> {
		let parent = self.parent.as_ref().and_then(Context::deadline);

		match (self.deadline, parent) {
			(Some(own), Some(parent)) => Some(own.min(parent)),
			(own, parent) => own.or(parent),
		}
	}

	fn done(&self) -> Pin<Box<dyn Future<Output = CancelReason> + '_ + Send>> {
		let mut recv = self.cancel_receiver.resubscribe();
		Box::pin(async move {
			match (&self.parent, self.deadline) {
				(Some(parent), Some(deadline)) => {
					tokio::select! {
						_ = parent.done() => CancelReason::Parent,
						_ = tokio::time::sleep_until(deadline) => CancelReason::Deadline,
						_ = recv.recv() => CancelReason::Cancel,
					}
				}
				(Some(parent), None) => {
					tokio::select! {
						_ = parent.done() => CancelReason::Parent,
						_ = recv.recv() => CancelReason::Cancel,
					}
				}
				(None, Some(deadline)) => {
					tokio::select! {
						_ = tokio::time::sleep_until(deadline) => CancelReason::Deadline,
						_ = recv.recv() => CancelReason::Cancel,
					}
				}
				(None, None) => {
					let _ = recv.recv().await;
					CancelReason::Cancel
				}
			}
		})
	}
}

/// Owner side of a [`Context`]. Dropping or cancelling the handler ends the
/// context.
pub struct Handler {
	recv: oneshot::Receiver<()>,
	cancel_sender: broadcast::Sender<()>,
}

impl Handler {
	/// Waits until every clone of the context has been dropped.
	pub async fn done(&mut self) {
		let _ = (&mut self.recv).await;
	}

	pub async fn cancel(self) {
		drop(self.cancel_sender);

		let _ = self.recv.await;
	}
}

/// A cancellable unit of work with an optional deadline.
///
/// Deadlines are inherited: a child never outlives the deadline of its
/// parent, so a request context created from the global context ends on
/// shutdown as well as on its own timeout.
#[derive(Clone)]
pub struct Context(Arc<RawContext>);

impl From<RawContext> for Context {
	fn from(ctx: RawContext) -> Self {
		Self(Arc::new(ctx))
	}
}

impl std::fmt::Debug for Context {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Context").field("deadline", &self.deadline()).finish()
	}
}

impl Context {
	pub fn new() -> (Self, Handler) {
		let (ctx, handler) = RawContext::new(None, None);
		(ctx.into(), handler)
	}

	pub fn with_deadline(deadline: Instant) -> (Self, Handler) {
		let (ctx, handler) = RawContext::new(None, Some(deadline));
		(ctx.into(), handler)
	}

	pub fn with_timeout(timeout: Duration) -> (Self, Handler) {
		Self::with_deadline(Instant::now() + timeout)
	}

	pub fn with_parent(parent: Context, deadline: Option<Instant>) -> (Self, Handler) {
		let (ctx, handler) = RawContext::new(Some(parent), deadline);
		(ctx.into(), handler)
	}

	/// The earliest deadline along the parent chain.
	pub fn deadline(&self) -> Option<Instant> {
		self.0.deadline()
	}

	/// Time left before the deadline, `None` when the context is unbounded.
	pub fn remaining(&self) -> Option<Duration> {
		self.deadline()
			.map(|deadline| deadline.saturating_duration_since(Instant::now()))
	}

	pub fn is_expired(&self) -> bool {
		self.remaining().is_some_and(|remaining| remaining.is_zero())
	}

	pub async fn done(&self) -> CancelReason {
		self.0.done().await
	}
}
