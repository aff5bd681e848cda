use std::future::Future;
use std::time::Duration;

use tokio::time::Timeout;

use crate::context::{CancelReason, Context};

pub trait FutureTimeout: Future {
	#[inline(always)]
	fn timeout(self, duration: Duration) -> Timeout<Self>
	where
		Self: Sized,
	{
		tokio::time::timeout(duration, self)
	}
}

impl<F: Future> FutureTimeout for F {}

/// Races a future against a [`Context`], resolving with the reason the
/// context ended if that happens first.
pub trait ContextExt: Future {
	fn with_context<'a>(self, ctx: &'a Context) -> impl Future<Output = Result<Self::Output, CancelReason>> + Send + 'a
	where
		Self: Sized + Send + 'a,
		Self::Output: Send,
	{
		async move {
			tokio::select! {
				biased;
				reason = ctx.done() => Err(reason),
				output = self => Ok(output),
			}
		}
	}
}

impl<F: Future> ContextExt for F {}
