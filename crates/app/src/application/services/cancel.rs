//! Racing futures against a cancellation token

use std::future::Future;

use futures_util::future::{select, Either};
use tokio_util::sync::CancellationToken;

/// Drive `fut` until it completes or `cancel` fires.
///
/// Returns `None` when cancelled; the unfinished future is dropped.
pub(crate) async fn until_cancelled<F>(cancel: &CancellationToken, fut: F) -> Option<F::Output>
where
    F: Future,
{
    if cancel.is_cancelled() {
        return None;
    }

    match select(Box::pin(fut), Box::pin(cancel.cancelled())).await {
        Either::Left((output, _)) => Some(output),
        Either::Right(_) => None,
    }
}
