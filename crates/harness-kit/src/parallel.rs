//! Concurrent reads across several harnesses.

use crate::result::HarnessResult;
use futures::future::try_join_all;
use std::future::Future;

/// Run independent harness reads together and keep their order.
///
/// The first error fails the whole batch.
pub async fn parallel<I, F, T>(reads: I) -> HarnessResult<Vec<T>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = HarnessResult<T>>,
{
    try_join_all(reads).await
}
