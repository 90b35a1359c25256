use std::{future::Future, num::NonZeroUsize};

use tokio::task::{JoinError, JoinSet};

/// Drives every future on a [`JoinSet`], never running more than `capacity`
/// at once. Outputs are returned in input order. Each future's own error is
/// part of its output, so a failing task does not cancel the others; only a
/// panicked or aborted task fails the whole call.
pub async fn join_bounded<Iterable, Output>(
    iterable: Iterable,
    capacity: NonZeroUsize,
) -> Result<Vec<Output>, JoinError>
where
    Iterable: IntoIterator,
    Iterable::Item: Future<Output = Output> + Send + 'static,
    Output: Send + 'static,
{
    let mut iter = iterable.into_iter().enumerate().fuse();
    let mut set = JoinSet::new();
    let mut outputs = Vec::new();

    for (index, future) in (&mut iter).take(capacity.get()) {
        set.spawn(async move { (index, future.await) });
    }

    while let Some(result) = set.join_next().await {
        outputs.push(result?);

        if let Some((index, future)) = iter.next() {
            set.spawn(async move { (index, future.await) });
        }
    }

    outputs.sort_by_key(|(index, _)| *index);

    Ok(outputs.into_iter().map(|(_, output)| output).collect())
}
