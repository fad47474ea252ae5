use std::future::Future;

use futures::stream::{self, StreamExt};

/// Drive `tasks` with at most `max_workers` in flight and collect their outputs in input order,
/// regardless of completion order.
pub async fn run_in_parallel<F, T>(tasks: impl IntoIterator<Item = F>, max_workers: usize) -> Vec<T>
where
    F: Future<Output = T>,
{
    stream::iter(tasks)
        .buffered(max_workers.max(1))
        .collect()
        .await
}
