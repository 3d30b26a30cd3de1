//! Inter-item delay for streams

use futures::stream::{Stream, StreamExt};
use std::time::Duration;

/// Re-yield `stream` with `delay` between consecutive items.
///
/// The first item is not delayed.
pub fn throttle<S>(stream: S, delay: Duration) -> impl Stream<Item = S::Item>
where
    S: Stream,
{
    async_stream::stream! {
        futures::pin_mut!(stream);
        let mut first = true;
        while let Some(item) = stream.next().await {
            if !first {
                tokio::time::sleep(delay).await;
            }
            first = false;
            yield item;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_spaces_items_by_delay() {
        let started = Instant::now();
        let items: Vec<u32> = throttle(futures::stream::iter([1, 2, 3]), Duration::from_millis(250))
            .collect()
            .await;

        assert_eq!(items, vec![1, 2, 3]);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(500));
        assert!(elapsed < Duration::from_millis(750));
    }
}
