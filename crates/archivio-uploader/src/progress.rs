//! Per-task progress cells and a byte-counting stream adapter.
//!
//! Each upload task owns one progress cell; only its own transport writes
//! to it. The cell is monotonic by construction: late or out-of-order
//! updates can never make reported progress go backwards.

use bytes::Bytes;
use futures::Stream;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::watch;

/// Writer side of a task's progress cell (0–100).
#[derive(Debug, Clone)]
pub struct ProgressHandle {
    tx: watch::Sender<u8>,
}

impl ProgressHandle {
    /// Create a new cell at 0%, returning the handle and its receiver.
    pub fn new() -> (Self, watch::Receiver<u8>) {
        let (tx, rx) = watch::channel(0);
        (Self { tx }, rx)
    }

    /// Record progress. Values are clamped to 100 and never decrease.
    pub fn set(&self, percent: u8) {
        let clamped = percent.min(100);
        self.tx.send_if_modified(|current| {
            if clamped > *current {
                *current = clamped;
                true
            } else {
                false
            }
        });
    }

    /// Mark the transfer complete.
    pub fn complete(&self) {
        self.set(100);
    }

    /// Current progress value.
    pub fn current(&self) -> u8 {
        *self.tx.borrow()
    }
}

pin_project! {
    /// Stream adapter that counts the bytes flowing through it and updates
    /// a progress cell against a known total.
    pub struct ProgressStream<S> {
        #[pin]
        inner: S,
        sent: u64,
        total: u64,
        handle: ProgressHandle,
    }
}

impl<S> ProgressStream<S> {
    /// Wrap a stream whose items total `total` bytes.
    pub fn new(inner: S, total: u64, handle: ProgressHandle) -> Self {
        Self {
            inner,
            sent: 0,
            total,
            handle,
        }
    }
}

impl<S, E> Stream for ProgressStream<S>
where
    S: Stream<Item = Result<Bytes, E>>,
{
    type Item = Result<Bytes, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let polled = this.inner.poll_next(cx);
        if let Poll::Ready(Some(Ok(chunk))) = &polled {
            *this.sent += chunk.len() as u64;
            if *this.total > 0 {
                let percent = (*this.sent * 100 / *this.total).min(100) as u8;
                this.handle.set(percent);
            }
        }
        polled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn test_progress_never_decreases() {
        let (handle, rx) = ProgressHandle::new();
        handle.set(30);
        assert_eq!(*rx.borrow(), 30);
        handle.set(20);
        assert_eq!(*rx.borrow(), 30);
        handle.set(80);
        assert_eq!(*rx.borrow(), 80);
        handle.set(250);
        assert_eq!(*rx.borrow(), 100);
    }

    #[tokio::test]
    async fn test_stream_reports_cumulative_percentages() {
        let (handle, rx) = ProgressHandle::new();
        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from(vec![0u8; 25])),
            Ok(Bytes::from(vec![0u8; 25])),
            Ok(Bytes::from(vec![0u8; 50])),
        ];
        let mut stream = ProgressStream::new(futures::stream::iter(chunks), 100, handle);

        stream.next().await.unwrap().unwrap();
        assert_eq!(*rx.borrow(), 25);
        stream.next().await.unwrap().unwrap();
        assert_eq!(*rx.borrow(), 50);
        stream.next().await.unwrap().unwrap();
        assert_eq!(*rx.borrow(), 100);
    }
}
