use std::future::Future;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, sleep_until},
};
use tokio_util::sync::CancellationToken;

/// A task ended without reporting its value (it panicked or was aborted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("task ended without reporting a result")]
pub struct TaskAborted;

/// Sends the task's terminal signal exactly once: with the value when the
/// task finishes, or empty from `Drop` when it unwinds or is aborted.
struct LeaveGuard<T> {
    index: usize,
    tx: Option<mpsc::UnboundedSender<(usize, Option<T>)>>,
}

impl<T> LeaveGuard<T> {
    fn leave(mut self, value: T) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send((self.index, Some(value)));
        }
    }
}

impl<T> Drop for LeaveGuard<T> {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send((self.index, None));
        }
    }
}

/// Counting join over independently spawned tasks.
///
/// Every task spawned into the group produces exactly one terminal signal.
/// [`CompletionGroup::wait`] returns once it has observed as many signals as
/// tasks were spawned, or earlier on deadline or cancellation. Work that a
/// task chains internally (e.g. a second request depending on the first)
/// belongs to that task and is never counted separately.
pub struct CompletionGroup<K, T> {
    keys: Vec<K>,
    handles: Vec<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<(usize, Option<T>)>,
    rx: mpsc::UnboundedReceiver<(usize, Option<T>)>,
}

#[derive(Debug)]
pub struct GroupOutcome<K, T> {
    /// Number of tasks spawned into the group.
    pub expected: usize,
    /// Terminal signals in the order they were observed.
    pub completed: Vec<(K, Result<T, TaskAborted>)>,
    /// Tasks that had not signalled when the wait ended; they are aborted.
    pub pending: Vec<K>,
    pub cancelled: bool,
}

impl<K, T> GroupOutcome<K, T> {
    pub fn observed(&self) -> usize {
        self.completed.len()
    }

    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.observed() == self.expected
    }
}

impl<K: Copy, T: Send + 'static> CompletionGroup<K, T> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            keys: Vec::new(),
            handles: Vec::new(),
            tx,
            rx,
        }
    }

    pub fn spawn<F>(&mut self, key: K, task: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        let guard = LeaveGuard {
            index: self.keys.len(),
            tx: Some(self.tx.clone()),
        };
        let handle = tokio::spawn(async move {
            let value = task.await;
            guard.leave(value);
        });

        self.keys.push(key);
        self.handles.push(handle);
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Waits for one terminal signal per spawned task.
    ///
    /// Stops early when `cancel` fires or `deadline` passes; every task that
    /// has not signalled by then is aborted and listed in `pending`.
    pub async fn wait(self, deadline: Instant, cancel: &CancellationToken) -> GroupOutcome<K, T> {
        let CompletionGroup {
            keys,
            handles,
            tx,
            mut rx,
        } = self;
        drop(tx);

        let expected = keys.len();
        let mut signalled = vec![false; expected];
        let mut completed = Vec::with_capacity(expected);
        let mut cancelled = false;

        let timeout = sleep_until(deadline);
        tokio::pin!(timeout);

        while completed.len() < expected {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                signal = rx.recv() => match signal {
                    Some((index, value)) => {
                        if !signalled[index] {
                            signalled[index] = true;
                            completed.push((keys[index], value.ok_or(TaskAborted)));
                        }
                    }
                    None => break,
                },
                _ = &mut timeout => break,
            }
        }

        for handle in &handles {
            handle.abort();
        }

        let pending = keys
            .iter()
            .zip(signalled)
            .filter(|(_, done)| !done)
            .map(|(key, _)| *key)
            .collect();

        GroupOutcome {
            expected,
            completed,
            pending,
            cancelled,
        }
    }
}

impl<K: Copy, T: Send + 'static> Default for CompletionGroup<K, T> {
    fn default() -> Self {
        Self::new()
    }
}
