//! Per-destination send sequencing.
//!
//! Each key owns a FIFO queue and an in-flight count. An enqueued operation
//! starts immediately while the key is below its thread limit and waits in
//! the queue otherwise. When an operation finishes the key waits its delay,
//! releases the slot and starts the next queued operation. Keys never wait
//! on each other.

use crate::{ClientError, SequenceConfig};
use bacstack_datalink::{DataLink, DataLinkAddress};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::sync::oneshot;

type Job = Pin<Box<dyn Future<Output = ()> + Send>>;

#[derive(Default)]
struct Channel {
    queue: VecDeque<Job>,
    in_flight: usize,
}

struct State<K> {
    channels: HashMap<K, Channel>,
    overrides: HashMap<K, SequenceConfig>,
}

struct Inner<K> {
    state: Mutex<State<K>>,
    defaults: SequenceConfig,
}

/// Governs operations per destination key.
///
/// Cloning is cheap; clones share the same queues.
pub struct Sequence<K> {
    inner: Arc<Inner<K>>,
}

impl<K> Clone for Sequence<K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K> fmt::Debug for Sequence<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("defaults", &self.inner.defaults)
            .finish_non_exhaustive()
    }
}

impl<K> Sequence<K>
where
    K: Eq + Hash + Clone + fmt::Display + Send + Sync + 'static,
{
    pub fn new(defaults: SequenceConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    channels: HashMap::new(),
                    overrides: HashMap::new(),
                }),
                defaults: SequenceConfig::new(defaults.thread_limit, defaults.delay),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<K>> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets (or replaces) the limits used for `key`. Operations already in
    /// flight keep running; the new limit applies from the next start.
    pub fn set_override(&self, key: K, config: SequenceConfig) {
        let config = SequenceConfig::new(config.thread_limit, config.delay);
        self.lock().overrides.insert(key, config);
    }

    pub fn clear_override(&self, key: &K) {
        self.lock().overrides.remove(key);
    }

    fn config_in(&self, state: &State<K>, key: &K) -> SequenceConfig {
        state
            .overrides
            .get(key)
            .copied()
            .unwrap_or(self.inner.defaults)
    }

    /// Operations currently running for `key`.
    pub fn in_flight(&self, key: &K) -> usize {
        self.lock().channels.get(key).map_or(0, |c| c.in_flight)
    }

    /// Operations waiting to start for `key`.
    pub fn queued(&self, key: &K) -> usize {
        self.lock().channels.get(key).map_or(0, |c| c.queue.len())
    }

    /// Keys with running or queued work.
    pub fn active_keys(&self) -> usize {
        self.lock().channels.len()
    }

    /// Queues `operation` for `key` and returns a handle to its result.
    ///
    /// Must be called from within a tokio runtime. A failed operation is
    /// logged and its slot released like any other; dropping the handle does
    /// not cancel the operation.
    pub fn enqueue<F, T>(&self, key: K, operation: F) -> SequenceHandle<T>
    where
        F: Future<Output = Result<T, ClientError>> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let label = key.to_string();
        let job: Job = Box::pin(async move {
            let result = operation.await;
            if let Err(err) = &result {
                log::warn!("sequenced operation for {label} failed: {err}");
            }
            let _ = tx.send(result);
        });

        let start = {
            let mut state = self.lock();
            let limit = self.config_in(&state, &key).thread_limit;
            let channel = state.channels.entry(key.clone()).or_default();
            if channel.in_flight < limit {
                channel.in_flight += 1;
                Some(job)
            } else {
                channel.queue.push_back(job);
                log::trace!("queued operation for {key} ({} waiting)", channel.queue.len());
                None
            }
        };

        if let Some(job) = start {
            self.start(key, job);
        }
        SequenceHandle { rx }
    }

    fn start(&self, key: K, job: Job) {
        log::trace!("starting operation for {key}");
        let this = self.clone();
        tokio::spawn(async move {
            // Run the job in its own task so a panic surfaces as a JoinError
            // here instead of leaking the slot.
            if let Err(err) = tokio::spawn(job).await {
                log::warn!("sequenced operation for {key} aborted: {err}");
            }
            let delay = {
                let state = this.lock();
                this.config_in(&state, &key).delay
            };
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            this.complete(key);
        });
    }

    fn complete(&self, key: K) {
        let next = {
            let mut state = self.lock();
            let limit = self.config_in(&state, &key).thread_limit;
            let Some(channel) = state.channels.get_mut(&key) else {
                return;
            };
            channel.in_flight = channel.in_flight.saturating_sub(1);
            let next = if channel.in_flight < limit {
                channel.queue.pop_front()
            } else {
                None
            };
            if next.is_some() {
                channel.in_flight += 1;
            }
            if channel.in_flight == 0 && channel.queue.is_empty() {
                state.channels.remove(&key);
                log::trace!("channel for {key} idle");
            }
            next
        };

        if let Some(job) = next {
            self.start(key, job);
        }
    }
}

impl Sequence<DataLinkAddress> {
    /// Queues a send of `frame` to `target` behind earlier sends to the same
    /// address.
    pub fn send<D: DataLink + 'static>(
        &self,
        datalink: Arc<D>,
        target: DataLinkAddress,
        frame: Vec<u8>,
    ) -> SequenceHandle<()> {
        self.enqueue(target, async move {
            datalink.send(target, &frame).await?;
            Ok(())
        })
    }
}

/// Resolves to the result of an enqueued operation.
#[derive(Debug)]
pub struct SequenceHandle<T> {
    rx: oneshot::Receiver<Result<T, ClientError>>,
}

impl<T> Future for SequenceHandle<T> {
    type Output = Result<T, ClientError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|received| match received {
            Ok(result) => result,
            Err(_) => Err(ClientError::SequenceAborted),
        })
    }
}
