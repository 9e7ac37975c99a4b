// Copyright 2024 The ActiveMQ Manager Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Concurrent fan-out engine
//!
//! One logical listing ("all queues", "all connections") becomes N independent fetches. The
//! engine runs at most `workers` of them at a time and yields each result as soon as it
//! completes, in completion order.
//!
//! ```text
//!   ids ──► supervisor ──spawn──► JoinSet (≤ workers live tasks)
//!               │                      │
//!               │◄──────join_next──────┘
//!               ▼
//!        mpsc (capacity = workers) ──► FanOutStream ──► caller
//! ```
//!
//! The supervisor owns every task. It sends exactly one terminal signal per run, and only
//! after the pool is empty: `Done` when every input was fetched, `Failed` when the run was
//! aborted (first failure under [`FailurePolicy::FailFast`], deadline, or cancellation).
//! Dropping the stream aborts the supervisor, which drops the pool and aborts every task.
//!
//! # Example
//! ```rust,ignore
//! let engine = FanOut::new(FanOutConfig::default().workers(4));
//! let sizes = engine
//!     .run(names, move |name| {
//!         let broker = broker.clone();
//!         async move { broker.queue(&name).await.map(|q| q.size()) }
//!     })
//!     .collect_all()
//!     .await?;
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::task::ready;
use std::task::Context;
use std::task::Poll;
use std::time::Duration;

use activemq_error::ActiveMQError;
use activemq_error::ActiveMQResult;
use futures::Stream;
use futures::StreamExt;
use serde::Deserialize;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::warn;

pub const DEFAULT_WORKERS: usize = 10;

const OPERATION: &str = "fan-out";

/// What a failed fetch does to the rest of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The first failure cancels every other fetch and is returned to the caller.
    #[default]
    FailFast,
    /// Failures are logged and counted; the caller gets fewer results than inputs and can
    /// compare [`FanOutSummary::failed`] to detect the shortfall.
    BestEffort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanOutConfig {
    pub workers: usize,
    pub policy: FailurePolicy,
    /// Aggregate deadline for the whole run. Expiry aborts it like a fail-fast failure.
    pub deadline: Option<Duration>,
}

impl Default for FanOutConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            policy: FailurePolicy::FailFast,
            deadline: None,
        }
    }
}

impl FanOutConfig {
    #[inline]
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    #[inline]
    pub fn policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[inline]
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Lifecycle of one run. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum FanOutState {
    Created = 0,
    /// Inputs are still being submitted to the pool.
    Spawning = 1,
    /// Every input is submitted; remaining results are being consumed.
    Draining = 2,
    /// The supervisor has been awaited; no task of this run is alive.
    Joined = 3,
    Closed = 4,
}

impl FanOutState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Created,
            1 => Self::Spawning,
            2 => Self::Draining,
            3 => Self::Joined,
            _ => Self::Closed,
        }
    }
}

#[derive(Debug, Default)]
struct StateCell(AtomicU8);

impl StateCell {
    fn advance(&self, state: FanOutState) {
        self.0.fetch_max(state as u8, Ordering::AcqRel);
    }

    fn load(&self) -> FanOutState {
        FanOutState::from_u8(self.0.load(Ordering::Acquire))
    }
}

/// Counts reported with the terminal `Done` signal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FanOutSummary {
    pub submitted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

enum Signal<T> {
    Item(T),
    Done(FanOutSummary),
    Failed(ActiveMQError),
}

/// Bounded concurrent fan-out. Each [`run`](FanOut::run) owns its own pool and channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct FanOut {
    config: FanOutConfig,
}

impl FanOut {
    pub fn new(config: FanOutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FanOutConfig {
        &self.config
    }

    /// Start fetching every identifier of `ids` with `fetch`.
    ///
    /// Must be called inside a tokio runtime. `ids` is consumed lazily by the supervisor, one
    /// identifier per free worker slot.
    pub fn run<I, K, F, Fut, T>(&self, ids: I, fetch: F) -> FanOutStream<T>
    where
        I: IntoIterator<Item = K>,
        I::IntoIter: Send + 'static,
        K: Send + 'static,
        F: Fn(K) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActiveMQResult<T>> + Send + 'static,
        T: Send + 'static,
    {
        let workers = self.config.workers.max(1);
        let (tx, receiver) = mpsc::channel(workers);
        let token = CancellationToken::new();
        let state = Arc::new(StateCell::default());

        let supervisor = Supervisor {
            workers,
            policy: self.config.policy,
            deadline: self.config.deadline,
            tx,
            token: token.clone(),
            state: state.clone(),
        };
        let handle = tokio::spawn(supervisor.run(ids.into_iter(), Arc::new(fetch)));

        FanOutStream {
            receiver,
            supervisor: Some(handle),
            token,
            state,
            summary: None,
            pending_error: None,
            terminated: false,
        }
    }
}

struct Supervisor<T> {
    workers: usize,
    policy: FailurePolicy,
    deadline: Option<Duration>,
    tx: mpsc::Sender<Signal<T>>,
    token: CancellationToken,
    state: Arc<StateCell>,
}

impl<T: Send + 'static> Supervisor<T> {
    async fn run<K, F, Fut>(self, mut ids: impl Iterator<Item = K>, fetch: Arc<F>)
    where
        K: Send + 'static,
        F: Fn(K) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActiveMQResult<T>> + Send + 'static,
    {
        self.state.advance(FanOutState::Spawning);
        debug!("fan-out started: workers={}, policy={:?}", self.workers, self.policy);

        let deadline = self.deadline.map(|d| Instant::now() + d);
        let mut tasks: JoinSet<ActiveMQResult<T>> = JoinSet::new();
        let mut summary = FanOutSummary::default();
        let mut exhausted = false;

        let outcome = loop {
            while !exhausted && tasks.len() < self.workers {
                match ids.next() {
                    Some(id) => {
                        let fetch = fetch.clone();
                        tasks.spawn(async move { fetch(id).await });
                        summary.submitted += 1;
                    }
                    None => {
                        exhausted = true;
                        self.state.advance(FanOutState::Draining);
                    }
                }
            }

            let joined = tokio::select! {
                biased;
                _ = self.token.cancelled() => break Err(ActiveMQError::cancelled(OPERATION)),
                _ = expire(deadline) => break Err(self.timeout_error()),
                joined = tasks.join_next() => joined,
            };
            let Some(joined) = joined else {
                break Ok(());
            };

            let result = joined
                .map_err(|e| ActiveMQError::internal(format!("fan-out task failed: {e}")))
                .and_then(|result| result);
            match result {
                Ok(item) => {
                    summary.succeeded += 1;
                    tokio::select! {
                        biased;
                        _ = self.token.cancelled() => break Err(ActiveMQError::cancelled(OPERATION)),
                        _ = expire(deadline) => break Err(self.timeout_error()),
                        sent = self.tx.send(Signal::Item(item)) => {
                            if sent.is_err() {
                                break Err(ActiveMQError::cancelled(OPERATION));
                            }
                        }
                    }
                }
                Err(err) => match self.policy {
                    FailurePolicy::FailFast => break Err(err),
                    FailurePolicy::BestEffort => {
                        summary.failed += 1;
                        warn!("fan-out fetch failed, continuing: {err}");
                    }
                },
            }
        };

        tasks.shutdown().await;
        let terminal = match outcome {
            Ok(()) => {
                debug!(
                    "fan-out finished: submitted={}, succeeded={}, failed={}",
                    summary.submitted, summary.succeeded, summary.failed
                );
                Signal::Done(summary)
            }
            Err(err) => {
                debug!("fan-out aborted after {} submissions: {err}", summary.submitted);
                Signal::Failed(err)
            }
        };
        let _ = self.tx.send(terminal).await;
    }

    fn timeout_error(&self) -> ActiveMQError {
        let millis = self.deadline.map(|d| d.as_millis() as u64).unwrap_or_default();
        ActiveMQError::timeout(OPERATION, millis)
    }
}

async fn expire(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Results of one fan-out run, in completion order.
///
/// The stream ends after the supervisor is joined. Under fail-fast the last item is the
/// error that aborted the run. Breaking out early is fine: call [`close`](Self::close) to
/// wait for every task to stop, or just drop the stream to abort them.
pub struct FanOutStream<T> {
    receiver: mpsc::Receiver<Signal<T>>,
    supervisor: Option<JoinHandle<()>>,
    token: CancellationToken,
    state: Arc<StateCell>,
    summary: Option<FanOutSummary>,
    pending_error: Option<ActiveMQError>,
    terminated: bool,
}

impl<T> FanOutStream<T> {
    pub fn state(&self) -> FanOutState {
        self.state.load()
    }

    /// Counts of the run, available once it finished without being aborted.
    pub fn summary(&self) -> Option<FanOutSummary> {
        self.summary
    }

    /// Cancel outstanding work, discard unread results and wait until no task is left.
    pub async fn close(&mut self) {
        self.token.cancel();
        while let Some(signal) = self.receiver.recv().await {
            if let Signal::Done(summary) = signal {
                self.summary = Some(summary);
            }
        }
        if let Some(handle) = self.supervisor.take() {
            let _ = handle.await;
        }
        self.state.advance(FanOutState::Joined);
        self.state.advance(FanOutState::Closed);
        self.terminated = true;
    }

    /// Drain the stream. Under fail-fast the first failure is returned instead.
    pub async fn collect_all(mut self) -> ActiveMQResult<Vec<T>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await {
            items.push(item?);
        }
        Ok(items)
    }
}

// Never pin-projected; every field is moved freely.
impl<T> Unpin for FanOutStream<T> {}

impl<T> Stream for FanOutStream<T> {
    type Item = ActiveMQResult<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if !this.terminated {
            match ready!(this.receiver.poll_recv(cx)) {
                Some(Signal::Item(item)) => return Poll::Ready(Some(Ok(item))),
                Some(Signal::Done(summary)) => this.summary = Some(summary),
                Some(Signal::Failed(err)) => this.pending_error = Some(err),
                None => {
                    this.pending_error = Some(ActiveMQError::internal(
                        "fan-out supervisor exited without a terminal signal",
                    ))
                }
            }
            this.terminated = true;
        }

        if let Some(handle) = this.supervisor.as_mut() {
            let joined = ready!(Pin::new(handle).poll(cx));
            this.supervisor = None;
            this.state.advance(FanOutState::Joined);
            if let Err(e) = joined {
                if this.pending_error.is_none() {
                    this.pending_error = Some(ActiveMQError::internal(format!("fan-out supervisor failed: {e}")));
                }
            }
        }

        this.state.advance(FanOutState::Closed);
        Poll::Ready(this.pending_error.take().map(Err))
    }
}

impl<T> Drop for FanOutStream<T> {
    fn drop(&mut self) {
        self.token.cancel();
        if let Some(handle) = self.supervisor.take() {
            handle.abort();
        }
    }
}
