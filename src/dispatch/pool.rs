//! Bounded worker pool
//!
//! The batch is cut into chunks and placed on a shared queue. A fixed number
//! of worker tasks pull chunks from that queue, probe each URL in turn, and
//! send every result on a channel as soon as it is known. A worker holds one
//! probe in flight at a time, so the worker count is the concurrency bound.

use crate::batch::JobBatch;
use crate::config::ProbeConfig;
use crate::dispatch::progress::ProgressCounter;
use crate::probe::{Classifier, ProbeResult};
use crate::{ConfigError, ConfigResult, SweepError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

type Chunk = Vec<(usize, String)>;
type ChunkQueue = Arc<Mutex<VecDeque<Chunk>>>;

/// Worker pool sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSettings {
    concurrency: usize,
    chunk_size: usize,
    progress_interval: usize,
}

/// Worker count and chunk size chosen for one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPlan {
    pub workers: usize,
    pub chunk_size: usize,
}

impl DispatchSettings {
    /// Creates settings, rejecting a zero worker count or chunk size
    pub fn new(concurrency: usize, chunk_size: usize) -> ConfigResult<Self> {
        if concurrency == 0 {
            return Err(ConfigError::Validation(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if chunk_size == 0 {
            return Err(ConfigError::Validation(
                "chunk_size must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            concurrency,
            chunk_size,
            progress_interval: crate::config::DEFAULT_PROGRESS_INTERVAL,
        })
    }

    /// Settings taken from the `[probe]` config section
    pub fn from_config(config: &ProbeConfig) -> ConfigResult<Self> {
        Ok(Self::new(config.concurrency, config.chunk_size)?
            .with_progress_interval(config.progress_interval))
    }

    /// Completions between two progress lines
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Decides worker count and chunk size for a batch of `batch_len` URLs
    ///
    /// Never more workers than URLs, and chunks shrink so that every worker
    /// gets at least one: with `concurrency >= batch_len` each worker owns a
    /// single URL.
    pub fn plan(&self, batch_len: usize) -> DispatchPlan {
        if batch_len == 0 {
            return DispatchPlan {
                workers: 0,
                chunk_size: self.chunk_size,
            };
        }

        let workers = self.concurrency.min(batch_len);
        let even_share = batch_len.div_ceil(workers);

        DispatchPlan {
            workers,
            chunk_size: self.chunk_size.min(even_share),
        }
    }
}

/// Runs a classifier over a batch with a fixed worker budget
#[derive(Clone)]
pub struct Dispatcher {
    classifier: Arc<dyn Classifier>,
    settings: DispatchSettings,
}

impl Dispatcher {
    pub fn new(classifier: Arc<dyn Classifier>, settings: DispatchSettings) -> Self {
        Self {
            classifier,
            settings,
        }
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Starts probing the batch and returns immediately
    ///
    /// Must be called from within a tokio runtime. Results arrive on the
    /// returned handle in completion order, which is not the batch order.
    pub fn dispatch(&self, batch: &JobBatch) -> DispatchHandle {
        let plan = self.settings.plan(batch.len());
        let progress = Arc::new(ProgressCounter::new(
            batch.len(),
            self.settings.progress_interval,
        ));
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let queue: ChunkQueue = Arc::new(Mutex::new(build_chunks(batch, plan.chunk_size)));

        tracing::debug!(
            "Dispatching {} URLs to {} workers in chunks of {}",
            batch.len(),
            plan.workers,
            plan.chunk_size
        );

        let workers = (0..plan.workers)
            .map(|id| {
                let worker = Worker {
                    id,
                    classifier: Arc::clone(&self.classifier),
                    queue: Arc::clone(&queue),
                    results: results_tx.clone(),
                    progress: Arc::clone(&progress),
                    cancel: cancel_rx.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        // Only the workers hold senders now; the stream ends when the last one exits
        drop(results_tx);

        DispatchHandle {
            results: results_rx,
            workers,
            progress,
            cancel: cancel_tx,
        }
    }

    /// Probes the whole batch and returns the results in completion order
    pub async fn run(&self, batch: &JobBatch) -> Result<Vec<ProbeResult>, SweepError> {
        self.dispatch(batch).finish().await
    }
}

/// A batch in progress
pub struct DispatchHandle {
    results: mpsc::UnboundedReceiver<ProbeResult>,
    workers: Vec<JoinHandle<()>>,
    progress: Arc<ProgressCounter>,
    cancel: watch::Sender<bool>,
}

impl DispatchHandle {
    /// Number of worker tasks spawned for this batch
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Shared progress counter of this batch
    pub fn progress(&self) -> Arc<ProgressCounter> {
        Arc::clone(&self.progress)
    }

    /// Stops handing out URLs and abandons probes still in flight
    ///
    /// Results already sent stay available on the handle.
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Next completed probe, or `None` once every worker has exited
    pub async fn next(&mut self) -> Option<ProbeResult> {
        self.results.recv().await
    }

    /// Drains the remaining results and waits for all workers
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ProbeResult>)` - Every result not yet taken with [`next`](Self::next)
    /// * `Err(SweepError::Worker)` - A worker task panicked
    pub async fn finish(mut self) -> Result<Vec<ProbeResult>, SweepError> {
        let mut collected = Vec::with_capacity(self.progress.total());
        while let Some(result) = self.results.recv().await {
            collected.push(result);
        }

        for worker in self.workers.drain(..) {
            worker
                .await
                .map_err(|e| SweepError::Worker(e.to_string()))?;
        }

        Ok(collected)
    }
}

struct Worker {
    id: usize,
    classifier: Arc<dyn Classifier>,
    queue: ChunkQueue,
    results: mpsc::UnboundedSender<ProbeResult>,
    progress: Arc<ProgressCounter>,
    cancel: watch::Receiver<bool>,
}

impl Worker {
    async fn run(mut self) {
        let mut probed = 0usize;

        while let Some(chunk) = self.next_chunk() {
            for (position, url) in chunk {
                let outcome = tokio::select! {
                    biased;
                    _ = wait_for_cancel(&mut self.cancel) => {
                        tracing::debug!("Worker {} cancelled after {} probes", self.id, probed);
                        return;
                    }
                    outcome = self.classifier.classify(&url) => outcome,
                };

                probed += 1;
                self.progress.record();
                tracing::debug!("{} -> {}", url, outcome);

                if self
                    .results
                    .send(ProbeResult::new(url, position, outcome))
                    .is_err()
                {
                    tracing::warn!("Result receiver dropped, worker {} stopping", self.id);
                    return;
                }
            }
        }

        tracing::trace!("Worker {} finished after {} probes", self.id, probed);
    }

    /// Pops the next chunk unless the batch has been cancelled
    fn next_chunk(&self) -> Option<Chunk> {
        if *self.cancel.borrow() {
            return None;
        }

        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

/// Resolves once the cancel flag is set; never resolves if the sender is gone
async fn wait_for_cancel(cancel: &mut watch::Receiver<bool>) {
    loop {
        if *cancel.borrow_and_update() {
            return;
        }
        if cancel.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

fn build_chunks(batch: &JobBatch, chunk_size: usize) -> VecDeque<Chunk> {
    batch
        .urls()
        .chunks(chunk_size.max(1))
        .enumerate()
        .map(|(chunk_index, urls)| {
            let offset = chunk_index * chunk_size.max(1);
            urls.iter()
                .enumerate()
                .map(|(i, url)| (offset + i, url.clone()))
                .collect()
        })
        .collect()
}
