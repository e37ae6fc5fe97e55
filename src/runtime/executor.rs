//! Batch executor evaluating many curves on a rayon pool, synchronously or
//! from a tokio task with callbacks.

use crate::data::{Curve, CurveError};
use crate::ffi::types::SansStatus;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::runtime::Runtime as TokioRuntime;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Configuration for the runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Number of worker threads.
    pub worker_count: usize,
    /// Curves with at least this many q values spread their points over the
    /// pool; shorter curves are evaluated on one thread.
    pub parallel_threshold: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_count: num_cpus::get(),
            parallel_threshold: 256,
        }
    }
}

/// Errors from building or driving the runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to build async runtime: {0}")]
    Tokio(#[from] std::io::Error),

    #[error("batch task failed: {0}")]
    Task(String),

    #[error("an asynchronous batch is already running")]
    AlreadyRunning,
}

/// A curve whose evaluation failed.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveFailure {
    pub id: String,
    pub error: CurveError,
}

/// Counts for one finished batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub completed: usize,
    pub failed: usize,
    /// Curves not evaluated because the batch was cancelled.
    pub skipped: usize,
}

impl BatchSummary {
    pub fn status(&self) -> SansStatus {
        if self.skipped > 0 {
            SansStatus::Cancelled
        } else {
            SansStatus::Ok
        }
    }
}

enum Outcome {
    Done(Curve),
    Failed(CurveFailure),
    Skipped,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn evaluate_curve(mut curve: Curve, parallel_threshold: usize) -> Outcome {
    let result = if curve.len() >= parallel_threshold {
        curve.evaluate_parallel()
    } else {
        curve.evaluate()
    };
    match result {
        Ok(()) => Outcome::Done(curve),
        Err(error) => {
            warn!(curve = %curve.id, %error, "curve evaluation failed");
            Outcome::Failed(CurveFailure { id: curve.id, error })
        }
    }
}

/// Batch runtime for curve evaluation.
pub struct Runtime {
    config: RuntimeConfig,
    /// Curves waiting to be evaluated.
    pending: Vec<Curve>,
    completed: Arc<Mutex<Vec<Curve>>>,
    failures: Arc<Mutex<Vec<CurveFailure>>>,
    pool: Arc<rayon::ThreadPool>,
    tokio_runtime: TokioRuntime,
    /// Handle of the running asynchronous batch, if any.
    task: Option<JoinHandle<BatchSummary>>,
    cancelled: Arc<AtomicBool>,
}

impl Runtime {
    pub fn new(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        let workers = config.worker_count.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("sansrs-worker-{index}"))
            .build()?;
        let tokio_runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(workers)
            .enable_all()
            .build()?;

        Ok(Self {
            config,
            pending: Vec::new(),
            completed: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(Vec::new())),
            pool: Arc::new(pool),
            tokio_runtime,
            task: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn add_curve(&mut self, curve: Curve) {
        self.pending.push(curve);
    }

    pub fn add_curves(&mut self, curves: impl IntoIterator<Item = Curve>) {
        self.pending.extend(curves);
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn completed_count(&self) -> usize {
        lock(&self.completed).len()
    }

    pub fn failed_count(&self) -> usize {
        lock(&self.failures).len()
    }

    /// True while an asynchronous batch is still running.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Shared cancellation flag, for cancelling from another thread.
    pub fn cancellation_flag(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    /// Evaluate every pending curve, blocking until done.
    pub fn run_sync(&mut self) -> BatchSummary {
        self.cancelled.store(false, Ordering::SeqCst);
        let curves: Vec<Curve> = self.pending.drain(..).collect();
        debug!(curves = curves.len(), "starting synchronous batch");

        let threshold = self.config.parallel_threshold;
        let cancelled = &self.cancelled;
        let outcomes: Vec<Outcome> = self.pool.install(|| {
            curves
                .into_par_iter()
                .map(|curve| {
                    if cancelled.load(Ordering::SeqCst) {
                        Outcome::Skipped
                    } else {
                        evaluate_curve(curve, threshold)
                    }
                })
                .collect()
        });

        let mut summary = BatchSummary::default();
        let mut completed = lock(&self.completed);
        let mut failures = lock(&self.failures);
        for outcome in outcomes {
            match outcome {
                Outcome::Done(curve) => {
                    summary.completed += 1;
                    completed.push(curve);
                }
                Outcome::Failed(failure) => {
                    summary.failed += 1;
                    failures.push(failure);
                }
                Outcome::Skipped => summary.skipped += 1,
            }
        }
        debug!(?summary, "synchronous batch finished");
        summary
    }

    /// Evaluate every pending curve in the background.
    ///
    /// Returns immediately. `on_progress(completed, total)` and `on_curve`
    /// are called from worker threads as curves finish; `on_complete` is
    /// called once at the end, with [`SansStatus::Cancelled`] if the batch
    /// was cancelled.
    ///
    /// Fails with [`RuntimeError::AlreadyRunning`] while a previous batch is
    /// still in flight; pending curves are left untouched.
    pub fn run_async<F, P, C>(
        &mut self,
        on_complete: F,
        on_progress: P,
        on_curve: C,
    ) -> Result<(), RuntimeError>
    where
        F: FnOnce(SansStatus) + Send + 'static,
        P: Fn(usize, usize) + Send + Sync + 'static,
        C: Fn(&Curve) + Send + Sync + 'static,
    {
        if self.is_running() {
            return Err(RuntimeError::AlreadyRunning);
        }
        self.cancelled.store(false, Ordering::SeqCst);
        let curves: Vec<Curve> = self.pending.drain(..).collect();
        let total = curves.len();
        debug!(curves = total, "starting asynchronous batch");

        let pool = self.pool.clone();
        let cancelled = self.cancelled.clone();
        let completed = self.completed.clone();
        let failures = self.failures.clone();
        let threshold = self.config.parallel_threshold;

        let task = self.tokio_runtime.spawn(async move {
            let finished = Arc::new(AtomicUsize::new(0));
            let batch = tokio::task::spawn_blocking(move || {
                pool.install(|| {
                    curves
                        .into_par_iter()
                        .map(|curve| {
                            if cancelled.load(Ordering::SeqCst) {
                                return BatchSummary {
                                    skipped: 1,
                                    ..Default::default()
                                };
                            }
                            let outcome = evaluate_curve(curve, threshold);
                            let done = finished.fetch_add(1, Ordering::SeqCst) + 1;
                            on_progress(done, total);
                            match outcome {
                                Outcome::Done(curve) => {
                                    on_curve(&curve);
                                    lock(&completed).push(curve);
                                    BatchSummary {
                                        completed: 1,
                                        ..Default::default()
                                    }
                                }
                                Outcome::Failed(failure) => {
                                    lock(&failures).push(failure);
                                    BatchSummary {
                                        failed: 1,
                                        ..Default::default()
                                    }
                                }
                                Outcome::Skipped => BatchSummary {
                                    skipped: 1,
                                    ..Default::default()
                                },
                            }
                        })
                        .reduce(BatchSummary::default, |a, b| BatchSummary {
                            completed: a.completed + b.completed,
                            failed: a.failed + b.failed,
                            skipped: a.skipped + b.skipped,
                        })
                })
            })
            .await;

            match batch {
                Ok(summary) => {
                    debug!(?summary, "asynchronous batch finished");
                    on_complete(summary.status());
                    summary
                }
                Err(error) => {
                    warn!(%error, "asynchronous batch aborted");
                    on_complete(SansStatus::RuntimeError);
                    BatchSummary::default()
                }
            }
        });
        self.task = Some(task);
        Ok(())
    }

    /// Block until the running asynchronous batch, if any, has finished.
    pub fn wait(&mut self) -> Result<BatchSummary, RuntimeError> {
        match self.task.take() {
            Some(task) => self
                .tokio_runtime
                .block_on(task)
                .map_err(|error| RuntimeError::Task(error.to_string())),
            None => Ok(BatchSummary::default()),
        }
    }

    /// Take every evaluated curve collected so far.
    pub fn take_completed(&mut self) -> Vec<Curve> {
        std::mem::take(&mut *lock(&self.completed))
    }

    /// Return evaluated curves, for example after a partial take.
    pub fn add_completed(&mut self, curves: impl IntoIterator<Item = Curve>) {
        lock(&self.completed).extend(curves);
    }

    /// Take every failure collected so far.
    pub fn take_failures(&mut self) -> Vec<CurveFailure> {
        std::mem::take(&mut *lock(&self.failures))
    }

    /// Ask running batches to skip the curves they have not started.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Reset the runtime for reuse.
    ///
    /// A running asynchronous batch is cancelled and awaited first.
    pub fn reset(&mut self) {
        if self.task.is_some() {
            self.cancel();
            if let Err(error) = self.wait() {
                warn!(%error, "batch failed during reset");
            }
        }
        self.pending.clear();
        lock(&self.completed).clear();
        lock(&self.failures).clear();
        self.cancelled.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cylinder, FormFactor, Lamellar, Model};
    use std::sync::mpsc;

    fn cylinder_curve(id: &str, points: usize) -> Curve {
        let model: Model = Cylinder {
            scale: 1.0,
            radius: 20.0,
            length: 400.0,
            contrast: 3e-6,
            background: 0.0,
        }
        .into();
        let q = (1..=points).map(|i| i as f64 * 0.002).collect();
        Curve::new(id, model, q).unwrap()
    }

    fn small_runtime() -> Runtime {
        Runtime::new(RuntimeConfig {
            worker_count: 2,
            parallel_threshold: 16,
        })
        .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = RuntimeConfig::default();
        assert!(config.worker_count >= 1);
        assert_eq!(config.parallel_threshold, 256);
    }

    #[test]
    fn test_run_sync() {
        let mut runtime = small_runtime();
        runtime.add_curves((0..6).map(|i| cylinder_curve(&format!("c{i}"), 4 + 4 * i)));
        assert_eq!(runtime.pending_count(), 6);

        let summary = runtime.run_sync();
        assert_eq!(
            summary,
            BatchSummary {
                completed: 6,
                failed: 0,
                skipped: 0
            }
        );
        assert_eq!(runtime.pending_count(), 0);

        let curves = runtime.take_completed();
        assert_eq!(curves.len(), 6);
        for curve in &curves {
            assert!(curve.is_evaluated());
            assert_eq!(curve.intensity[0], curve.model.intensity(curve.q_values[0]).unwrap());
        }
        assert_eq!(runtime.completed_count(), 0);
    }

    #[test]
    fn test_failed_curve_is_reported() {
        let mut runtime = small_runtime();
        let lamellar: Model = Lamellar {
            scale: 1.0,
            delta: 50.0,
            sigma: 0.1,
            contrast: 1e-6,
            background: 0.0,
        }
        .into();
        runtime.add_curve(Curve::new("singular", lamellar, vec![0.0, 0.1]).unwrap());
        runtime.add_curve(cylinder_curve("ok", 8));

        let summary = runtime.run_sync();
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.failed, 1);
        let failures = runtime.take_failures();
        assert_eq!(failures[0].id, "singular");
    }

    #[test]
    fn test_run_async_callbacks() {
        let mut runtime = small_runtime();
        runtime.add_curves((0..10).map(|i| cylinder_curve(&format!("c{i}"), 20)));

        let (status_tx, status_rx) = mpsc::channel();
        let progress = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let progress_counter = progress.clone();
        let seen_ids = seen.clone();

        runtime.run_async(
            move |status| status_tx.send(status).unwrap(),
            move |_, total| {
                assert_eq!(total, 10);
                progress_counter.fetch_add(1, Ordering::SeqCst);
            },
            move |curve| seen_ids.lock().unwrap().push(curve.id.clone()),
        )
        .unwrap();

        let summary = runtime.wait().unwrap();
        assert_eq!(summary.completed, 10);
        assert_eq!(status_rx.recv().unwrap(), SansStatus::Ok);
        assert_eq!(progress.load(Ordering::SeqCst), 10);
        assert_eq!(seen.lock().unwrap().len(), 10);
        assert_eq!(runtime.take_completed().len(), 10);
        assert!(!runtime.is_running());
    }

    #[test]
    fn test_cancel_skips_remaining_curves() {
        let mut runtime = Runtime::new(RuntimeConfig {
            worker_count: 1,
            parallel_threshold: usize::MAX,
        })
        .unwrap();
        runtime.add_curves((0..200).map(|i| cylinder_curve(&format!("c{i}"), 4)));

        let flag = runtime.cancellation_flag();
        let (status_tx, status_rx) = mpsc::channel();
        runtime.run_async(
            move |status| status_tx.send(status).unwrap(),
            move |_, _| flag.store(true, Ordering::SeqCst),
            |_| {},
        )
        .unwrap();

        let summary = runtime.wait().unwrap();
        assert!(summary.skipped > 0);
        assert_eq!(summary.completed + summary.skipped, 200);
        assert_eq!(status_rx.recv().unwrap(), SansStatus::Cancelled);
    }

    #[test]
    fn test_run_async_rejects_second_batch() {
        let mut runtime = small_runtime();
        runtime.add_curve(cylinder_curve("first", 4));

        // the batch cannot finish until the gate is dropped
        let (gate_tx, gate_rx) = mpsc::channel::<()>();
        let gate = Mutex::new(gate_rx);
        runtime
            .run_async(
                |_| {},
                move |_, _| {
                    let _ = gate.lock().unwrap().recv();
                },
                |_| {},
            )
            .unwrap();
        assert!(runtime.is_running());

        runtime.add_curve(cylinder_curve("second", 4));
        let second = runtime.run_async(|_| {}, |_, _| {}, |_| {});
        assert!(matches!(second, Err(RuntimeError::AlreadyRunning)));
        assert_eq!(runtime.pending_count(), 1);

        drop(gate_tx);
        assert_eq!(runtime.wait().unwrap().completed, 1);
        assert_eq!(runtime.run_sync().completed, 1);
        assert_eq!(runtime.completed_count(), 2);
    }

    #[test]
    fn test_reset() {
        let mut runtime = small_runtime();
        runtime.add_curve(cylinder_curve("a", 4));
        runtime.run_sync();
        runtime.add_curve(cylinder_curve("b", 4));
        runtime.reset();
        assert_eq!(runtime.pending_count(), 0);
        assert_eq!(runtime.completed_count(), 0);
    }
}
