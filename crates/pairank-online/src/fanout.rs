//! Criterion fan-out coordinator.
//!
//! Every criterion of the poll runs through the same pipeline, either in
//! process one after another or on a bounded rayon pool. In parallel mode
//! each task opens its own store through the factory; only the event and
//! the criterion name cross into a worker. A failing or panicking criterion
//! is reported and never cancels its siblings. Totals are recomputed once,
//! after every criterion has finished.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use pairank_core::config::FanOutConfig;
use pairank_core::errors::OnlineError;
use pairank_core::models::ComparisonEvent;
use pairank_core::traits::{GlobalAggregator, PollScaling, ScoreSink, ScoreSource, ScoreStore, StoreFactory};
use rayon::prelude::*;

use crate::engine::{CriterionOutcome, OnlineHeuristics};

/// How criteria are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanOutMode {
    /// One criterion after another on the calling thread.
    Sequential,
    /// One task per criterion on a pool of `workers` threads.
    Parallel { workers: usize },
}

impl Default for FanOutMode {
    fn default() -> Self {
        Self::from_config(&FanOutConfig::default())
    }
}

impl FanOutMode {
    pub fn from_config(config: &FanOutConfig) -> Self {
        if config.effective_parallel() {
            Self::Parallel {
                workers: config.effective_workers().max(1),
            }
        } else {
            Self::Sequential
        }
    }
}

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every criterion finished (skips included) and totals were recomputed.
    Done,
    /// At least one criterion failed. The others still completed and totals
    /// were recomputed.
    FailedPartial,
}

#[derive(Debug)]
pub struct CriterionReport {
    pub criterion: String,
    pub result: Result<CriterionOutcome, OnlineError>,
}

/// Aggregate result of one fan-out run. Criteria keep the poll's order.
#[derive(Debug)]
pub struct RunReport {
    pub poll: String,
    pub status: RunStatus,
    pub criteria: Vec<CriterionReport>,
    pub totals_written: usize,
}

impl RunReport {
    pub fn outcome(&self, criterion: &str) -> Option<&Result<CriterionOutcome, OnlineError>> {
        self.criteria
            .iter()
            .find(|r| r.criterion == criterion)
            .map(|r| &r.result)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &OnlineError)> {
        self.criteria
            .iter()
            .filter_map(|r| r.result.as_ref().err().map(|e| (r.criterion.as_str(), e)))
    }
}

impl<A: GlobalAggregator, P: PollScaling> OnlineHeuristics<A, P> {
    /// Run every criterion of `event.poll` with the configured fan-out mode.
    pub fn run<F: StoreFactory>(
        &self,
        factory: &F,
        event: &ComparisonEvent,
    ) -> Result<RunReport, OnlineError> {
        match self.fanout() {
            FanOutMode::Sequential => {
                let store = factory.open(&event.poll)?;
                self.run_with_store(&store, event)
            }
            FanOutMode::Parallel { workers } => self.run_parallel(factory, event, workers),
        }
    }

    /// Run every criterion sequentially on an already-open store.
    pub fn run_with_store<S: ScoreStore + ?Sized>(
        &self,
        store: &S,
        event: &ComparisonEvent,
    ) -> Result<RunReport, OnlineError> {
        let started = Instant::now();
        let criteria = store.poll_criteria()?;
        tracing::info!(
            poll = %event.poll,
            user_id = %event.user_id,
            criteria = criteria.len(),
            is_delete = event.is_delete,
            "online update: start (sequential)"
        );

        let reports = criteria
            .into_iter()
            .map(|criterion| {
                let result = guarded(&criterion, || self.run_criterion(store, event, &criterion));
                report(criterion, result)
            })
            .collect();

        self.finish(store, event, reports, started)
    }

    fn run_parallel<F: StoreFactory>(
        &self,
        factory: &F,
        event: &ComparisonEvent,
        workers: usize,
    ) -> Result<RunReport, OnlineError> {
        let started = Instant::now();

        // The coordinator's handle is closed before any task starts.
        let criteria = {
            let store = factory.open(&event.poll)?;
            store.poll_criteria()?
        };

        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("pairank-criterion-{i}"))
            .build()
        {
            Ok(pool) => pool,
            Err(e) => {
                tracing::warn!(error = %e, "worker pool unavailable, running criteria sequentially");
                let store = factory.open(&event.poll)?;
                return self.run_with_store(&store, event);
            }
        };

        tracing::info!(
            poll = %event.poll,
            user_id = %event.user_id,
            criteria = criteria.len(),
            workers,
            is_delete = event.is_delete,
            "online update: start (parallel)"
        );

        let reports: Vec<CriterionReport> = pool.install(|| {
            criteria
                .par_iter()
                .map(|criterion| {
                    let result = guarded(criterion, || {
                        let store = factory.open(&event.poll)?;
                        self.run_criterion(&store, event, criterion)
                    });
                    report(criterion.clone(), result)
                })
                .collect()
        });

        let store = factory.open(&event.poll)?;
        self.finish(&store, event, reports, started)
    }

    /// Barrier step: runs once every criterion has completed or failed.
    fn finish<S: ScoreSink + ?Sized>(
        &self,
        store: &S,
        event: &ComparisonEvent,
        criteria: Vec<CriterionReport>,
        started: Instant,
    ) -> Result<RunReport, OnlineError> {
        let totals_written = store.finalize_published_scores(self.total_score_factor())?;
        let status = if criteria.iter().any(|r| r.result.is_err()) {
            RunStatus::FailedPartial
        } else {
            RunStatus::Done
        };
        tracing::info!(
            poll = %event.poll,
            status = ?status,
            totals = totals_written,
            run_duration_ms = started.elapsed().as_millis() as u64,
            "online update: done"
        );
        Ok(RunReport {
            poll: event.poll.clone(),
            status,
            criteria,
            totals_written,
        })
    }
}

/// Synchronous trigger used by comparison write paths: always sequential.
pub fn update_user_scores<F, A, P>(
    factory: &F,
    event: &ComparisonEvent,
    engine: &OnlineHeuristics<A, P>,
) -> Result<RunReport, OnlineError>
where
    F: StoreFactory,
    A: GlobalAggregator,
    P: PollScaling,
{
    let store = factory.open(&event.poll)?;
    engine.run_with_store(&store, event)
}

fn report(criterion: String, result: Result<CriterionOutcome, OnlineError>) -> CriterionReport {
    match &result {
        Ok(CriterionOutcome::Updated(_)) => tracing::debug!(criterion = %criterion, "criterion done"),
        Ok(CriterionOutcome::Skipped(_)) => {}
        Err(e) => tracing::error!(criterion = %criterion, error = %e, "criterion failed"),
    }
    CriterionReport { criterion, result }
}

/// Turn a panic inside one criterion into an error for that criterion.
fn guarded<T>(
    criterion: &str,
    task: impl FnOnce() -> Result<T, OnlineError>,
) -> Result<T, OnlineError> {
    catch_unwind(AssertUnwindSafe(task)).unwrap_or_else(|payload| {
        Err(OnlineError::WorkerPanic {
            criterion: criterion.to_string(),
            message: panic_message(payload.as_ref()),
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
