//! Job registry, execution and submission.
//!
//! A job runs its items strictly in order on one worker. Cancellation is
//! cooperative: [`BatchOrchestrator::cancel`] sets a flag that the worker
//! checks before starting each item, so an item already in flight always
//! finishes (or fails) first.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use voxmill_spec::validation::validate_batch_request_with_budget;
use voxmill_spec::{BatchRequest, ProcessingBudget};

use crate::artifact::AudioArtifact;
use crate::error::{BatchError, BatchResult};
use crate::job::{BatchJob, JobId, JobSnapshot};
use crate::packaging::package;
use crate::pipeline::ItemPipeline;
use crate::synthesizer::Synthesizer;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone)]
struct JobEntry {
    job: Arc<Mutex<BatchJob>>,
    cancel: Arc<AtomicBool>,
}

type Registry = Arc<Mutex<HashMap<JobId, JobEntry>>>;

/// Runs batch jobs and tracks the ones in flight.
#[derive(Clone)]
pub struct BatchOrchestrator {
    pipeline: Arc<ItemPipeline>,
    registry: Registry,
    budget: ProcessingBudget,
}

impl BatchOrchestrator {
    /// Creates an orchestrator with the standard effect chain and default
    /// budget.
    pub fn new(synthesizer: Arc<dyn Synthesizer>) -> Self {
        Self::with_pipeline(ItemPipeline::new(synthesizer))
    }

    /// Creates an orchestrator around a prepared pipeline.
    pub fn with_pipeline(pipeline: ItemPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            registry: Arc::new(Mutex::new(HashMap::new())),
            budget: ProcessingBudget::default(),
        }
    }

    /// Sets the budget requests are validated against.
    pub fn with_budget(mut self, budget: ProcessingBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn budget(&self) -> &ProcessingBudget {
        &self.budget
    }

    /// Runs `request` on the calling thread.
    ///
    /// `on_progress` sees a snapshot when the job starts, after every item,
    /// and once more in the terminal state, which is also returned.
    pub fn run<F>(&self, request: BatchRequest, mut on_progress: F) -> BatchResult<JobSnapshot>
    where
        F: FnMut(&JobSnapshot),
    {
        let (id, entry) = self.admit(request)?;
        let registration = Registration {
            registry: &self.registry,
            id: &id,
        };
        let last = execute(&self.pipeline, &entry, &mut on_progress);
        drop(registration);
        on_progress(&last);
        Ok(last)
    }

    /// Starts `request` on the blocking pool and returns its id at once.
    ///
    /// Snapshots are pushed to `progress_tx` until a terminal one. Must be
    /// called from within a tokio runtime.
    pub fn submit(
        &self,
        request: BatchRequest,
        progress_tx: UnboundedSender<JobSnapshot>,
    ) -> BatchResult<JobId> {
        let handle = Handle::try_current().map_err(|e| BatchError::Runtime(e.to_string()))?;
        let (id, entry) = self.admit(request)?;

        let worker = {
            let pipeline = Arc::clone(&self.pipeline);
            let registry = Arc::clone(&self.registry);
            let entry = entry.clone();
            let tx = progress_tx.clone();
            let id = id.clone();
            handle.spawn_blocking(move || {
                let registration = Registration {
                    registry: &registry,
                    id: &id,
                };
                let last = execute(&pipeline, &entry, &mut |snapshot: &JobSnapshot| {
                    let _ = tx.send(snapshot.clone());
                });
                drop(registration);
                let _ = tx.send(last);
            })
        };

        let registry = Arc::clone(&self.registry);
        let job_id = id.clone();
        handle.spawn(async move {
            if let Err(e) = worker.await {
                let snapshot = {
                    let mut job = lock(&entry.job);
                    job.fail(BatchError::Orchestration(format!("worker panicked: {}", e)));
                    job.snapshot()
                };
                release(&registry, &job_id);
                let _ = progress_tx.send(snapshot);
            }
        });

        Ok(id)
    }

    /// Requests cancellation. Returns false if no such job is running.
    pub fn cancel(&self, id: &str) -> bool {
        match lock(&self.registry).get(id) {
            Some(entry) => {
                entry.cancel.store(true, Ordering::SeqCst);
                log::info!("job {}: cancellation requested", id);
                true
            }
            None => false,
        }
    }

    /// Snapshot of a running job.
    pub fn progress(&self, id: &str) -> Option<JobSnapshot> {
        let entry = lock(&self.registry).get(id).cloned()?;
        let snapshot = lock(&entry.job).snapshot();
        Some(snapshot)
    }

    /// Ids of jobs still running, sorted.
    pub fn active_jobs(&self) -> Vec<JobId> {
        let mut ids: Vec<JobId> = lock(&self.registry).keys().cloned().collect();
        ids.sort();
        ids
    }

    fn admit(&self, request: BatchRequest) -> BatchResult<(JobId, JobEntry)> {
        let validation = validate_batch_request_with_budget(&request, &self.budget);
        if !validation.is_ok() {
            let messages: Vec<String> = validation.errors.iter().map(|e| e.to_string()).collect();
            return Err(BatchError::InvalidRequest(messages.join("; ")));
        }

        let id = request.job_id.clone();
        let entry = JobEntry {
            job: Arc::new(Mutex::new(BatchJob::new(request))),
            cancel: Arc::new(AtomicBool::new(false)),
        };

        let mut registry = lock(&self.registry);
        if registry.contains_key(&id) {
            return Err(BatchError::DuplicateJob(id));
        }
        registry.insert(id.clone(), entry.clone());
        Ok((id, entry))
    }
}

fn release(registry: &Registry, id: &str) {
    lock(registry).remove(id);
}

/// Releases a job id when dropped, so an unwinding synthesizer frees it too.
struct Registration<'a> {
    registry: &'a Registry,
    id: &'a str,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        release(self.registry, self.id);
    }
}

/// Drives a job to a terminal state and returns the final snapshot.
fn execute<F>(pipeline: &ItemPipeline, entry: &JobEntry, on_progress: &mut F) -> JobSnapshot
where
    F: FnMut(&JobSnapshot),
{
    let (request, started) = {
        let mut job = lock(&entry.job);
        job.start();
        (job.request().clone(), job.snapshot())
    };
    on_progress(&started);

    for (i, item) in request.items.iter().enumerate() {
        if entry.cancel.load(Ordering::SeqCst) {
            let mut job = lock(&entry.job);
            job.cancel();
            return job.snapshot();
        }

        let index = i + 1;
        let rendered = pipeline.render(item, request.watermark.as_ref());

        let snapshot = {
            let mut job = lock(&entry.job);
            match rendered {
                Ok(r) => job.record_output(AudioArtifact::audio(
                    request.naming.file_name(index),
                    item.text.as_str(),
                    r.buffer,
                    r.watermarked,
                )),
                Err(e) => job.record_failure(index, e),
            }
            job.snapshot()
        };
        on_progress(&snapshot);
    }

    let mut job = lock(&entry.job);
    match package(job.outputs(), request.output_mode, &request.naming) {
        Ok(outputs) => job.complete(outputs),
        Err(e) => job.fail(e),
    }
    job.snapshot()
}
