//! Job state and progress snapshots.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use voxmill_spec::{BatchRequest, JobStatus};

use crate::artifact::{AudioArtifact, ArtifactSummary};

/// Job identifier, taken from the request.
pub type JobId = String;

/// Live state of a batch job. Owned by the orchestrator.
#[derive(Debug)]
pub struct BatchJob {
    request: BatchRequest,
    status: JobStatus,
    completed_count: usize,
    errors: Vec<String>,
    outputs: Vec<AudioArtifact>,
    started_at: Option<Instant>,
}

impl BatchJob {
    /// Creates a pending job.
    pub fn new(request: BatchRequest) -> Self {
        Self {
            request,
            status: JobStatus::Pending,
            completed_count: 0,
            errors: Vec::new(),
            outputs: Vec::new(),
            started_at: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.request.job_id
    }

    pub fn request(&self) -> &BatchRequest {
        &self.request
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn total_items(&self) -> usize {
        self.request.items.len()
    }

    /// Moves `pending` to `processing`.
    pub fn start(&mut self) {
        if self.status == JobStatus::Pending {
            self.status = JobStatus::Processing;
            self.started_at = Some(Instant::now());
            log::info!("job {}: processing {} items", self.id(), self.total_items());
        }
    }

    /// Records a finished item.
    pub fn record_output(&mut self, artifact: AudioArtifact) {
        self.outputs.push(artifact);
        self.completed_count += 1;
    }

    /// Records a failed item. `index` is 1-based.
    pub fn record_failure(&mut self, index: usize, message: impl std::fmt::Display) {
        let message = format!("item {}: {}", index, message);
        log::warn!("job {}: {}", self.id(), message);
        self.errors.push(message);
        self.completed_count += 1;
    }

    /// Per-item outputs so far.
    pub fn outputs(&self) -> &[AudioArtifact] {
        &self.outputs
    }

    /// Installs packaged outputs and completes the job.
    pub fn complete(&mut self, outputs: Vec<AudioArtifact>) {
        self.outputs = outputs;
        self.finish(JobStatus::Completed);
    }

    /// Fails the job with a top-level error.
    pub fn fail(&mut self, message: impl std::fmt::Display) {
        if self.status.is_terminal() {
            return;
        }
        self.errors.push(message.to_string());
        self.finish(JobStatus::Failed);
    }

    /// Marks the job cancelled.
    pub fn cancel(&mut self) {
        self.finish(JobStatus::Cancelled);
    }

    fn finish(&mut self, status: JobStatus) {
        if self.status.is_terminal() {
            return;
        }
        self.status = status;
        log::info!(
            "job {}: {} ({}/{} items, {} errors)",
            self.id(),
            status,
            self.completed_count,
            self.total_items(),
            self.errors.len()
        );
    }

    /// Percentage of items handled, 0-100.
    pub fn progress(&self) -> f64 {
        match self.total_items() {
            0 => 100.0,
            total => self.completed_count as f64 / total as f64 * 100.0,
        }
    }

    /// Remaining seconds, extrapolated from the mean item time so far.
    pub fn estimated_time_remaining(&self) -> Option<f64> {
        if self.status.is_terminal() {
            return Some(0.0);
        }
        let started = self.started_at?;
        if self.completed_count == 0 {
            return None;
        }
        let per_item = started.elapsed().as_secs_f64() / self.completed_count as f64;
        let remaining = self.total_items().saturating_sub(self.completed_count);
        Some(per_item * remaining as f64)
    }

    /// Copies out the current state.
    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            job_id: self.id().to_string(),
            status: self.status,
            total_items: self.total_items(),
            completed_count: self.completed_count,
            progress: self.progress(),
            estimated_time_remaining: self.estimated_time_remaining(),
            errors: self.errors.clone(),
            outputs: self.outputs.clone(),
        }
    }
}

/// Point-in-time copy of a job. Later job changes never show through.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSnapshot {
    pub job_id: JobId,
    pub status: JobStatus,
    pub total_items: usize,
    pub completed_count: usize,
    /// 0-100.
    pub progress: f64,
    /// Seconds, once at least one item has finished.
    pub estimated_time_remaining: Option<f64>,
    pub errors: Vec<String>,
    pub outputs: Vec<AudioArtifact>,
}

impl JobSnapshot {
    /// True once the job has stopped.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Serializable form without sample data.
    pub fn report(&self) -> JobReport {
        JobReport {
            job_id: self.job_id.clone(),
            status: self.status,
            total_items: self.total_items,
            completed_count: self.completed_count,
            progress: self.progress,
            errors: self.errors.clone(),
            outputs: self.outputs.iter().map(AudioArtifact::summary).collect(),
        }
    }
}

/// JSON report of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobReport {
    pub job_id: JobId,
    pub status: JobStatus,
    pub total_items: usize,
    pub completed_count: usize,
    pub progress: f64,
    pub errors: Vec<String>,
    pub outputs: Vec<ArtifactSummary>,
}
