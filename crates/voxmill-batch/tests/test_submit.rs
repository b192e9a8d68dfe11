//! Asynchronous submission and cooperative cancellation.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::sync::mpsc;
use voxmill_batch::{BatchError, BatchOrchestrator, JobSnapshot};
use voxmill_spec::{BatchRequest, JobStatus};

use common::{GatedSynth, ToneSynth};

fn five_items(job_id: &str) -> BatchRequest {
    ["one", "two", "three", "four", "five"]
        .iter()
        .fold(BatchRequest::builder(job_id), |b, t| b.item(*t, "narrator"))
        .build()
}

async fn drain(rx: &mut mpsc::UnboundedReceiver<JobSnapshot>) -> Vec<JobSnapshot> {
    let mut seen = Vec::new();
    while let Some(snapshot) = rx.recv().await {
        let done = snapshot.is_terminal();
        seen.push(snapshot);
        if done {
            break;
        }
    }
    seen
}

#[tokio::test]
async fn test_submit_streams_until_terminal() {
    let orch = BatchOrchestrator::new(Arc::new(ToneSynth::default()));
    let (tx, mut rx) = mpsc::unbounded_channel();

    let id = orch.submit(five_items("streamed"), tx).unwrap();
    assert_eq!(id, "streamed");

    let seen = drain(&mut rx).await;
    let last = seen.last().unwrap();
    assert_eq!(last.status, JobStatus::Completed);
    assert_eq!(last.completed_count, 5);
    assert_eq!(last.outputs.len(), 5);
    assert_eq!(seen.len(), 7);
}

#[tokio::test]
async fn test_cancel_during_second_item() {
    let (synth, started, release) = GatedSynth::new(2);
    let synth = Arc::new(synth);
    let orch = BatchOrchestrator::new(synth.clone());
    let (tx, mut rx) = mpsc::unbounded_channel();

    let id = orch.submit(five_items("cancel-me"), tx).unwrap();
    assert_eq!(started.recv().unwrap(), 2);

    // Item 2 is in flight
    let mid = orch.progress(&id).unwrap();
    assert_eq!(mid.status, JobStatus::Processing);
    assert_eq!(mid.completed_count, 1);

    assert!(orch.cancel(&id));
    release.send(()).unwrap();

    let seen = drain(&mut rx).await;
    let last = seen.last().unwrap();
    assert_eq!(last.status, JobStatus::Cancelled);
    assert_eq!(last.completed_count, 2);
    assert_eq!(last.outputs.len(), 2);
    assert!(last.errors.is_empty());
    assert_eq!(synth.calls.load(Ordering::SeqCst), 2);
    assert!(!orch.cancel(&id));
}

#[tokio::test]
async fn test_duplicate_running_job_rejected() {
    let (synth, started, release) = GatedSynth::new(1);
    let orch = BatchOrchestrator::new(Arc::new(synth));
    let (tx, mut rx) = mpsc::unbounded_channel();

    orch.submit(five_items("dup"), tx.clone()).unwrap();
    started.recv().unwrap();
    assert_eq!(orch.active_jobs(), vec!["dup".to_string()]);

    let err = orch.submit(five_items("dup"), tx).unwrap_err();
    assert!(matches!(err, BatchError::DuplicateJob(ref id) if id == "dup"));

    release.send(()).unwrap();
    let seen = drain(&mut rx).await;
    assert_eq!(seen.last().unwrap().status, JobStatus::Completed);
}

#[tokio::test]
async fn test_concurrent_jobs_are_independent() {
    let orch = BatchOrchestrator::new(Arc::new(ToneSynth::default()));
    let (tx_a, mut rx_a) = mpsc::unbounded_channel();
    let (tx_b, mut rx_b) = mpsc::unbounded_channel();

    orch.submit(five_items("job-a"), tx_a).unwrap();
    orch.submit(five_items("job-b"), tx_b).unwrap();

    let a = drain(&mut rx_a).await;
    let b = drain(&mut rx_b).await;
    assert!(a.iter().all(|s| s.job_id == "job-a"));
    assert!(b.iter().all(|s| s.job_id == "job-b"));
    assert_eq!(a.last().unwrap().status, JobStatus::Completed);
    assert_eq!(b.last().unwrap().status, JobStatus::Completed);
}

#[test]
fn test_submit_needs_runtime() {
    let orch = BatchOrchestrator::new(Arc::new(ToneSynth::default()));
    let (tx, _rx) = mpsc::unbounded_channel();
    let err = orch.submit(five_items("no-rt"), tx).unwrap_err();
    assert!(matches!(err, BatchError::Runtime(_)));
    assert!(orch.active_jobs().is_empty());
}
