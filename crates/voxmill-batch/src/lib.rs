//! Voxmill Batch Orchestrator
//!
//! Runs ordered lists of synthesis requests as jobs. Each item is
//! synthesized, put through its effect chain, optionally mixed with a second
//! voice and watermarked. Finished items are packaged as individual files,
//! one concatenated file, or files plus an M3U playlist.
//!
//! A failing item is recorded on the job and the job moves on. Only faults
//! outside the item loop, such as outputs that cannot be concatenated, fail
//! the whole job.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use voxmill_audio::PcmBuffer;
//! use voxmill_batch::{BatchOrchestrator, SynthesisError, SynthesisRequest};
//! use voxmill_spec::{BatchRequest, JobStatus};
//!
//! let synth = |req: &SynthesisRequest| -> Result<PcmBuffer, SynthesisError> {
//!     PcmBuffer::mono(vec![0.1; req.text.len() * 100], 16000)
//!         .map_err(|e| SynthesisError::Backend(e.to_string()))
//! };
//! let orchestrator = BatchOrchestrator::new(Arc::new(synth));
//!
//! let request = BatchRequest::builder("demo")
//!     .item("Hello", "narrator")
//!     .item("World", "narrator")
//!     .build();
//! let done = orchestrator.run(request, |_| {}).unwrap();
//! assert_eq!(done.status, JobStatus::Completed);
//! assert_eq!(done.outputs.len(), 2);
//! ```

pub mod artifact;
pub mod error;
pub mod job;
pub mod orchestrator;
pub mod packaging;
pub mod pipeline;
pub mod synthesizer;

pub use artifact::{ArtifactContent, ArtifactKind, ArtifactSummary, AudioArtifact};
pub use error::{BatchError, BatchResult, ItemError, SynthesisError};
pub use job::{BatchJob, JobId, JobReport, JobSnapshot};
pub use orchestrator::BatchOrchestrator;
pub use pipeline::{ItemPipeline, RenderedItem};
pub use synthesizer::{SynthesisRequest, Synthesizer};
