//! BoardLens Analysis Client
//!
//! Talks to the remote analysis service and paces capture cycles:
//! - **Client:** JSON transport for `POST /process_image`
//! - **Scheduler:** single-flight pacing of manual triggers and the
//!   periodic auto-capture timer
//!
//! The scheduler upholds the one concurrency guarantee of the system:
//! at most one capture → encode → analyze round-trip is ever
//! outstanding; extra triggers are dropped, never queued.

pub mod client;
pub mod protocol;
pub mod scheduler;

pub use client::{AnalysisClient, Analyze};
pub use protocol::AnalysisOutcome;
pub use scheduler::{AnalysisEvent, CaptureScheduler, SchedulerState};
