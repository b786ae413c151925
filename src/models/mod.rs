//! Core data models for mosaicsh
//!
//! Plain data handed between the parser, the orchestrator and the job
//! controller.

pub mod command;
pub mod job;

// Re-exports for convenience
pub use command::{ParsedCommand, Pipeline, RedirectionSpec, Redirections};
pub use job::{Job, JobProcess, JobState, ProcessStatus};
