//! Process orchestration
//!
//! - [`pipeline`] - plans and runs one pipeline of builtins and external
//!   programs, foreground or background
//! - [`path`] - locating external programs on `PATH`

pub mod path;
pub mod pipeline;

pub use path::{is_executable, resolve_program};
pub use pipeline::PipelineExecutor;
