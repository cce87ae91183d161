//! Gantry Core Library
//!
//! This is the core library for the Gantry build orchestration tool. It
//! provides target registration, dependency resolution, the execution
//! engine, built-in tasks, and buildfile parsing.
//!
//! ## Architecture
//!
//! The core library is organized into several modules:
//!
//! - [`session`] - High-level build session interface consumed by the CLI
//! - [`target`] - The target entity and its execution algorithm
//! - [`tree`] - The target registry ("target tree")
//! - [`context`] - Per-run execution state and dependency resolution
//! - [`executable`] - The executable-task capability
//! - [`tasks`] - Built-in process, shell, and filesystem tasks
//! - [`graph`] - Dependency-graph diagnostics and cycle detection
//! - [`configs`] - Buildfile parsing and schema
//! - [`results`] - Result types for session operations
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
//!
//! The primary entry point is the [`BuildSession`], which owns the target
//! tree and runs targets through a fresh execution context per run:
//!
//! ```rust,no_run
//! use gantry_core::session::BuildSession;
//! use gantry_core::target::Target;
//! use gantry_core::tasks::ShellTask;
//!
//! # fn example() -> gantry_core::types::GantryResult<()> {
//! let mut session = BuildSession::new();
//! session.add_target(Target::new("compile").with_task(ShellTask::new("cargo build")))?;
//! session.add_target(Target::new("package").depends_on(["compile"]))?;
//!
//! let result = session.run_targets(&["package".to_string()])?;
//! # Ok(())
//! # }
//! ```

pub mod configs;
pub mod context;
pub mod executable;
pub mod graph;
pub mod results;
pub mod session;
pub mod target;
pub mod tasks;
pub mod tree;
pub mod types;

// Re-export the main types for easier usage
pub use context::BuildContext;
pub use executable::{CallbackTask, Executable};
pub use session::BuildSession;
pub use target::Target;
pub use tree::TargetTree;
pub use types::{GantryError, GantryResult};
