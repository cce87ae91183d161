//! Built-in task implementations
//!
//! This module provides the task types buildfiles and build scripts attach
//! to targets: process/shell execution and filesystem operations.

pub mod fs;
pub mod process;

pub use fs::{CopyFileTask, CreateDirTask, DeleteDirTask, DeleteFilesTask};
pub use process::{ProcessTask, ShellTask};
