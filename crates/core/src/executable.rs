//! The executable-task capability
//!
//! Everything the engine can run implements [`Executable`]: built-in tasks,
//! ad-hoc callbacks, and targets themselves, which lets a whole target be
//! composed into another target's task list.

use crate::context::BuildContext;
use crate::types::GantryResult;

/// A unit of work the engine can execute against the shared build context.
///
/// `execute` returns a numeric result code. The engine does not interpret
/// the code beyond passing the last one through; a task signals failure by
/// returning an error, which aborts the whole execution chain.
pub trait Executable {
    /// Human-readable text used in task logs.
    fn describe(&self) -> String;

    /// Perform the work and return a result code (0 by convention for
    /// "nothing to report").
    fn execute(&self, ctx: &mut BuildContext<'_>) -> GantryResult<i32>;
}

/// Adapts a closure into an [`Executable`] task.
///
/// Useful for inline work in build scripts and for recording execution
/// order in tests.
pub struct CallbackTask {
    description: String,
    callback: Box<dyn Fn(&mut BuildContext<'_>) -> GantryResult<i32>>,
}

impl CallbackTask {
    pub fn new<F>(description: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&mut BuildContext<'_>) -> GantryResult<i32> + 'static,
    {
        Self {
            description: description.into(),
            callback: Box::new(callback),
        }
    }
}

impl Executable for CallbackTask {
    fn describe(&self) -> String {
        self.description.clone()
    }

    fn execute(&self, ctx: &mut BuildContext<'_>) -> GantryResult<i32> {
        (self.callback)(ctx)
    }
}
