//! Named, dependency-aware, executable build units
//!
//! A [`Target`] combines an optional action callback, an ordered list of
//! sub-tasks, and a list of dependency names. Dependencies are stored as
//! names and resolved through the target tree only when the target
//! executes, so a target may freely depend on names registered later.
//!
//! `Target` implements [`Executable`] itself, so a whole target can be
//! appended to another target's task list like any other task.

use std::cmp::Ordering;
use std::fmt;
use std::time::Instant;

use crate::context::BuildContext;
use crate::executable::Executable;
use crate::types::{GantryError, GantryResult};

type Action = Box<dyn Fn(&mut BuildContext<'_>) -> GantryResult<()>>;

/// A named unit of build work with dependencies, an optional action, and
/// ordered sub-tasks.
///
/// Configuration is builder-style: chain the `with_*` / `depends_on`
/// methods, then move the target into a [`TargetTree`] for execution.
///
/// [`TargetTree`]: crate::tree::TargetTree
pub struct Target {
    name: String,
    description: Option<String>,
    hidden: bool,
    dependencies: Vec<String>,
    action: Option<Action>,
    tasks: Vec<Box<dyn Executable>>,
}

impl Target {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            hidden: false,
            dependencies: Vec::new(),
            action: None,
            tasks: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Hidden targets are excluded from end-user listings but remain
    /// executable, both directly and as dependencies.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Declared dependency names, in declaration order. Duplicates are
    /// preserved; repeat executions are suppressed by the run memo, not
    /// by this list.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    // --- configuration ------------------------------------------------------

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Append dependency names. Names need not be registered yet; they are
    /// looked up when this target executes.
    pub fn depends_on<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies.extend(names.into_iter().map(Into::into));
        self
    }

    /// Set the primary action callback.
    ///
    /// The action runs after dependencies and before tasks. It contributes
    /// no numeric result; it signals failure by returning an error. Setting
    /// an action on a target that already has one is a configuration error;
    /// use [`Target::override_action`] to deliberately replace it.
    pub fn action<F>(mut self, action: F) -> GantryResult<Self>
    where
        F: Fn(&mut BuildContext<'_>) -> GantryResult<()> + 'static,
    {
        if self.action.is_some() {
            return Err(GantryError::Config(format!(
                "Target '{}' already has an action; use override_action to replace it",
                self.name
            )));
        }
        self.action = Some(Box::new(action));
        Ok(self)
    }

    /// Replace the action callback unconditionally, bypassing the
    /// single-assignment rule. For customization of previously configured
    /// targets.
    pub fn override_action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut BuildContext<'_>) -> GantryResult<()> + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    /// Append a task to the ordered task list, run after the action.
    pub fn with_task(mut self, task: impl Executable + 'static) -> Self {
        self.tasks.push(Box::new(task));
        self
    }

    // --- execution ----------------------------------------------------------

    fn run(&self, ctx: &mut BuildContext<'_>) -> GantryResult<i32> {
        // Marking before dependency resolution is what breaks cycles: a
        // dependency chain that loops back here finds the name already
        // marked and skips it.
        ctx.mark_target_as_executed(&self.name);
        ctx.ensure_dependencies_executed(&self.name)?;

        if let Some(action) = &self.action {
            action(ctx)?;
        }

        let mut result = 0;
        for task in &self.tasks {
            result = ctx.run_task(task.as_ref())?;
        }
        Ok(result)
    }
}

impl Executable for Target {
    fn describe(&self) -> String {
        match &self.description {
            Some(description) => description.clone(),
            None => format!("target {}", self.name),
        }
    }

    /// Execute this target: mark it in the run memo, ensure every declared
    /// dependency has executed, run the action, run the tasks in order, and
    /// return the last task's result code (zero when there are no tasks).
    ///
    /// Any error propagates immediately, aborting remaining tasks here and
    /// pending sibling dependencies of every ancestor in the call chain.
    fn execute(&self, ctx: &mut BuildContext<'_>) -> GantryResult<i32> {
        ctx.log_target_started(&self.name);
        let started = Instant::now();
        let result = self.run(ctx);
        ctx.log_target_finished(&self.name, started.elapsed(), &result);
        result
    }
}

// The action and tasks are boxed closures, so Debug summarizes them
// instead of deriving.
impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("hidden", &self.hidden)
            .field("dependencies", &self.dependencies)
            .field("has_action", &self.action.is_some())
            .field("task_count", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

// Targets order by name, for stable listings.
impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Target {}

impl PartialOrd for Target {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Target {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}
