//! Per-run execution state and the dependency-resolution engine
//!
//! A [`BuildContext`] is created for each run over a borrowed target tree.
//! It owns everything that is mutable during a run: the executed-set memo,
//! the property store, and the console output state. The tree itself stays
//! immutably borrowed for the whole run, so targets cannot be reconfigured
//! while they execute.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use colored::*;

use crate::executable::Executable;
use crate::tree::TargetTree;
use crate::types::{GantryError, GantryResult};

/// Shared execution context passed to every action and task in a run.
///
/// Dependencies are resolved here, by name, at the moment a target executes:
/// a dependency may be registered long after the name was declared, as long
/// as it is present once execution reaches it.
pub struct BuildContext<'a> {
    tree: &'a TargetTree,
    executed: HashSet<String>,
    properties: HashMap<String, String>,
    verbose: bool,
    depth: usize,
}

impl<'a> BuildContext<'a> {
    pub fn new(tree: &'a TargetTree) -> Self {
        Self {
            tree,
            executed: HashSet::new(),
            properties: HashMap::new(),
            verbose: false,
            depth: 0,
        }
    }

    pub fn with_properties(mut self, properties: HashMap<String, String>) -> Self {
        self.properties.extend(properties);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The target tree this run executes against.
    pub fn tree(&self) -> &'a TargetTree {
        self.tree
    }

    // --- properties ---------------------------------------------------------

    /// Read a context property set by the session, the buildfile, or an
    /// earlier action in this run.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Set a context property; later actions and tasks in the same run see it.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }

    // --- execution ----------------------------------------------------------

    /// Execute a registered target directly.
    ///
    /// This is the run entry point: it always executes, even if the name was
    /// already marked during this run. The executed-set memo only suppresses
    /// repeats on the dependency-resolution path.
    pub fn run_target(&mut self, name: &str) -> GantryResult<i32> {
        let tree = self.tree;
        let target = tree.target(name)?;
        target.execute(self)
    }

    /// Record a target name as executed for this run. Idempotent.
    pub fn mark_target_as_executed(&mut self, name: &str) {
        self.executed.insert(name.to_string());
    }

    /// Whether a target name has been marked executed in this run.
    pub fn is_executed(&self, name: &str) -> bool {
        self.executed.contains(name)
    }

    /// Execute every not-yet-executed dependency of the named target, in
    /// declaration order.
    ///
    /// Each dependency is looked up by name at this moment; an unregistered
    /// name is a fatal configuration mistake. Dependencies already marked
    /// executed are skipped entirely, which both de-duplicates diamond
    /// dependencies and truncates dependency cycles (the cycle-closing edge
    /// finds its origin already marked).
    pub fn ensure_dependencies_executed(&mut self, target_name: &str) -> GantryResult<()> {
        let tree = self.tree;
        let target = tree.target(target_name)?;
        for dependency in target.dependencies() {
            let dep_target = tree.get(dependency).ok_or_else(|| {
                GantryError::Target(format!(
                    "Dependency '{}' of target '{}' is not registered",
                    dependency, target_name
                ))
            })?;
            if self.is_executed(dependency) {
                self.log_debug(&format!(
                    "dependency '{}' already executed, skipping",
                    dependency
                ));
            } else {
                dep_target.execute(self)?;
            }
        }
        Ok(())
    }

    /// Run a single task, logging its description and duration.
    pub fn run_task(&mut self, task: &dyn Executable) -> GantryResult<i32> {
        let description = task.describe();
        self.log_debug(&format!("running task: {}", description));
        let started = Instant::now();
        let code = task.execute(self)?;
        self.log(&format!(
            "{} {}",
            description,
            format!("({}, result {})", format_duration(started.elapsed()), code).dimmed()
        ));
        Ok(code)
    }

    // --- console output -----------------------------------------------------

    pub fn log(&self, message: &str) {
        println!("{}{}", self.indent(), message);
    }

    /// Diagnostic output, only shown when the run is verbose.
    pub fn log_debug(&self, message: &str) {
        if self.verbose {
            println!("{}{}", self.indent(), message.dimmed());
        }
    }

    pub fn log_error(&self, message: &str) {
        eprintln!("{}{} {}", self.indent(), "error:".red().bold(), message);
    }

    pub(crate) fn log_target_started(&mut self, name: &str) {
        println!(
            "{}{} {}",
            self.indent(),
            "Executing target".bold(),
            name.cyan()
        );
        self.depth += 1;
    }

    pub(crate) fn log_target_finished(
        &mut self,
        name: &str,
        elapsed: Duration,
        result: &GantryResult<i32>,
    ) {
        self.depth = self.depth.saturating_sub(1);
        let timing = format!("({})", format_duration(elapsed));
        match result {
            Ok(_) => println!(
                "{}{} {} {}",
                self.indent(),
                "✓".green().bold(),
                format!("Target {} completed", name).green(),
                timing.dimmed()
            ),
            Err(_) => println!(
                "{}{} {} {}",
                self.indent(),
                "✗".red().bold(),
                format!("Target {} failed", name).red(),
                timing.dimmed()
            ),
        }
    }

    fn indent(&self) -> String {
        "  ".repeat(self.depth)
    }
}

/// Millisecond precision below one second, decimal seconds above.
fn format_duration(duration: Duration) -> String {
    if duration < Duration::from_secs(1) {
        format!("{}ms", duration.as_millis())
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::executable::CallbackTask;
    use crate::target::Target;

    #[test]
    fn marking_is_idempotent() {
        let tree = TargetTree::new();
        let mut ctx = BuildContext::new(&tree);

        assert!(!ctx.is_executed("compile"));
        ctx.mark_target_as_executed("compile");
        ctx.mark_target_as_executed("compile");
        assert!(ctx.is_executed("compile"));
    }

    #[test]
    fn properties_flow_between_set_and_get() {
        let tree = TargetTree::new();
        let mut ctx = BuildContext::new(&tree).with_properties(HashMap::from([(
            "version".to_string(),
            "1.2.0".to_string(),
        )]));

        assert_eq!(ctx.property("version"), Some("1.2.0"));
        ctx.set_property("version", "1.3.0");
        assert_eq!(ctx.property("version"), Some("1.3.0"));
        assert_eq!(ctx.property("missing"), None);
    }

    #[test]
    fn run_target_fails_for_unregistered_name() {
        let tree = TargetTree::new();
        let mut ctx = BuildContext::new(&tree);

        let err = ctx.run_target("ghost").unwrap_err();
        assert!(err.to_string().contains("not registered"));
    }

    #[test]
    fn direct_run_executes_even_when_already_marked() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tree = TargetTree::new();

        let log_clone = Rc::clone(&log);
        let task = CallbackTask::new("record", move |_ctx| {
            log_clone.borrow_mut().push("fetch".to_string());
            Ok(0)
        });
        tree.add_target(Target::new("fetch").with_task(task)).unwrap();
        tree.add_target(Target::new("build").depends_on(["fetch"]))
            .unwrap();

        let mut ctx = BuildContext::new(&tree);
        // First run reaches fetch through the dependency path and marks it.
        ctx.run_target("build").unwrap();
        assert_eq!(log.borrow().as_slice(), ["fetch"]);

        // A direct request bypasses the memo and runs it again.
        ctx.run_target("fetch").unwrap();
        assert_eq!(log.borrow().as_slice(), ["fetch", "fetch"]);
    }

    #[test]
    fn fresh_contexts_isolate_runs() {
        let count = Rc::new(RefCell::new(0));
        let mut tree = TargetTree::new();

        let count_clone = Rc::clone(&count);
        let task = CallbackTask::new("count", move |_ctx| {
            *count_clone.borrow_mut() += 1;
            Ok(0)
        });
        tree.add_target(Target::new("leaf").with_task(task)).unwrap();
        tree.add_target(Target::new("top").depends_on(["leaf"]))
            .unwrap();

        BuildContext::new(&tree).run_target("top").unwrap();
        BuildContext::new(&tree).run_target("top").unwrap();

        // The memo dies with its context; every run starts unexecuted.
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn durations_format_by_magnitude() {
        assert_eq!(format_duration(Duration::from_millis(12)), "12ms");
        assert_eq!(format_duration(Duration::from_millis(999)), "999ms");
        assert_eq!(format_duration(Duration::from_millis(2500)), "2.5s");
    }
}
