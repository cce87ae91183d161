//! High-level build session interface
//!
//! This module provides [`BuildSession`], the primary entry point consumed
//! by the run driver. A session owns the target tree plus run settings
//! (context properties, verbosity) and turns driver requests into engine
//! operations. Each `run_targets` call creates a fresh execution context,
//! so separate runs never share the executed-set memo.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gantry_core::session::BuildSession;
//! use gantry_core::target::Target;
//! use gantry_core::tasks::ShellTask;
//!
//! # fn example() -> gantry_core::types::GantryResult<()> {
//! let mut session = BuildSession::new();
//! session.add_target(Target::new("compile").with_task(ShellTask::new("cargo build")))?;
//! session.add_target(Target::new("test").depends_on(["compile"]))?;
//!
//! let result = session.run_targets(&["test".to_string()])?;
//! # Ok(())
//! # }
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use crate::configs::buildfile::{Buildfile, Command};
use crate::context::BuildContext;
use crate::graph::build_dependency_graph;
use crate::results::{GraphResult, PlanResult, TargetInfo, TargetListResult};
use crate::target::Target;
use crate::tasks::{ProcessTask, ShellTask};
use crate::tree::TargetTree;
use crate::types::{GantryError, GantryResult};

/// Owns the target tree and session-wide run settings.
pub struct BuildSession {
    tree: TargetTree,
    properties: HashMap<String, String>,
    verbose: bool,
}

// The tree holds targets with boxed closures, so Debug summarizes the
// session instead of deriving.
impl fmt::Debug for BuildSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildSession")
            .field("targets", &self.tree.len())
            .field("default_target", &self.tree.default_target())
            .field("properties", &self.properties)
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl Default for BuildSession {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildSession {
    pub fn new() -> Self {
        Self {
            tree: TargetTree::new(),
            properties: HashMap::new(),
            verbose: false,
        }
    }

    /// Build a session from a parsed buildfile: every target config becomes
    /// a registered target, commands become shell or process tasks, and the
    /// buildfile's properties seed the context of every run.
    pub fn from_buildfile(config: &Buildfile) -> GantryResult<Self> {
        let mut session = Self::new();
        if let Some(properties) = &config.properties {
            session.properties.extend(properties.clone());
        }

        for target_config in &config.targets {
            let mut target = Target::new(&target_config.name);
            if let Some(description) = &target_config.description {
                target = target.with_description(description);
            }
            if target_config.hidden.unwrap_or(false) {
                target = target.hidden();
            }
            if let Some(dependencies) = &target_config.dependencies {
                target = target.depends_on(dependencies.iter().cloned());
            }
            for command in target_config.commands.as_deref().unwrap_or(&[]) {
                target = match command {
                    Command::Single(line) => target.with_task(ShellTask::new(line)),
                    Command::Multiple(argv) => {
                        let (program, args) = argv.split_first().ok_or_else(|| {
                            GantryError::Config(format!(
                                "Target '{}' has an empty command list",
                                target_config.name
                            ))
                        })?;
                        target.with_task(ProcessTask::new(program).with_args(args.iter().cloned()))
                    }
                };
            }
            session.tree.add_target(target)?;
        }

        if let Some(default) = &config.default_target {
            session.tree.set_default_target(default)?;
        }
        Ok(session)
    }

    /// Load and parse a buildfile from disk.
    pub fn from_buildfile_path(path: &Path) -> GantryResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        let config = crate::configs::buildfile::parse_buildfile(&yaml)?;
        Self::from_buildfile(&config)
    }

    pub fn tree(&self) -> &TargetTree {
        &self.tree
    }

    pub fn add_target(&mut self, target: Target) -> GantryResult<()> {
        self.tree.add_target(target)
    }

    pub fn set_default_target(&mut self, name: &str) -> GantryResult<()> {
        self.tree.set_default_target(name)
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Run the requested targets in order through a fresh execution context.
    ///
    /// An empty selection falls back to the default target. Each requested
    /// name goes through the direct run entry, so requesting a target that
    /// already ran as a dependency earlier in the same call runs it again;
    /// the memo only suppresses repeats on the dependency path. The run
    /// aborts on the first fault, and the aggregate result is the last
    /// executed target's result code.
    pub fn run_targets(&self, names: &[String]) -> GantryResult<i32> {
        let selected: Vec<String> = if names.is_empty() {
            let default = self.tree.default_target().ok_or_else(|| {
                GantryError::Config(
                    "No targets requested and no default target is set".to_string(),
                )
            })?;
            vec![default.to_string()]
        } else {
            names.to_vec()
        };

        let mut ctx = BuildContext::new(&self.tree)
            .with_properties(self.properties.clone())
            .with_verbose(self.verbose);
        let mut result = 0;
        for name in &selected {
            result = ctx.run_target(name)?;
        }
        Ok(result)
    }

    /// List registered targets ordered by name. Hidden targets are filtered
    /// out unless requested.
    pub fn list_targets(&self, include_hidden: bool) -> TargetListResult {
        let default = self.tree.default_target();
        let mut targets: Vec<TargetInfo> = self
            .tree
            .targets()
            .filter(|target| include_hidden || !target.is_hidden())
            .map(|target| TargetInfo {
                name: target.name().to_string(),
                description: target.description().map(str::to_string),
                hidden: target.is_hidden(),
                dependencies: target.dependencies().to_vec(),
                is_default: default == Some(target.name()),
            })
            .collect();
        targets.sort_by(|a, b| a.name.cmp(&b.name));
        TargetListResult { targets }
    }

    /// Preview the order the engine would execute targets in for a run of
    /// `name`, without running anything.
    ///
    /// The traversal reproduces the engine exactly: each target is marked
    /// before its dependencies resolve, so diamonds collapse and cycles
    /// truncate the same way they do at run time.
    pub fn execution_plan(&self, name: &str) -> GantryResult<PlanResult> {
        let mut marked = HashSet::new();
        let mut order = Vec::new();
        self.plan_visit(name, &mut marked, &mut order)?;
        Ok(PlanResult {
            target: name.to_string(),
            order,
        })
    }

    fn plan_visit(
        &self,
        name: &str,
        marked: &mut HashSet<String>,
        order: &mut Vec<String>,
    ) -> GantryResult<()> {
        let target = self.tree.target(name)?;
        marked.insert(name.to_string());
        for dependency in target.dependencies() {
            if !self.tree.contains(dependency) {
                return Err(GantryError::Target(format!(
                    "Dependency '{}' of target '{}' is not registered",
                    dependency, name
                )));
            }
            if !marked.contains(dependency.as_str()) {
                self.plan_visit(dependency, marked, order)?;
            }
        }
        order.push(name.to_string());
        Ok(())
    }

    /// Diagnostic dependency graph with cycle listing; see
    /// [`build_dependency_graph`].
    pub fn dependency_graph(&self) -> GantryResult<GraphResult> {
        build_dependency_graph(&self.tree)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::configs::buildfile::parse_buildfile;
    use crate::executable::CallbackTask;

    fn recording_task(log: &Rc<RefCell<Vec<String>>>, label: &str, code: i32) -> CallbackTask {
        let log = Rc::clone(log);
        let label = label.to_string();
        CallbackTask::new(label.clone(), move |_ctx| {
            log.borrow_mut().push(label.clone());
            Ok(code)
        })
    }

    #[test]
    fn empty_selection_without_default_is_an_error() {
        let session = BuildSession::new();
        let err = session.run_targets(&[]).unwrap_err();
        assert!(matches!(err, GantryError::Config(_)));
    }

    #[test]
    fn empty_selection_falls_back_to_the_default_target() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut session = BuildSession::new();
        session
            .add_target(Target::new("release").with_task(recording_task(&log, "release", 0)))
            .unwrap();
        session.set_default_target("release").unwrap();

        session.run_targets(&[]).unwrap();
        assert_eq!(log.borrow().as_slice(), ["release"]);
    }

    #[test]
    fn aggregate_result_is_the_last_target_code() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut session = BuildSession::new();
        session
            .add_target(Target::new("first").with_task(recording_task(&log, "first", 4)))
            .unwrap();
        session
            .add_target(Target::new("second").with_task(recording_task(&log, "second", 9)))
            .unwrap();

        let result = session
            .run_targets(&["first".to_string(), "second".to_string()])
            .unwrap();
        assert_eq!(result, 9);
    }

    #[test]
    fn direct_requests_bypass_the_dependency_memo() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut session = BuildSession::new();
        session
            .add_target(Target::new("compile").with_task(recording_task(&log, "compile", 0)))
            .unwrap();
        session
            .add_target(Target::new("test").depends_on(["compile"]))
            .unwrap();

        // "compile" runs once on the dependency path, then again when
        // requested directly in the same call.
        session
            .run_targets(&["test".to_string(), "compile".to_string()])
            .unwrap();
        assert_eq!(log.borrow().as_slice(), ["compile", "compile"]);
    }

    #[test]
    fn listing_filters_hidden_and_orders_by_name() {
        let mut session = BuildSession::new();
        session
            .add_target(Target::new("web").with_description("Build the web bundle"))
            .unwrap();
        session.add_target(Target::new("clean").hidden()).unwrap();
        session.add_target(Target::new("api")).unwrap();
        session.set_default_target("api").unwrap();

        let visible = session.list_targets(false);
        let names: Vec<_> = visible.targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["api", "web"]);
        assert!(visible.targets[0].is_default);
        assert!(!visible.targets[1].is_default);

        let all = session.list_targets(true);
        let names: Vec<_> = all.targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["api", "clean", "web"]);
        assert!(all.targets[1].hidden);
    }

    #[test]
    fn plan_reproduces_engine_order_across_a_diamond() {
        let mut session = BuildSession::new();
        session.add_target(Target::new("d")).unwrap();
        session
            .add_target(Target::new("c").depends_on(["d"]))
            .unwrap();
        session
            .add_target(Target::new("b").depends_on(["d"]))
            .unwrap();
        session
            .add_target(Target::new("a").depends_on(["b", "c"]))
            .unwrap();

        let plan = session.execution_plan("a").unwrap();
        assert_eq!(plan.order, ["d", "b", "c", "a"]);
    }

    #[test]
    fn plan_truncates_cycles_like_the_engine() {
        let mut session = BuildSession::new();
        session
            .add_target(Target::new("a").depends_on(["b"]))
            .unwrap();
        session
            .add_target(Target::new("b").depends_on(["a"]))
            .unwrap();

        let plan = session.execution_plan("a").unwrap();
        assert_eq!(plan.order, ["b", "a"]);
    }

    #[test]
    fn plan_fails_on_unresolved_dependency() {
        let mut session = BuildSession::new();
        session
            .add_target(Target::new("deploy").depends_on(["package"]))
            .unwrap();

        let err = session.execution_plan("deploy").unwrap_err();
        assert!(err.to_string().contains("package"));
    }

    #[test]
    fn buildfile_targets_register_with_metadata() {
        let yaml = r#"
defaultTarget: package
properties:
  env: staging
targets:
  - name: clean
    hidden: true
    commands:
      - "true"
  - name: package
    description: Assemble the artifact
    dependencies: [clean]
"#;
        let session = BuildSession::from_buildfile(&parse_buildfile(yaml).unwrap()).unwrap();

        assert_eq!(session.tree().default_target(), Some("package"));
        let clean = session.tree().get("clean").unwrap();
        assert!(clean.is_hidden());
        assert_eq!(clean.task_count(), 1);
        let package = session.tree().get("package").unwrap();
        assert_eq!(package.dependencies(), ["clean"]);

        let result = session.run_targets(&["package".to_string()]).unwrap();
        assert_eq!(result, 0);
    }

    #[test]
    fn debug_output_summarizes_the_session() {
        let mut session = BuildSession::new();
        session.add_target(Target::new("build")).unwrap();
        session.set_default_target("build").unwrap();

        let rendered = format!("{:?}", session);
        assert!(rendered.contains("BuildSession"));
        assert!(rendered.contains("targets: 1"));
        assert!(rendered.contains("build"));
    }

    #[test]
    fn buildfile_with_unknown_default_target_is_rejected() {
        let yaml = r#"
defaultTarget: ghost
targets:
  - name: build
"#;
        let err = BuildSession::from_buildfile(&parse_buildfile(yaml).unwrap()).unwrap_err();
        assert!(matches!(err, GantryError::Config(_)));
    }

    #[test]
    fn buildfile_with_empty_command_list_is_rejected() {
        let yaml = r#"
targets:
  - name: build
    commands:
      - []
"#;
        let err = BuildSession::from_buildfile(&parse_buildfile(yaml).unwrap()).unwrap_err();
        assert!(err.to_string().contains("empty command"));
    }
}
