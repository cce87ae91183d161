//! Result types for session operations
//!
//! Plain data returned by [`BuildSession`](crate::session::BuildSession)
//! to the run driver, which owns all presentation.

use petgraph::graph::DiGraph;

/// Information about a single registered target.
#[derive(Debug, Clone)]
pub struct TargetInfo {
    pub name: String,
    pub description: Option<String>,
    pub hidden: bool,
    pub dependencies: Vec<String>,
    pub is_default: bool,
}

/// Result of listing registered targets, ordered by name.
#[derive(Debug)]
pub struct TargetListResult {
    pub targets: Vec<TargetInfo>,
}

/// Dry-run preview of the order the engine would execute targets in.
#[derive(Debug)]
pub struct PlanResult {
    pub target: String,
    /// Target names in execution order, dependencies first. The requested
    /// target is always last.
    pub order: Vec<String>,
}

/// Diagnostic view of the registered dependency graph.
///
/// Built for presentation only; the execution path never consults it.
#[derive(Debug)]
pub struct GraphResult {
    pub graph: DiGraph<String, ()>,
    /// Cycles the engine would silently truncate at run time, each listed
    /// as a sorted group of participating target names.
    pub cycles: Vec<Vec<String>>,
}
