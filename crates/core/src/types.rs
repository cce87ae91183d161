use thiserror::Error;

/// The main error type for Gantry operations
#[derive(Debug, Error)]
pub enum GantryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Build-script authoring mistakes: duplicate registrations, an action
    /// set twice, a missing default target. Never recoverable within a run.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Name-resolution failures: an unknown target at the run entry or an
    /// unresolved dependency name. Dependencies are bound late, so these
    /// surface at execution time.
    #[error("Target error: {0}")]
    Target(String),

    /// Faults raised while running an action or task. Propagated unchanged
    /// through the dependency chain; nothing is retried.
    #[error("Task error: {0}")]
    Task(String),
}

/// Result type alias for Gantry operations
pub type GantryResult<T> = Result<T, GantryError>;
