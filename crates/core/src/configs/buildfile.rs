use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::GantryResult;

/// A command attached to a target: either a single shell string or an
/// argv-style list.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Command {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TargetConfig {
    pub name: String,
    pub description: Option<String>,
    /// Hidden targets are excluded from `gantry list` but stay executable.
    pub hidden: Option<bool>,
    pub dependencies: Option<Vec<String>>,
    /// Commands run in order after the target's dependencies.
    pub commands: Option<Vec<Command>>,
}

#[derive(Deserialize, Serialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Buildfile {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Target run when `gantry run` is invoked with no target names.
    pub default_target: Option<String>,
    /// Properties seeded into the execution context for every run.
    pub properties: Option<HashMap<String, String>>,
    pub targets: Vec<TargetConfig>,
}

pub fn parse_buildfile(yaml_str: &str) -> GantryResult<Buildfile> {
    let config: Buildfile = serde_yaml::from_str(yaml_str)?;
    Ok(config)
}

/// JSON schema of the buildfile format, for `gantry schema` and editor
/// integration.
pub fn buildfile_schema() -> schemars::Schema {
    schemars::schema_for!(Buildfile)
}
