//! The target registry ("target tree")
//!
//! Owns every registered target, keyed by name, plus the optional default
//! designation. The tree is populated during configuration and borrowed
//! immutably for the whole of a run, so targets cannot be reconfigured
//! while they execute. Per-run state (the executed-set memo) lives in
//! [`BuildContext`](crate::context::BuildContext), not here.

use std::collections::HashMap;

use crate::target::Target;
use crate::types::{GantryError, GantryResult};

/// Registry of all targets known to a build, keyed by name.
#[derive(Default)]
pub struct TargetTree {
    targets: HashMap<String, Target>,
    default_target: Option<String>,
}

impl TargetTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target by name. Duplicate names are rejected, never
    /// silently overwritten.
    pub fn add_target(&mut self, target: Target) -> GantryResult<()> {
        let name = target.name().to_string();
        if self.targets.contains_key(&name) {
            return Err(GantryError::Config(format!(
                "Target '{}' is already registered",
                name
            )));
        }
        self.targets.insert(name, target);
        Ok(())
    }

    /// Look up a target, or `None` if the name was never registered.
    pub fn get(&self, name: &str) -> Option<&Target> {
        self.targets.get(name)
    }

    /// Look up a target, failing on an unregistered name. Dependencies are
    /// bound late by name, so this is also the run-entry resolution step.
    pub fn target(&self, name: &str) -> GantryResult<&Target> {
        self.targets
            .get(name)
            .ok_or_else(|| GantryError::Target(format!("Target '{}' is not registered", name)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    /// Designate a registered target as the default. Last writer wins on
    /// repeat designation; an unregistered name is a configuration error.
    pub fn set_default_target(&mut self, name: &str) -> GantryResult<()> {
        if !self.targets.contains_key(name) {
            return Err(GantryError::Config(format!(
                "Cannot set default target '{}': it is not registered",
                name
            )));
        }
        self.default_target = Some(name.to_string());
        Ok(())
    }

    pub fn default_target(&self) -> Option<&str> {
        self.default_target.as_deref()
    }

    /// All registered targets, in no particular order.
    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.values()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
