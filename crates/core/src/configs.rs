//! Configuration parsing
//!
//! Declarative buildfile support: parsing `gantry.yml` and exposing its
//! JSON schema for editor tooling.

pub mod buildfile;

pub use buildfile::{buildfile_schema, parse_buildfile, Buildfile, Command, TargetConfig};
