//! Filesystem tasks
//!
//! Directory and file operations used by packaging-style targets. All
//! filesystem tasks return result code 0; anything that goes wrong is a
//! fault.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::context::BuildContext;
use crate::executable::Executable;
use crate::types::{GantryError, GantryResult};

/// Creates a directory, including missing parents. Existing directories
/// are left untouched.
pub struct CreateDirTask {
    path: PathBuf,
}

impl CreateDirTask {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Executable for CreateDirTask {
    fn describe(&self) -> String {
        format!("create directory {}", self.path.display())
    }

    fn execute(&self, _ctx: &mut BuildContext<'_>) -> GantryResult<i32> {
        fs::create_dir_all(&self.path)?;
        Ok(0)
    }
}

/// Deletes a directory tree. An absent directory is a no-op.
pub struct DeleteDirTask {
    path: PathBuf,
}

impl DeleteDirTask {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Executable for DeleteDirTask {
    fn describe(&self) -> String {
        format!("delete directory {}", self.path.display())
    }

    fn execute(&self, _ctx: &mut BuildContext<'_>) -> GantryResult<i32> {
        if self.path.exists() {
            fs::remove_dir_all(&self.path)?;
        }
        Ok(0)
    }
}

/// Copies a single file, creating the destination's parent directories.
pub struct CopyFileTask {
    from: PathBuf,
    to: PathBuf,
}

impl CopyFileTask {
    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl Executable for CopyFileTask {
    fn describe(&self) -> String {
        format!("copy {} to {}", self.from.display(), self.to.display())
    }

    fn execute(&self, _ctx: &mut BuildContext<'_>) -> GantryResult<i32> {
        if let Some(parent) = self.to.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&self.from, &self.to)?;
        Ok(0)
    }
}

/// Deletes files under a root directory whose root-relative paths match
/// any of the given glob patterns.
pub struct DeleteFilesTask {
    root: PathBuf,
    patterns: Vec<String>,
}

impl DeleteFilesTask {
    pub fn new<I, S>(root: impl Into<PathBuf>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root: root.into(),
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    fn build_matcher(&self) -> GantryResult<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                GantryError::Config(format!("Invalid glob pattern '{}': {}", pattern, e))
            })?;
            builder.add(glob);
        }
        builder
            .build()
            .map_err(|e| GantryError::Config(format!("Invalid glob set: {}", e)))
    }
}

impl Executable for DeleteFilesTask {
    fn describe(&self) -> String {
        format!(
            "delete files matching [{}] under {}",
            self.patterns.join(", "),
            self.root.display()
        )
    }

    fn execute(&self, ctx: &mut BuildContext<'_>) -> GantryResult<i32> {
        let matcher = self.build_matcher()?;
        if !self.root.exists() {
            return Ok(0);
        }

        let mut queue = VecDeque::new();
        queue.push_back(self.root.clone());
        while let Some(dir) = queue.pop_front() {
            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.is_dir() {
                    queue.push_back(path);
                } else if matcher.is_match(relative_to(&path, &self.root)) {
                    ctx.log_debug(&format!("deleting {}", path.display()));
                    fs::remove_file(&path)?;
                }
            }
        }
        Ok(0)
    }
}

fn relative_to<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}
