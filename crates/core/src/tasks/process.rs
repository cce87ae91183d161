//! Process and shell command tasks
//!
//! Both task types export the context's properties to the child process as
//! `GANTRY_*` environment variables, so build scripts can pass values from
//! earlier targets into commands without templating.

use std::path::PathBuf;
use std::process::Command;

use crate::context::BuildContext;
use crate::executable::Executable;
use crate::types::{GantryError, GantryResult};

/// Runs a program with arguments.
pub struct ProcessTask {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    env: Vec<(String, String)>,
    ignore_exit_code: bool,
}

impl ProcessTask {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            env: Vec::new(),
            ignore_exit_code: false,
        }
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Treat a nonzero exit status as the task's result code instead of a
    /// fault.
    pub fn ignore_exit_code(mut self) -> Self {
        self.ignore_exit_code = true;
        self
    }
}

impl Executable for ProcessTask {
    fn describe(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    fn execute(&self, ctx: &mut BuildContext<'_>) -> GantryResult<i32> {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        for (key, value) in &self.env {
            command.env(key, value);
        }
        run_command(ctx, command, &self.describe(), self.ignore_exit_code)
    }
}

/// Runs a single command string through `sh -c`.
pub struct ShellTask {
    command: String,
    working_dir: Option<PathBuf>,
    ignore_exit_code: bool,
}

impl ShellTask {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            working_dir: None,
            ignore_exit_code: false,
        }
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Treat a nonzero exit status as the task's result code instead of a
    /// fault.
    pub fn ignore_exit_code(mut self) -> Self {
        self.ignore_exit_code = true;
        self
    }
}

impl Executable for ShellTask {
    fn describe(&self) -> String {
        self.command.clone()
    }

    fn execute(&self, ctx: &mut BuildContext<'_>) -> GantryResult<i32> {
        let mut command = Command::new("sh");
        command.arg("-c").arg(&self.command);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        run_command(ctx, command, &self.command, self.ignore_exit_code)
    }
}

/// Common spawn-and-wait path for process and shell tasks.
///
/// Spawn failure is always a fault. A nonzero exit status is a fault
/// unless the caller opted into `ignore_exit_code`, in which case the exit
/// code becomes the task's result code.
fn run_command(
    ctx: &BuildContext<'_>,
    mut command: Command,
    label: &str,
    ignore_exit_code: bool,
) -> GantryResult<i32> {
    for (key, value) in ctx.properties() {
        command.env(format!("GANTRY_{}", key.to_uppercase()), value);
    }

    let status = command
        .status()
        .map_err(|e| GantryError::Task(format!("Failed to execute command '{}': {}", label, e)))?;

    let code = status.code().unwrap_or(-1);
    if !status.success() && !ignore_exit_code {
        return Err(GantryError::Task(format!(
            "Command '{}' failed with exit code: {}",
            label, code
        )));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TargetTree;

    #[test]
    fn shell_task_returns_zero_on_success() {
        let tree = TargetTree::new();
        let mut ctx = BuildContext::new(&tree);

        let code = ShellTask::new("true").execute(&mut ctx).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn nonzero_exit_is_a_fault_by_default() {
        let tree = TargetTree::new();
        let mut ctx = BuildContext::new(&tree);

        let err = ShellTask::new("exit 7").execute(&mut ctx).unwrap_err();
        assert!(err.to_string().contains("exit code: 7"));
    }

    #[test]
    fn ignored_exit_code_becomes_the_result() {
        let tree = TargetTree::new();
        let mut ctx = BuildContext::new(&tree);

        let code = ShellTask::new("exit 7")
            .ignore_exit_code()
            .execute(&mut ctx)
            .unwrap();
        assert_eq!(code, 7);
    }

    #[test]
    fn spawn_failure_is_a_fault() {
        let tree = TargetTree::new();
        let mut ctx = BuildContext::new(&tree);

        let err = ProcessTask::new("gantry-no-such-program-zz")
            .execute(&mut ctx)
            .unwrap_err();
        assert!(err.to_string().contains("Failed to execute"));
    }

    #[test]
    fn properties_are_exported_to_the_child_environment() {
        let tree = TargetTree::new();
        let mut ctx = BuildContext::new(&tree);
        ctx.set_property("version", "1.2.0");

        let code = ShellTask::new("test \"$GANTRY_VERSION\" = 1.2.0")
            .execute(&mut ctx)
            .unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn process_task_runs_in_the_given_directory() {
        let tree = TargetTree::new();
        let mut ctx = BuildContext::new(&tree);
        let dir = tempfile::tempdir().unwrap();

        let code = ProcessTask::new("sh")
            .with_args(["-c", "test \"$(pwd)\" = \"$GANTRY_EXPECTED\""])
            .with_env("GANTRY_EXPECTED", dir.path().to_string_lossy())
            .in_dir(dir.path())
            .execute(&mut ctx)
            .unwrap();
        assert_eq!(code, 0);
    }
}
