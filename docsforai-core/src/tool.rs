//! External tool execution.
//!
//! Adapters never spawn processes directly; they describe an invocation and hand it to a
//! [`ToolRunner`]. Production code uses [`SystemToolRunner`]; tests use `MockToolRunner`.
//! Invocations block until the process exits. There is no timeout and no retry.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use tracing::{debug, error, info};

use crate::error::DocsError;
use crate::framework::Framework;

/// A fully described process launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl ToolInvocation {
    pub fn new(program: impl Into<String>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Seam for running external documentation generators.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait ToolRunner: Send + Sync {
    /// Run to completion. `Err` only when the process could not be launched.
    fn run(&self, invocation: &ToolInvocation) -> io::Result<ToolOutput>;
}

/// Runs tools with `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemToolRunner;

impl ToolRunner for SystemToolRunner {
    fn run(&self, invocation: &ToolInvocation) -> io::Result<ToolOutput> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .output()?;
        Ok(ToolOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Runs `invocation` and maps launch errors and non-zero exits to
/// [`DocsError::ExternalToolFailure`]. Output is logged at debug level only.
pub fn run_tool(
    runner: &dyn ToolRunner,
    framework: Framework,
    invocation: &ToolInvocation,
) -> Result<ToolOutput, DocsError> {
    info!(
        framework = %framework,
        command = %invocation.command_line(),
        cwd = %invocation.cwd.display(),
        "Running external tool"
    );
    let output = match runner.run(invocation) {
        Ok(output) => output,
        Err(e) => {
            error!(
                framework = %framework,
                tool = %invocation.program,
                error = %e,
                "Failed to launch external tool"
            );
            return Err(DocsError::ExternalToolFailure {
                framework,
                tool: invocation.program.clone(),
                code: None,
            });
        }
    };

    debug!(tool = %invocation.program, stdout = %output.stdout, "Tool stdout");
    debug!(tool = %invocation.program, stderr = %output.stderr, "Tool stderr");

    if !output.success {
        error!(
            framework = %framework,
            tool = %invocation.program,
            code = ?output.code,
            "External tool exited with failure"
        );
        return Err(DocsError::ExternalToolFailure {
            framework,
            tool: invocation.program.clone(),
            code: output.code,
        });
    }
    Ok(output)
}
