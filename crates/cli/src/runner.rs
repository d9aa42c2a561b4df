//! Install, build and measure a project with size-limit

use crate::error::{Error, Result};
use crate::git;
use crate::package_manager::PackageManager;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{info, warn};

/// Raw outcome of one `size-limit --json` invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Exit status of size-limit; non-zero when a limit is exceeded
    pub status: i32,
    /// Captured stdout, expected to be a JSON array
    pub output: String,
}

impl Measurement {
    pub fn limit_exceeded(&self) -> bool {
        self.status > 0
    }
}

/// Runs the install → build → measure → clean sequence in a project directory
#[derive(Debug, Clone)]
pub struct Runner {
    directory: PathBuf,
    manager: PackageManager,
    build_script: String,
    clean_script: Option<String>,
}

impl Runner {
    pub fn new(directory: impl Into<PathBuf>, manager: PackageManager) -> Self {
        Self {
            directory: directory.into(),
            manager,
            build_script: "build".to_string(),
            clean_script: None,
        }
    }

    pub fn with_build_script(mut self, script: impl Into<String>) -> Self {
        self.build_script = script.into();
        self
    }

    pub fn with_clean_script(mut self, script: Option<String>) -> Self {
        self.clean_script = script.filter(|s| !s.is_empty());
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn manager(&self) -> PackageManager {
        self.manager
    }

    /// Measure the project, optionally after switching to `branch`
    pub fn measure(&self, branch: Option<&str>) -> Result<Measurement> {
        if let Some(branch) = branch {
            info!("Switching to branch {}", branch);
            if let Err(e) = git::fetch_branch(&self.directory, branch) {
                warn!("Fetch failed: {}", e);
            }
            git::checkout_branch(&self.directory, branch)?;
        }

        let manager = self.manager.command();

        run_step(&self.directory, manager, &["install"])?;
        run_step(&self.directory, manager, &["run", self.build_script.as_str()])?;

        let measurement = run_captured(&self.directory, "npx", &["size-limit", "--json"])?;

        if let Some(clean) = &self.clean_script {
            run_step(&self.directory, manager, &["run", clean.as_str()])?;
        }

        Ok(measurement)
    }
}

fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run a command with inherited output; a non-zero exit is an error
pub fn run_step(directory: &Path, program: &str, args: &[&str]) -> Result<()> {
    let line = command_line(program, args);
    info!("Running `{}`", line);

    let status = Command::new(program)
        .args(args)
        .current_dir(directory)
        .status()
        .map_err(|e| Error::Io(format!("Failed to start `{}`: {}", line, e)))?;

    if !status.success() {
        return Err(Error::Command {
            command: line,
            message: format!("exited with {}", status),
        });
    }

    Ok(())
}

/// Run a command capturing stdout; the exit code is returned rather than checked
pub fn run_captured(directory: &Path, program: &str, args: &[&str]) -> Result<Measurement> {
    let line = command_line(program, args);
    info!("Running `{}`", line);

    let output = Command::new(program)
        .args(args)
        .current_dir(directory)
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| Error::Io(format!("Failed to start `{}`: {}", line, e)))?;

    Ok(Measurement {
        status: output.status.code().unwrap_or(1),
        output: String::from_utf8_lossy(&output.stdout).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_line() {
        assert_eq!(
            command_line("npx", &["size-limit", "--json"]),
            "npx size-limit --json"
        );
    }

    #[test]
    fn test_runner_config() {
        let runner = Runner::new("/tmp/project", PackageManager::Pnpm)
            .with_build_script("bundle")
            .with_clean_script(Some(String::new()));

        assert_eq!(runner.manager(), PackageManager::Pnpm);
        assert_eq!(runner.build_script, "bundle");
        assert_eq!(runner.clean_script, None);
        assert_eq!(runner.directory(), Path::new("/tmp/project"));
    }

    #[test]
    fn test_limit_exceeded() {
        let ok = Measurement {
            status: 0,
            output: "[]".to_string(),
        };
        let exceeded = Measurement {
            status: 1,
            output: "[]".to_string(),
        };
        assert!(!ok.limit_exceeded());
        assert!(exceeded.limit_exceeded());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_captured_keeps_status_and_stdout() {
        let dir = TempDir::new().unwrap();
        let measurement = run_captured(
            dir.path(),
            "sh",
            &["-c", r#"echo '[{"name":"a","size":1}]'; exit 3"#],
        )
        .unwrap();

        assert_eq!(measurement.status, 3);
        assert_eq!(measurement.output.trim(), r#"[{"name":"a","size":1}]"#);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_step_fails_on_non_zero_exit() {
        let dir = TempDir::new().unwrap();
        assert!(run_step(dir.path(), "sh", &["-c", "exit 0"]).is_ok());

        let err = run_step(dir.path(), "sh", &["-c", "exit 2"]).unwrap_err();
        assert!(matches!(err, Error::Command { .. }));
    }

    #[test]
    fn test_run_step_missing_program() {
        let dir = TempDir::new().unwrap();
        let err = run_step(dir.path(), "definitely-not-a-real-program", &[]).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
