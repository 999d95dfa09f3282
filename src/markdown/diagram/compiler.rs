//! Diagram compilers.
//!
//! [`MermaidCli`] drives the `mmdc` command line tool; tests plug in their
//! own [`DiagramCompiler`].

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::theme::Palette;
use crate::debug;

#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("No diagram content provided")]
    Empty,
    #[error("`{0}` not found in PATH")]
    CompilerMissing(String),
    /// The compiler rejected the diagram source.
    #[error("{0}")]
    Compile(String),
    #[error("Diagram compilation timed out after {} s", .0.as_secs())]
    Timeout(Duration),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Compiles diagram source text into SVG markup.
pub trait DiagramCompiler: Send + Sync + 'static {
    /// `id` is unique per attempt and becomes the SVG element id.
    fn compile(
        &self,
        id: &str,
        source: &str,
        palette: &'static Palette,
    ) -> impl Future<Output = Result<String, DiagramError>> + Send;
}

/// Fresh id for a render attempt: `mermaid-<pid>-<n>`.
pub fn next_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("mermaid-{}-{}", std::process::id(), n)
}

// =============================================================================
// Mermaid CLI
// =============================================================================

/// `mmdc` (mermaid-cli) wrapper.
///
/// The program is looked up on every attempt, so a missing binary shows up
/// as a failed diagram instead of aborting the document.
#[derive(Debug, Clone)]
pub struct MermaidCli {
    command: String,
}

impl MermaidCli {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Resolve the command through `PATH` (absolute paths are accepted as-is).
    pub fn locate(&self) -> Result<PathBuf, DiagramError> {
        which::which(&self.command).map_err(|_| DiagramError::CompilerMissing(self.command.clone()))
    }

    async fn run(
        program: &Path,
        id: &str,
        source: &str,
        config: &Path,
    ) -> Result<String, DiagramError> {
        let mut child = Command::new(program)
            .args(["--quiet", "--input", "-", "--output", "-", "--outputFormat", "svg"])
            .arg("--svgId")
            .arg(id)
            .arg("--configFile")
            .arg(config)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(source.as_bytes()).await?;
            // Close stdin so mmdc sees EOF.
            drop(stdin);
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DiagramError::Compile(compile_message(&stderr, output.status)));
        }

        let svg = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if svg.is_empty() {
            return Err(DiagramError::Compile("compiler produced no output".into()));
        }
        Ok(svg)
    }
}

impl DiagramCompiler for MermaidCli {
    async fn compile(
        &self,
        id: &str,
        source: &str,
        palette: &'static Palette,
    ) -> Result<String, DiagramError> {
        let program = self.locate()?;

        // Removed on drop, including when the attempt is cancelled mid-compile.
        let workdir = tempfile::Builder::new().prefix("folio-mermaid-").tempdir()?;
        let config = workdir.path().join(format!("{id}.config.json"));
        tokio::fs::write(&config, palette.to_mermaid_config().to_string()).await?;

        debug!("diagram"; "{} compiling {}", program.display(), id);
        let result = Self::run(&program, id, source, &config).await;

        if let Err(e) = workdir.close() {
            debug!("diagram"; "failed to remove {}: {}", config.display(), e);
        }
        result
    }
}

/// First meaningful stderr line, or the exit status when stderr is silent.
fn compile_message(stderr: &str, status: std::process::ExitStatus) -> String {
    stderr
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("compiler exited with {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = next_id();
        let b = next_id();
        assert_ne!(a, b);
        assert!(a.starts_with("mermaid-"));
    }

    #[test]
    fn test_missing_program() {
        let err = MermaidCli::new("folio-no-such-diagram-compiler")
            .locate()
            .unwrap_err();
        assert!(matches!(err, DiagramError::CompilerMissing(_)));
        assert!(err.to_string().contains("folio-no-such-diagram-compiler"));
    }

    #[tokio::test]
    async fn test_missing_program_fails_the_attempt() {
        let cli = MermaidCli::new("folio-no-such-diagram-compiler");
        let err = cli
            .compile(&next_id(), "graph TD; A-->B", &Palette::LIGHT)
            .await
            .unwrap_err();
        assert!(matches!(err, DiagramError::CompilerMissing(_)));
    }

    /// Executable shell script standing in for `mmdc`.
    #[cfg(unix)]
    fn fake_program(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("fake-mmdc");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    fn config_files(id: &str) -> Vec<PathBuf> {
        let name = format!("{id}.config.json");
        std::fs::read_dir(std::env::temp_dir())
            .unwrap()
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .map(|dir| dir.join(&name))
            .filter(|path| path.exists())
            .collect()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_cancelled_attempt_removes_config() {
        let dir = tempfile::tempdir().unwrap();
        let cli = MermaidCli::new(fake_program(dir.path(), "sleep 5").to_string_lossy());
        let id = next_id();

        let attempt = cli.compile(&id, "graph TD; A-->B", &Palette::LIGHT);
        let result = tokio::time::timeout(Duration::from_millis(300), attempt).await;

        assert!(result.is_err());
        assert!(config_files(&id).is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_attempt_removes_config() {
        let dir = tempfile::tempdir().unwrap();
        let script = "cat > /dev/null\necho 'Parse error on line 1' >&2\nexit 1";
        let program = fake_program(dir.path(), script);
        let cli = MermaidCli::new(program.to_string_lossy());
        let id = next_id();

        let err = cli
            .compile(&id, "graph TD; A-->", &Palette::DARK)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Parse error on line 1");
        assert!(config_files(&id).is_empty());
    }

    #[test]
    fn test_timeout_message() {
        let err = DiagramError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "Diagram compilation timed out after 30 s");
    }

    #[cfg(unix)]
    #[test]
    fn test_compile_message_prefers_stderr() {
        use std::os::unix::process::ExitStatusExt;
        let status = std::process::ExitStatus::from_raw(1 << 8);
        assert_eq!(
            compile_message("\n  Parse error on line 2\nmore", status),
            "Parse error on line 2"
        );
        assert!(compile_message("", status).starts_with("compiler exited with"));
    }
}
