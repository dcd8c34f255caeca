//! Model invocation: the boundary between the pipeline and the language model.
//!
//! All model interaction goes through [`ModelInvoker`] — no other module
//! talks to a model directly. The pipeline treats the invoker as a
//! single-shot call: no retries here, and none in the orchestrator either.
//! If a deployment wants retry or pooling policy, it belongs inside an
//! invoker implementation, behind this same seam.
//!
//! The default implementation, [`OllamaInvoker`], pipes the prompt over
//! stdin to a local `ollama run <model>` subprocess and reads stdout back.
//! One heavyweight local process serves one request at a time, which is why
//! the batch defaults to `concurrency = 1`.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Why a model invocation did not produce a response.
#[derive(Debug, Clone, Error)]
pub enum InvokeError {
    /// The model process could not be started at all.
    #[error("could not launch '{program}': {detail}")]
    Launch { program: String, detail: String },

    /// The process ran but exited unsuccessfully; stderr is carried as detail.
    #[error("model process exited with {status}: {detail}")]
    Exited { status: String, detail: String },

    /// The call exceeded the configured deadline. The child is killed.
    #[error("model invocation timed out after {secs}s")]
    TimedOut { secs: u64 },
}

/// Sends one prompt to a language model and returns the raw response text.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Invoke the model once with `prompt`. Blocking for the duration of the
    /// external call is expected; cancellation safety is the implementation's
    /// concern.
    async fn invoke(&self, prompt: &str) -> Result<String, InvokeError>;
}

/// Default invoker: `ollama run <model>` with the prompt piped over stdin.
#[derive(Debug, Clone)]
pub struct OllamaInvoker {
    binary: PathBuf,
    model: String,
    timeout: Option<Duration>,
}

impl OllamaInvoker {
    /// Invoker for `model` using `ollama` from `PATH`, no deadline.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            binary: PathBuf::from("ollama"),
            model: model.into(),
            timeout: None,
        }
    }

    /// Use a specific `ollama` binary instead of resolving from `PATH`.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Kill the call (and the child process) after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn run(&self, prompt: &str) -> Result<String, InvokeError> {
        let program = self.binary.display().to_string();

        let mut child = Command::new(&self.binary)
            .arg("run")
            .arg(&self.model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // A timed-out or cancelled call must not leave the model process
            // running behind us.
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| InvokeError::Launch {
                program: program.clone(),
                detail: if e.kind() == std::io::ErrorKind::NotFound {
                    "command not found — is Ollama installed and in PATH?".to_string()
                } else {
                    e.to_string()
                },
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| InvokeError::Launch {
            program: program.clone(),
            detail: "child stdin unavailable".into(),
        })?;
        stdin
            .write_all(prompt.as_bytes())
            .await
            .map_err(|e| InvokeError::Launch {
                program: program.clone(),
                detail: format!("failed to write prompt to stdin: {e}"),
            })?;
        // Close stdin so the model knows the prompt is complete.
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| InvokeError::Launch {
                program,
                detail: e.to_string(),
            })?;

        if output.status.success() {
            let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
            debug!(bytes = text.len(), model = %self.model, "model responded");
            Ok(text)
        } else {
            Err(InvokeError::Exited {
                status: output.status.to_string(),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

#[async_trait]
impl ModelInvoker for OllamaInvoker {
    async fn invoke(&self, prompt: &str) -> Result<String, InvokeError> {
        match self.timeout {
            None => self.run(prompt).await,
            Some(deadline) => match tokio::time::timeout(deadline, self.run(prompt)).await {
                Ok(result) => result,
                // Dropping the in-flight future drops the child, which kills
                // it (kill_on_drop).
                Err(_) => Err(InvokeError::TimedOut {
                    secs: deadline.as_secs(),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_a_launch_error() {
        let invoker = OllamaInvoker::new("mistral").with_binary("/no/such/ollama-binary");
        let err = invoker.invoke("hello").await.unwrap_err();
        match err {
            InvokeError::Launch { detail, .. } => assert!(!detail.is_empty()),
            other => panic!("expected Launch, got {other:?}"),
        }
    }

    /// Stand-in for the model binary: a shell script that ignores its
    /// `run <model>` arguments, drains stdin, and runs `body`.
    #[cfg(unix)]
    fn fake_model(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.path().join("fake-ollama");
        std::fs::write(&path, format!("#!/bin/sh\ncat >/dev/null\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_process_output_is_returned_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let invoker = OllamaInvoker::new("mistral")
            .with_binary(fake_model(&dir, "printf '1. Name: Jane \\n'"));
        let out = invoker.invoke("prompt").await.unwrap();
        assert_eq!(out, "1. Name: Jane");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_carries_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let invoker = OllamaInvoker::new("mistral")
            .with_binary(fake_model(&dir, "echo 'model blew up' >&2\nexit 3"));
        let err = invoker.invoke("prompt").await.unwrap_err();
        match err {
            InvokeError::Exited { status, detail } => {
                assert!(status.contains('3'), "got status {status}");
                assert_eq!(detail, "model blew up");
            }
            other => panic!("expected Exited, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timeout_surfaces_as_timed_out() {
        let dir = tempfile::tempdir().unwrap();
        let invoker = OllamaInvoker::new("mistral")
            .with_binary(fake_model(&dir, "sleep 30"))
            .with_timeout(Duration::from_millis(100));
        let err = invoker.invoke("prompt").await.unwrap_err();
        assert!(matches!(err, InvokeError::TimedOut { .. }), "got {err:?}");
    }
}
