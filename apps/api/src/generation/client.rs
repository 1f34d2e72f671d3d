//! Generation client: the single point of entry for text generation.
//!
//! The default backend pipes the prompt into a local command-line model runner
//! (`ollama run <model>` unless configured otherwise) and returns its stdout.
//! One attempt per request; there is no retry.

use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::generation::prompts::build_prompt;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),

    #[error("generation process exited with {}: {stderr}", describe_status(.status))]
    Process { status: Option<i32>, stderr: String },

    #[error("failed to run generation process: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// The generation trait. Implement this to swap backends without touching
/// the handlers. Carried in `AppState` as `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<String, GenerationError>;
}

/// Runs an external command per request, prompt on stdin, output on stdout.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandGenerator {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.generation_command.clone(),
            config.generation_args.clone(),
            config.generation_timeout,
        )
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Sends `prompt` to the runner and returns its stdout (lossy UTF-8).
    pub async fn run(&self, prompt: &str) -> Result<String, GenerationError> {
        let started = Instant::now();

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        // Written from its own task so a large prompt cannot deadlock against
        // a full stdout pipe.
        let mut stdin = child.stdin.take().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::BrokenPipe, "child stdin unavailable")
        })?;
        let prompt = prompt.to_owned();
        let writer = tokio::spawn(async move {
            let result = stdin.write_all(prompt.as_bytes()).await;
            drop(stdin);
            result
        });

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => {
                // Dropping the wait future drops the child, which kills it.
                writer.abort();
                warn!(
                    "Generation command '{}' exceeded {:?}",
                    self.command_line(),
                    self.timeout
                );
                return Err(GenerationError::Timeout(self.timeout));
            }
        };

        match writer.await {
            Ok(Ok(())) => {}
            // Runner exited without draining stdin; its exit status decides the outcome.
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                debug!("Generation process closed stdin early")
            }
            Ok(Err(e)) => return Err(GenerationError::Io(e)),
            Err(e) => {
                return Err(GenerationError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    e.to_string(),
                )))
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!("Generation process failed ({}): {}", output.status, stderr);
            return Err(GenerationError::Process {
                status: output.status.code(),
                stderr,
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        info!(
            "Generation finished in {:.2?} ({} chars)",
            started.elapsed(),
            text.chars().count()
        );
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for CommandGenerator {
    async fn generate(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<String, GenerationError> {
        let prompt = build_prompt(resume_text, job_description);
        self.run(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell(script: &str, timeout: Duration) -> CommandGenerator {
        CommandGenerator::new("sh", vec!["-c".to_string(), script.to_string()], timeout)
    }

    #[tokio::test]
    async fn test_prompt_goes_through_stdin() {
        let echo = shell("cat", Duration::from_secs(5));
        let out = echo.run("hello runner").await.unwrap();
        assert_eq!(out, "hello runner");
    }

    #[tokio::test]
    async fn test_generate_builds_prompt() {
        let echo = shell("cat", Duration::from_secs(5));
        let out = echo.generate("my resume", "the job").await.unwrap();
        assert_eq!(out, build_prompt("my resume", "the job"));
    }

    #[tokio::test]
    async fn test_large_prompt_does_not_deadlock() {
        let echo = shell("cat", Duration::from_secs(10));
        let prompt = "x".repeat(512 * 1024);
        let out = echo.run(&prompt).await.unwrap();
        assert_eq!(out.len(), prompt.len());
    }

    #[tokio::test]
    async fn test_non_zero_exit_carries_stderr() {
        let failing = shell("echo 'model llama3 not found' >&2; exit 3", Duration::from_secs(5));
        let err = failing.run("prompt").await.unwrap_err();
        match &err {
            GenerationError::Process { status, stderr } => {
                assert_eq!(*status, Some(3));
                assert_eq!(stderr, "model llama3 not found");
            }
            other => panic!("expected Process error, got {other:?}"),
        }
        assert!(err.to_string().contains("model llama3 not found"));
    }

    #[tokio::test]
    async fn test_timeout() {
        let slow = shell("sleep 5", Duration::from_millis(200));
        let err = slow.run("prompt").await.unwrap_err();
        assert!(matches!(err, GenerationError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_missing_program_is_io_error() {
        let missing = CommandGenerator::new(
            "definitely-not-a-real-generation-runner",
            vec![],
            Duration::from_secs(1),
        );
        let err = missing.run("prompt").await.unwrap_err();
        assert!(matches!(err, GenerationError::Io(_)));
    }

    #[test]
    fn test_command_line() {
        let generator = CommandGenerator::new(
            "ollama",
            vec!["run".to_string(), "llama3".to_string()],
            Duration::from_secs(120),
        );
        assert_eq!(generator.command_line(), "ollama run llama3");
    }
}
