//! Flow generation from natural language.
//!
//! A [`FlowGenerator`] turns a prompt into raw document text. Generators are
//! external collaborators and fail in all the usual ways: they cannot be
//! started, time out, exit non-zero, or answer with something that is not a
//! flow. [`generate_flow`] absorbs every one of those failures and always
//! returns an enterable [`Flow`], falling back to [`Flow::fallback`].

use std::{
    future::Future,
    io,
    process::{ExitStatus, Stdio},
    time::Duration,
};

use kioskflow_proto::{Flow, ParseError};
use thiserror::Error;
use tokio::{io::AsyncWriteExt, process::Command};

use crate::config::DEFAULT_GENERATOR_TIMEOUT;

/// Instructions sent ahead of every prompt.
pub const GENERATOR_INSTRUCTIONS: &str = r#"You generate kiosk flow documents as JSON.

Schema:
  Flow      { flow_id, location_id?, start_screen_id, theme?, screens: { <id>: Screen } }
  Screen    { id, title, subtitle?, type: "menu" | "form" | "success" | "info", components: [Component] }
  Component { id, type: "button", label, action: "goto_screen" | "enqueue" | "restart", target?, primary? }
            { id, type: "input_text" | "input_cpf", placeholder?, validation?: { regex, message } }
            { id, type: "text_block", value }
            { id, type: "image" }

Rules:
  1. Every screen id equals its key in "screens".
  2. Every button target is a key in "screens"; restart buttons have no target.
  3. Final screens offer a restart button.
  4. Use input_cpf for identification steps.
  5. Answer with the JSON object only."#;

/// Failure of a flow generator.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The generator process could not be started.
    #[error("failed to start generator '{program}': {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Talking to the generator process failed.
    #[error("generator I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The generator did not answer in time.
    #[error("generator timed out after {0:?}")]
    Timeout(Duration),

    /// The generator exited unsuccessfully.
    #[error("generator exited with {status}: {stderr}")]
    Failed {
        /// Exit status.
        status: ExitStatus,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The generator answered with nothing.
    #[error("generator returned no output")]
    EmptyOutput,

    /// The answer is not an enterable flow.
    #[error("generator output is not a valid flow: {0}")]
    Invalid(#[from] ParseError),
}

/// Source of generated flow documents.
pub trait FlowGenerator: Send + Sync {
    /// Produce raw document text for `prompt`.
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, GeneratorError>> + Send;
}

/// Generator backed by an external command.
///
/// The command receives [`GENERATOR_INSTRUCTIONS`] and the prompt on stdin and
/// must print the document on stdout.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandGenerator {
    /// Run `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), args: Vec::new(), timeout: DEFAULT_GENERATOR_TIMEOUT }
    }

    /// Split a whitespace-separated command line. `None` if it is blank.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let program = words.next()?;
        Some(Self::new(program).with_args(words))
    }

    /// Append arguments.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Bound each invocation by `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run(&self, prompt: &str) -> Result<String, GeneratorError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| GeneratorError::Spawn { program: self.program.clone(), source })?;

        if let Some(mut stdin) = child.stdin.take() {
            let request = format!("{GENERATOR_INSTRUCTIONS}\n\nRequest:\n{prompt}\n");
            stdin.write_all(request.as_bytes()).await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(GeneratorError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        if text.trim().is_empty() {
            return Err(GeneratorError::EmptyOutput);
        }
        Ok(text)
    }
}

impl FlowGenerator for CommandGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        tracing::debug!(program = %self.program, "invoking flow generator");
        tokio::time::timeout(self.timeout, self.run(prompt))
            .await
            .map_err(|_| GeneratorError::Timeout(self.timeout))?
    }
}

/// Outcome of [`generate_flow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFlow {
    /// Enterable flow: the generated one, or the fallback.
    pub flow: Flow,
    /// Why the fallback was used. `None` if generation succeeded.
    pub fallback_reason: Option<String>,
}

/// Generate a flow for `prompt`, falling back to the built-in flow on any
/// failure.
pub async fn generate_flow<G: FlowGenerator>(generator: &G, prompt: &str) -> GeneratedFlow {
    let attempt = async {
        let raw = generator.generate(prompt).await?;
        Ok::<_, GeneratorError>(Flow::parse(strip_code_fence(&raw))?)
    };

    match attempt.await {
        Ok(flow) => {
            tracing::info!(flow = %flow.flow_id, screens = flow.screen_count(), "generated flow");
            GeneratedFlow { flow, fallback_reason: None }
        },
        Err(err) => {
            tracing::warn!("flow generation failed, using built-in flow: {err}");
            GeneratedFlow { flow: Flow::fallback(), fallback_reason: Some(err.to_string()) }
        },
    }
}

/// Remove a surrounding markdown code fence (```` ```json ... ``` ````).
///
/// The fence may span one line; the language tag is optional either way.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let body = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use kioskflow_proto::FALLBACK_FLOW_ID;

    use super::*;

    struct Canned(String);

    impl FlowGenerator for Canned {
        async fn generate(&self, _prompt: &str) -> Result<String, GeneratorError> {
            Ok(self.0.clone())
        }
    }

    struct Broken;

    impl FlowGenerator for Broken {
        async fn generate(&self, _prompt: &str) -> Result<String, GeneratorError> {
            Err(GeneratorError::EmptyOutput)
        }
    }

    const TINY: &str = r#"{
        "flow_id": "tiny",
        "start_screen_id": "home",
        "screens": {
            "home": { "id": "home", "title": "Hi", "type": "info", "components": [] }
        }
    }"#;

    #[test]
    fn strips_fences() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fence("  {}  "), "{}");
    }

    #[test]
    fn single_line_fence_keeps_document() {
        assert_eq!(strip_code_fence(r#"```{"flow_id":"f"}```"#), r#"{"flow_id":"f"}"#);
        assert_eq!(strip_code_fence(r#"```json {"flow_id":"f"}```"#), r#"{"flow_id":"f"}"#);
        assert_eq!(strip_code_fence("```json\n{}```"), "{}");
    }

    #[tokio::test]
    async fn adopts_fenced_output() {
        let fenced = Canned(format!("```json\n{TINY}\n```"));
        let generated = generate_flow(&fenced, "anything").await;

        assert_eq!(generated.flow.flow_id.as_str(), "tiny");
        assert!(generated.fallback_reason.is_none());
    }

    #[tokio::test]
    async fn falls_back_on_garbage() {
        let generated = generate_flow(&Canned("Sure! Here is your flow.".into()), "anything").await;

        assert_eq!(generated.flow.flow_id.as_str(), FALLBACK_FLOW_ID);
        assert!(generated.fallback_reason.is_some());
    }

    #[tokio::test]
    async fn falls_back_on_generator_error() {
        let generated = generate_flow(&Broken, "anything").await;

        assert_eq!(generated.flow, Flow::fallback());
        assert_eq!(generated.fallback_reason.as_deref(), Some("generator returned no output"));
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let generator = CommandGenerator::new("kioskflow-no-such-generator");
        let result = generator.generate("x").await;

        assert!(matches!(result, Err(GeneratorError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn command_output_is_returned() {
        let generator = CommandGenerator::new("sh").with_args(["-c", "cat > /dev/null; echo '{}'"]);

        assert_eq!(generator.generate("x").await.unwrap().trim(), "{}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_command_times_out() {
        let generator = CommandGenerator::new("sh")
            .with_args(["-c", "sleep 5"])
            .with_timeout(Duration::from_millis(100));

        assert!(matches!(generator.generate("x").await, Err(GeneratorError::Timeout(_))));
    }

    #[test]
    fn command_line_is_split() {
        assert!(CommandGenerator::from_command_line("   ").is_none());

        let generator = CommandGenerator::from_command_line("llm -m fast").unwrap();
        assert_eq!(generator.program, "llm");
        assert_eq!(generator.args, ["-m", "fast"]);
    }
}
