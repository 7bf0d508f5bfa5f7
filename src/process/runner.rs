use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use futures::stream::{self, BoxStream};
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};

use super::progress::parse_download_progress;
use crate::domain::{AppError, ProcessOutcome};

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// One external tool invocation.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    /// Run every output line through the download progress parser.
    pub parse_progress: bool,
}

#[derive(Debug, Clone)]
pub enum ProcessEvent {
    /// A line from stdout or stderr, without its terminator.
    Line(String),
    Progress(u8),
    Exited(ProcessOutcome),
    Failed(AppError),
}

/// Runs external tools and streams their output.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    /// Start `spec` and stream its output.
    ///
    /// Lines are yielded as soon as the child writes them. The stream always
    /// ends with exactly one `Exited` or `Failed` event.
    pub fn run(&self, spec: CommandSpec) -> BoxStream<'static, ProcessEvent> {
        stream::unfold(RunState::Start(spec), |state| async move {
            match state {
                RunState::Start(spec) => match spawn(&spec) {
                    Ok((child, lines)) => {
                        tracing::info!(program = %spec.program.display(), "process started");
                        Some((
                            Vec::new(),
                            RunState::Running {
                                child,
                                lines,
                                parse_progress: spec.parse_progress,
                            },
                        ))
                    }
                    Err(e) => {
                        tracing::error!(program = %spec.program.display(), error = %e, "failed to start process");
                        Some((
                            vec![ProcessEvent::Failed(AppError::Launch {
                                program: spec.program.display().to_string(),
                                detail: e.to_string(),
                            })],
                            RunState::Finished,
                        ))
                    }
                },
                RunState::Running {
                    mut child,
                    mut lines,
                    parse_progress,
                } => match lines.next().await {
                    Some(Ok(line)) => {
                        tracing::debug!(target: "convertly::tool_output", "{}", line);

                        let progress = parse_progress
                            .then(|| parse_download_progress(&line))
                            .flatten();
                        let mut events = vec![ProcessEvent::Line(line)];
                        if let Some(pct) = progress {
                            events.push(ProcessEvent::Progress(pct));
                        }

                        Some((
                            events,
                            RunState::Running {
                                child,
                                lines,
                                parse_progress,
                            },
                        ))
                    }
                    Some(Err(e)) => {
                        // Reading failed; the child is killed on drop.
                        let _ = child.start_kill();
                        Some((
                            vec![ProcessEvent::Failed(AppError::Io(format!(
                                "Failed to read process output: {}",
                                e
                            )))],
                            RunState::Finished,
                        ))
                    }
                    None => {
                        let event = match child.wait().await {
                            Ok(status) => {
                                let outcome = ProcessOutcome::from(status);
                                tracing::info!(exit_code = ?outcome.exit_code, "process exited");
                                ProcessEvent::Exited(outcome)
                            }
                            Err(e) => ProcessEvent::Failed(AppError::Io(format!(
                                "Failed to wait for process: {}",
                                e
                            ))),
                        };
                        Some((vec![event], RunState::Finished))
                    }
                },
                RunState::Finished => None,
            }
        })
        .flat_map(stream::iter)
        .boxed()
    }
}

enum RunState {
    Start(CommandSpec),
    Running {
        child: Child,
        lines: BoxStream<'static, io::Result<String>>,
        parse_progress: bool,
    },
    Finished,
}

fn spawn(spec: &CommandSpec) -> io::Result<(Child, BoxStream<'static, io::Result<String>>)> {
    let mut command = Command::new(&spec.program);
    command
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    #[cfg(windows)]
    command.creation_flags(CREATE_NO_WINDOW);

    let mut child = command.spawn()?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("failed to capture stdout"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("failed to capture stderr"))?;

    let lines = stream::select(line_stream(stdout), line_stream(stderr)).boxed();
    Ok((child, lines))
}

/// Lines of `reader`, decoded lossily since tools print paths in the
/// platform encoding.
fn line_stream<R>(reader: R) -> BoxStream<'static, io::Result<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    stream::unfold(Some(BufReader::new(reader)), |reader| async move {
        let mut reader = reader?;
        let mut buf = Vec::new();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => None,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf)
                    .trim_end_matches(['\r', '\n'])
                    .to_string();
                Some((Ok(line), Some(reader)))
            }
            Err(e) => Some((Err(e), None)),
        }
    })
    .boxed()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str, parse_progress: bool) -> CommandSpec {
        CommandSpec {
            program: PathBuf::from("sh"),
            args: vec!["-c".into(), script.into()],
            parse_progress,
        }
    }

    async fn collect(spec: CommandSpec) -> Vec<ProcessEvent> {
        ProcessRunner::new().run(spec).collect().await
    }

    fn outcome(events: &[ProcessEvent]) -> ProcessOutcome {
        match events.last() {
            Some(ProcessEvent::Exited(outcome)) => *outcome,
            other => panic!("expected exit event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_zero_exit_is_success() {
        let events = collect(shell("echo hello", false)).await;
        assert!(matches!(&events[0], ProcessEvent::Line(line) if line == "hello"));
        let outcome = outcome(&events);
        assert!(outcome.success);
        assert_eq!(outcome.exit_code, Some(0));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_reported_not_raised() {
        let events = collect(shell("echo failing >&2; exit 1", false)).await;
        assert!(matches!(&events[0], ProcessEvent::Line(line) if line == "failing"));
        let outcome = outcome(&events);
        assert!(!outcome.success);
        assert_eq!(outcome.exit_code, Some(1));
    }

    #[tokio::test]
    async fn test_missing_program_fails_to_launch() {
        let spec = CommandSpec {
            program: PathBuf::from("/nonexistent/convertly-tool"),
            args: Vec::new(),
            parse_progress: false,
        };
        let events = collect(spec).await;
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], ProcessEvent::Failed(AppError::Launch { .. })));
    }

    #[tokio::test]
    async fn test_progress_lines_are_parsed_when_enabled() {
        let script = "echo '[download]  10.0% of 1MiB'; echo '[download]  42.5% of 1MiB'; echo done";
        let events = collect(shell(script, true)).await;
        let progress: Vec<u8> = events
            .iter()
            .filter_map(|e| match e {
                ProcessEvent::Progress(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(progress, vec![10, 43]);
        assert!(outcome(&events).success);
    }

    #[tokio::test]
    async fn test_progress_lines_ignored_when_disabled() {
        let events = collect(shell("echo '[download]  50.0% of 1MiB'", false)).await;
        assert!(!events.iter().any(|e| matches!(e, ProcessEvent::Progress(_))));
    }

    #[tokio::test]
    async fn test_stdout_and_stderr_are_both_captured() {
        let events = collect(shell("echo out; echo err >&2", false)).await;
        let mut lines: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                ProcessEvent::Line(line) => Some(line.as_str()),
                _ => None,
            })
            .collect();
        lines.sort();
        assert_eq!(lines, vec!["err", "out"]);
    }
}
