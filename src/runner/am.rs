use std::process::Stdio;
use std::time::{Duration, Instant, SystemTime};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;

use crate::config::RunnerConfig;
use crate::models::{Diagnostic, TestResult, Verdict};
use crate::verdict;

use super::TestRunner;

/// Guard that kills the child process (and its entire process group) on drop.
struct ChildGuard {
    child: Option<tokio::process::Child>,
    /// Process group ID saved at spawn time so we can kill the whole group.
    #[cfg(unix)]
    pgid: Option<u32>,
}

impl ChildGuard {
    fn new(child: tokio::process::Child) -> Self {
        #[cfg(unix)]
        let pgid = child.id();
        Self {
            child: Some(child),
            #[cfg(unix)]
            pgid,
        }
    }

    /// Kill the group now (bounded-wait expiry). Drop covers early exits.
    fn kill_now(&mut self) {
        #[cfg(unix)]
        if let Some(pgid) = self.pgid.take() {
            unsafe { libc::kill(-(pgid as libc::pid_t), libc::SIGKILL) };
        }
        // Fallback / non-Unix: kill just the direct child.
        if let Some(ref mut child) = self.child {
            let _ = child.start_kill();
        }
    }

    /// The child exited normally; nothing left to kill.
    fn disarm(&mut self) {
        self.child = None;
        #[cfg(unix)]
        {
            self.pgid = None;
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        self.kill_now();
    }
}

/// Open a debug log file if `PROCTOR_DEBUG` env var is set.
type LogFile = std::sync::Arc<std::sync::Mutex<std::fs::File>>;

fn open_log_file() -> Option<LogFile> {
    std::env::var("PROCTOR_DEBUG").ok().and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .ok()
            .map(|f| std::sync::Arc::new(std::sync::Mutex::new(f)))
    })
}

fn write_log(lf: &LogFile, msg: &str) {
    use std::io::Write;
    if let Ok(mut f) = lf.lock() {
        let _ = writeln!(f, "{}", msg);
    }
}

/// Adapter that runs one instrumented test per subprocess via
/// `adb shell am instrument -w` and classifies the captured status protocol.
pub struct AmInstrumentRunner {
    command: String,
    instrumentation: String,
    timeout: Option<Duration>,
    log_file: Option<LogFile>,
}

impl AmInstrumentRunner {
    pub fn new(config: &RunnerConfig) -> Self {
        Self {
            command: config.command.clone(),
            instrumentation: config.instrumentation.clone(),
            timeout: config.timeout_secs.map(Duration::from_secs),
            log_file: open_log_file(),
        }
    }

    fn log(&self, msg: &str) {
        if let Some(ref lf) = self.log_file {
            write_log(lf, msg);
        }
    }

    fn build_command(&self, suite: &str, method: &str, package: &str) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.arg("shell")
            .arg("am")
            .arg("instrument")
            .arg("-w")
            .arg("-e")
            .arg("class")
            .arg(format!("{suite}#{method}"))
            .arg(format!("{package}/{}", self.instrumentation));
        cmd
    }
}

/// Drain one output channel to end-of-stream, keeping non-blank lines.
/// The task owns the handle; it is closed when the task returns.
fn drain<R>(stream: R, log: Option<LogFile>, tag: &'static str) -> JoinHandle<String>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut captured = String::new();
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(ref lf) = log {
                write_log(lf, &format!("[{tag}] {line}"));
            }
            captured.push_str(&line);
            captured.push('\n');
        }
        captured
    })
}

#[async_trait]
impl TestRunner for AmInstrumentRunner {
    async fn run_test(&self, suite: &str, method: &str, package: &str) -> Result<TestResult> {
        let mut cmd = self.build_command(suite, method, package);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Put the child in its own process group so killing it (via
        // ChildGuard or bounded-wait expiry) also takes out anything it forks.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.as_std_mut().process_group(0);
        }

        self.log(&format!("[cmd] {:?}", cmd.as_std()));

        let started = SystemTime::now();
        let launch = Instant::now();
        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to launch instrumentation tool `{}`", self.command))?;

        let stdout = child.stdout.take().context("missing stdout")?;
        let stderr = child.stderr.take().context("missing stderr")?;

        // Both drains must be running before anything blocks on the child:
        // if the child fills one pipe while we wait on the other, parent and
        // child deadlock.
        let out_task = drain(stdout, self.log_file.clone(), "stdout");
        let err_task = drain(stderr, self.log_file.clone(), "stderr");

        let mut guard = ChildGuard::new(child);
        let mut timed_out = false;
        if let Some(ref mut child) = guard.child {
            match self.timeout {
                None => {
                    child
                        .wait()
                        .await
                        .context("failed to wait for instrumentation tool")?;
                }
                Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                    Ok(status) => {
                        status.context("failed to wait for instrumentation tool")?;
                    }
                    Err(_) => timed_out = true,
                },
            }
        }
        if timed_out {
            // Forced termination closes the pipes so the drains reach
            // end-of-stream instead of blocking forever.
            guard.kill_now();
        } else {
            guard.disarm();
        }

        // The captured text is final only once both channels hit
        // end-of-stream; joining after exit alone could truncate output.
        let stdout_text = out_task.await.context("stdout drain task failed")?;
        let stderr_text = err_task.await.context("stderr drain task failed")?;
        let elapsed = launch.elapsed();

        let combined = format!("{stdout_text}{stderr_text}");
        let verdict = if let (true, Some(limit)) = (timed_out, self.timeout) {
            Verdict::Errored(Diagnostic {
                message: format!("timed out after {} s", limit.as_secs()),
                trace: combined,
            })
        } else {
            verdict::parse(&combined)
        };

        self.log(&format!("[done] {suite}#{method} {}", verdict.symbol()));

        Ok(TestResult {
            test_name: method.to_string(),
            started,
            duration_ms: elapsed.as_millis() as u64,
            verdict,
        })
    }

    fn name(&self) -> &str {
        "am instrument"
    }
}
