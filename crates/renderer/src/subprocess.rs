//! Subprocess-based renderer.
//!
//! Spawns the external rendering process once per publish attempt, pipes
//! the request JSON to stdin, and parses stdout into a bundle. The child
//! is killed when the configured timeout expires.

use std::process::Stdio;
use std::time::{Duration, Instant};

use invita_core::bundle::SnapshotBundle;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

use crate::wire::{RenderRequest, RenderResponse};
use crate::{RenderError, SnapshotGenerator};

/// Maximum stdout or stderr size captured per stream (10 MiB). Output
/// beyond this is truncated to bound memory use.
const MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Renders snapshots by invoking an external process (typically the
/// JavaScript layout renderer via `node`).
pub struct SubprocessRenderer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl SubprocessRenderer {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl SnapshotGenerator for SubprocessRenderer {
    async fn generate_bundle(
        &self,
        layout_id: &str,
        data: &serde_json::Value,
    ) -> Result<SnapshotBundle, RenderError> {
        let request = RenderRequest::new(layout_id, data);
        let payload = serde_json::to_vec(&request)
            .map_err(|e| RenderError::MalformedOutput(format!("request encode failed: {e}")))?;

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the child (e.g. on timeout) kills the process.
            .kill_on_drop(true);

        let start = Instant::now();
        let mut child = cmd.spawn()?;

        // Read the streams in spawned tasks so stdin feeding and
        // `child.wait()` can proceed while the renderer produces output.
        let mut stdin = child.stdin.take();
        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();
        let stdout_task = tokio::spawn(async move { read_stream(stdout_handle).await });
        let stderr_task = tokio::spawn(async move { read_stream(stderr_handle).await });

        // Feed the payload and await exit under one deadline: a renderer
        // that never drains stdin hangs the write once the pipe buffer
        // fills, and must time out like any other hang.
        let feed_and_wait = async {
            if let Some(mut stdin) = stdin.take() {
                // Best-effort: if the process closes stdin early, the exit
                // status below reports the real failure.
                let _ = stdin.write_all(&payload).await;
                drop(stdin);
            }
            child.wait().await
        };

        let status = match tokio::time::timeout(self.timeout, feed_and_wait).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => return Err(RenderError::Io(e)),
            Err(_elapsed) => {
                // Timeout: `child` drops here and is killed.
                return Err(RenderError::Timeout {
                    elapsed_ms: start.elapsed().as_millis() as u64,
                });
            }
        };

        let stdout_bytes = stdout_task.await.unwrap_or_default();
        let stderr_bytes = stderr_task.await.unwrap_or_default();
        let stdout = String::from_utf8_lossy(&stdout_bytes).into_owned();
        let stderr = String::from_utf8_lossy(&stderr_bytes).into_owned();

        if !status.success() {
            return Err(RenderError::Failed {
                exit_code: status.code().unwrap_or(-1),
                stderr,
            });
        }

        tracing::debug!(
            layout_id,
            duration_ms = start.elapsed().as_millis() as u64,
            "Renderer completed"
        );

        RenderResponse::parse(&stdout)
    }
}

/// Read an entire output stream into a buffer, capped at [`MAX_OUTPUT_BYTES`].
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = (&mut h)
            .take(MAX_OUTPUT_BYTES as u64)
            .read_to_end(&mut buf)
            .await;
    }
    buf
}
