//! External graph rasterization
//!
//! Rasterizing a DOT description to PNG is delegated to the Graphviz
//! `dot` tool as a child process. The engine never learns about raster
//! formats; this boundary is the only place that does.

use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Errors from the external rendering step
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to spawn renderer `{bin}`: {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Renderer exited with {status}: {stderr}")]
    Failed {
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("Renderer I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rasterize DOT text to PNG bytes with the external layout tool.
///
/// The DOT source is written to the tool's stdin and the image read from
/// its stdout, so nothing touches the filesystem.
pub async fn dot_to_png(dot_bin: &str, dot_source: &str) -> Result<Vec<u8>, RenderError> {
    let mut child = Command::new(dot_bin)
        .arg("-Tpng")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| RenderError::Spawn { bin: dot_bin.to_string(), source })?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| RenderError::Io(std::io::Error::other("renderer stdin unavailable")))?;
    // A child that dies before reading its stdin breaks the pipe; its
    // exit status is the more useful report, so let wait_with_output
    // pick that up.
    if let Err(err) = stdin.write_all(dot_source.as_bytes()).await {
        if err.kind() != std::io::ErrorKind::BrokenPipe {
            return Err(err.into());
        }
    }
    drop(stdin);

    let output = child.wait_with_output().await?;
    if !output.status.success() {
        return Err(RenderError::Failed {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(output.stdout)
}
