use std::{
    ffi::OsStr,
    io::{self, Read, Write},
    path::Path,
    process::{Output, Stdio},
    time::Duration,
};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command as TokioCommand;
use tracing::warn;

use crate::{
    error::{FileDagError, Result},
    render::RenderError,
};

pub fn read_stdin() -> Result<String> {
    let mut text = String::new();
    io::stdin().lock().read_to_string(&mut text)?;
    Ok(text)
}

pub fn write_stdout(document: &str) -> Result<()> {
    let mut out = io::stdout().lock();
    out.write_all(document.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// `None` for "0" or an empty string, otherwise a humantime duration.
pub fn parse_timeout(timeout: Option<&str>) -> Result<Option<Duration>> {
    let Some(timeout) = timeout.map(str::trim) else {
        return Ok(None);
    };

    if timeout == "0" || timeout.is_empty() {
        return Ok(None);
    }

    timeout
        .parse::<humantime::Duration>()
        .map(|duration| Some(duration.into()))
        .map_err(|e| {
            FileDagError::Config(format!(
                "invalid timeout '{}': {} (use a duration like '30s', '5m', '1h30m')",
                timeout, e
            ))
        })
}

/// Runs `program` with `args`, feeding `input` to its stdin and collecting
/// stdout and stderr. The child is killed if it outlives `timeout`.
pub async fn run_command_with_input<I, S>(
    program: &Path,
    args: I,
    input: Vec<u8>,
    timeout: Option<Duration>,
) -> std::result::Result<Output, RenderError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = TokioCommand::new(program);
    cmd.args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|source| RenderError::Spawn {
        program: program.display().to_string(),
        source,
    })?;

    let stdin_pipe = child.stdin.take();
    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();

    let stdin_handle = tokio::spawn(async move {
        if let Some(mut pipe) = stdin_pipe {
            pipe.write_all(&input).await?;
            pipe.shutdown().await?;
        }
        Ok::<(), io::Error>(())
    });
    let stdout_handle = tokio::spawn(collect_pipe(stdout_pipe));
    let stderr_handle = tokio::spawn(collect_pipe(stderr_pipe));

    let status = match timeout {
        Some(duration) => {
            tokio::select! {
                result = child.wait() => result.map_err(RenderError::Io)?,
                _ = tokio::time::sleep(duration) => {
                    if let Err(kill_err) = child.kill().await {
                        warn!("failed to kill timed-out renderer: {}", kill_err);
                    }
                    let _ = child.wait().await;
                    return Err(RenderError::Timeout);
                }
            }
        }
        None => child.wait().await.map_err(RenderError::Io)?,
    };

    let stdout = join_pipe(stdout_handle.await)?;
    let stderr = join_pipe(stderr_handle.await)?;

    match stdin_handle.await {
        Ok(Ok(())) => {}
        // A renderer that rejects its input may close stdin early; its exit
        // status and stderr explain why.
        Ok(Err(e)) if status.success() => return Err(RenderError::Io(e)),
        Ok(Err(_)) => {}
        Err(e) => return Err(RenderError::Io(io::Error::other(e))),
    }

    Ok(Output {
        status,
        stdout,
        stderr,
    })
}

async fn collect_pipe<R>(pipe: Option<R>) -> io::Result<Vec<u8>>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut collected = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut collected).await?;
    }
    Ok(collected)
}

fn join_pipe(
    joined: std::result::Result<io::Result<Vec<u8>>, tokio::task::JoinError>,
) -> std::result::Result<Vec<u8>, RenderError> {
    match joined {
        Ok(Ok(bytes)) => Ok(bytes),
        Ok(Err(e)) => Err(RenderError::Io(e)),
        Err(e) => Err(RenderError::Io(io::Error::other(e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_or_missing_timeout_disables_it() {
        assert_eq!(parse_timeout(None).unwrap(), None);
        assert_eq!(parse_timeout(Some("0")).unwrap(), None);
        assert_eq!(parse_timeout(Some("")).unwrap(), None);
    }

    #[test]
    fn humantime_durations_are_accepted() {
        assert_eq!(
            parse_timeout(Some("1m30s")).unwrap(),
            Some(Duration::from_secs(90))
        );
    }

    #[test]
    fn invalid_timeout_is_a_config_error() {
        let err = parse_timeout(Some("soon")).unwrap_err();

        assert!(matches!(err, FileDagError::Config(_)));
        assert!(err.to_string().contains("soon"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn pipes_input_through_the_child() {
        let output = run_command_with_input(
            Path::new("cat"),
            Vec::<&str>::new(),
            b"digraph {}".to_vec(),
            Some(Duration::from_secs(10)),
        )
        .await
        .unwrap();

        assert!(output.status.success());
        assert_eq!(output.stdout, b"digraph {}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_child_times_out() {
        let err = run_command_with_input(
            Path::new("sleep"),
            ["5"],
            Vec::new(),
            Some(Duration::from_millis(50)),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, RenderError::Timeout));
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let err = run_command_with_input(
            Path::new("/nonexistent/filedag-renderer"),
            Vec::<&str>::new(),
            Vec::new(),
            None,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, RenderError::Spawn { .. }));
    }
}
