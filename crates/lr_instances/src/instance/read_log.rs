use std::{path::Path, process::Stdio};

use colored::Colorize;
use lr_core::{info, no_window};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    process::Command,
};

use super::launch::GameLaunchError;

/// Runs the game and forwards its output, line by line,
/// as it arrives: stdout to stdout, stderr to stderr (in red).
/// Lines that aren't valid UTF-8 are printed lossily.
///
/// Returns the exit code once the process exits
/// (`-1` if it was killed by a signal). A non-zero
/// exit code is reported, not treated as an error.
///
/// # Errors
/// If the process couldn't be started, or its output couldn't be read.
pub async fn run_game(
    binary: &Path,
    args: &[String],
    working_dir: &Path,
) -> Result<i32, GameLaunchError> {
    let mut base = Command::new(binary);
    #[allow(unused_mut)]
    let mut command = base
        .args(args)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    no_window!(command);

    let mut child = command.spawn().map_err(GameLaunchError::CommandError)?;

    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return Err(GameLaunchError::Output(std::io::Error::other(
            "game output wasn't piped",
        )));
    };
    let mut stdout_reader = BufReader::new(stdout);
    let mut stderr_reader = BufReader::new(stderr);
    let (mut stdout_buf, mut stderr_buf) = (Vec::new(), Vec::new());
    let (mut stdout_open, mut stderr_open) = (true, true);

    while stdout_open || stderr_open {
        tokio::select! {
            line = next_line(&mut stdout_reader, &mut stdout_buf), if stdout_open => {
                match line? {
                    Some(line) => println!("{line}"),
                    None => stdout_open = false,
                }
            },
            line = next_line(&mut stderr_reader, &mut stderr_buf), if stderr_open => {
                match line? {
                    Some(line) => eprintln!("{}", line.red()),
                    None => stderr_open = false,
                }
            }
        }
    }

    let status = child.wait().await.map_err(GameLaunchError::CommandError)?;
    let code = status.code().unwrap_or(-1);
    println!();
    info!("Game exited with code {code}");
    Ok(code)
}

/// Reads one line without its line ending, `None` at end of stream.
///
/// `buf` must only be touched by this function. A read cancelled
/// by `select!` leaves its partial line there for the next call.
async fn next_line<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    buf: &mut Vec<u8>,
) -> Result<Option<String>, GameLaunchError> {
    reader
        .read_until(b'\n', buf)
        .await
        .map_err(GameLaunchError::Output)?;
    if buf.is_empty() {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    let line = String::from_utf8_lossy(buf).into_owned();
    buf.clear();
    Ok(Some(line))
}

#[cfg(all(test, unix))]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_owned(), script.to_owned()]
    }

    #[tokio::test]
    async fn returns_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let code = run_game(
            &PathBuf::from("sh"),
            &sh("echo out; echo err >&2; exit 3"),
            dir.path(),
        )
        .await
        .unwrap();
        assert_eq!(code, 3);
    }

    #[tokio::test]
    async fn survives_non_utf8_output() {
        let dir = tempfile::tempdir().unwrap();
        let code = run_game(
            &PathBuf::from("sh"),
            &sh("printf 'caf\\351\\n'; printf 'caf\\351' >&2; sleep 1; exit 7"),
            dir.path(),
        )
        .await
        .unwrap();
        assert_eq!(code, 7);
    }

    #[tokio::test]
    async fn lines_are_decoded_lossily() {
        let mut reader: &[u8] = b"caf\xe9\r\nok\nlast";
        let mut buf = Vec::new();
        assert_eq!(
            next_line(&mut reader, &mut buf).await.unwrap().as_deref(),
            Some("caf\u{fffd}")
        );
        assert_eq!(
            next_line(&mut reader, &mut buf).await.unwrap().as_deref(),
            Some("ok")
        );
        assert_eq!(
            next_line(&mut reader, &mut buf).await.unwrap().as_deref(),
            Some("last")
        );
        assert_eq!(next_line(&mut reader, &mut buf).await.unwrap(), None);
    }

    #[tokio::test]
    async fn runs_in_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let code = run_game(&PathBuf::from("sh"), &sh("touch marker"), dir.path())
            .await
            .unwrap();
        assert_eq!(code, 0);
        assert!(dir.path().join("marker").exists());
    }

    #[tokio::test]
    async fn killed_by_signal() {
        let dir = tempfile::tempdir().unwrap();
        let code = run_game(&PathBuf::from("sh"), &sh("kill -9 $$"), dir.path())
            .await
            .unwrap();
        assert_eq!(code, -1);
    }

    #[tokio::test]
    async fn missing_binary() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            run_game(&PathBuf::from("/nonexistent/java"), &[], dir.path()).await,
            Err(GameLaunchError::CommandError(_))
        ));
    }
}
