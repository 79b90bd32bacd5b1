//! Local and sandboxed command execution.
//!
//! Execution failures are recovered into placeholder strings rather than
//! propagated: the analysis flow always continues to prompt construction,
//! with whatever output (or placeholder) was obtained.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

/// Disposable image used for best-effort Docker sandboxing.
pub const SANDBOX_IMAGE: &str = "python:3.11-slim";

/// Run a command as a subprocess and capture its merged output.
///
/// In shell mode the command string is handed to `sh -c`; otherwise it is
/// split into an argument vector with shell-style quoting rules. A timed-out
/// child is killed and replaced by a placeholder naming the timeout; any
/// other failure becomes a placeholder embedding the error.
pub async fn run_local(cmd: &str, timeout: Duration, use_shell: bool) -> String {
    let mut command = if use_shell {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    } else {
        let Some(argv) = shlex::split(cmd) else {
            return format!("[Execution error: cannot parse command: {}]", cmd);
        };
        let Some((program, args)) = argv.split_first() else {
            return "[Execution error: empty command]".to_string();
        };
        let mut c = Command::new(program);
        c.args(args);
        c
    };

    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = match command.spawn() {
        Ok(child) => child,
        Err(e) => return format!("[Execution error: {}]", e),
    };

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => {
            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            text
        }
        Ok(Err(e)) => format!("[Execution error: {}]", e),
        Err(_) => format!("[Execution timed out after {}s]", timeout.as_secs()),
    }
}

/// Whether the Docker runtime is present on this host.
pub fn docker_available() -> bool {
    which::which("docker").is_ok()
}

/// Run a command inside a disposable container, capturing its output.
///
/// The command is forwarded as a single shell-quoted argument to `bash -lc`
/// inside the container. Best-effort isolation only, not a security boundary.
pub async fn run_in_docker(cmd: &str, timeout: Duration) -> String {
    let quoted = match shlex::try_quote(cmd) {
        Ok(quoted) => quoted.into_owned(),
        Err(e) => return format!("[Execution error: {}]", e),
    };
    let docker_cmd = format!("docker run --rm {} bash -lc {}", SANDBOX_IMAGE, quoted);
    run_local(&docker_cmd, timeout, true).await
}
