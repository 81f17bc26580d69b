//! Collectors that run the external measurement tools and turn their
//! reports into samples.

use std::process::{Command, Output, Stdio};

use crate::error::{PipelineError, PipelineResult};

mod massif;
mod speed;

pub use massif::MassifCollector;
pub use speed::SpeedCollector;

/// Renders a command the way a shell would show it, for error messages
/// and status lines.
pub(crate) fn render_command(cmd: &Command) -> String {
    let mut rendered = cmd.get_program().to_string_lossy().into_owned();
    for arg in cmd.get_args() {
        rendered.push(' ');
        rendered.push_str(&arg.to_string_lossy());
    }
    rendered
}

/// Runs a command with captured stdio and maps a non-zero exit into
/// [`PipelineError::Process`] carrying both streams.
pub(crate) fn run_captured(cmd: &mut Command) -> PipelineResult<Output> {
    let output = cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).output()?;

    if !output.status.success() {
        return Err(PipelineError::Process {
            command: render_command(cmd),
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_command() {
        let mut cmd = Command::new("valgrind");
        cmd.arg("--tool=massif").arg("./test_kem_mem").arg("ML-KEM-512").arg("0");
        assert_eq!(
            render_command(&cmd),
            "valgrind --tool=massif ./test_kem_mem ML-KEM-512 0"
        );
    }

    #[test]
    fn test_run_captured_reports_exit_code() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("echo boom >&2; exit 3");
        match run_captured(&mut cmd) {
            Err(PipelineError::Process { status, stderr, .. }) => {
                assert_eq!(status, Some(3));
                assert!(stderr.contains("boom"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_run_captured_collects_stdout() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("echo hello");
        let output = run_captured(&mut cmd).unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hello");
    }
}
