use std::io::Write;
use std::process::{Command, Stdio};

use super::ExtractionError;

/// Convert RTF to plain text by piping it through `pandoc -f rtf -t plain`.
pub fn extract_rtf(bytes: &[u8], pandoc: &str) -> Result<String, ExtractionError> {
    let mut child = Command::new(pandoc)
        .args(["--from", "rtf", "--to", "plain", "--wrap", "none"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ExtractionError::RtfError(format!("failed to run {pandoc}: {e}")))?;

    // pandoc reads all of stdin before it writes anything.
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(bytes)
            .map_err(|e| ExtractionError::RtfError(format!("failed to feed {pandoc}: {e}")))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| ExtractionError::RtfError(format!("{pandoc} did not finish: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExtractionError::RtfError(format!(
            "{pandoc} exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
