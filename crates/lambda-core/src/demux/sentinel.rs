use crate::error::RunError;

/// Literal prefix marking a payload as an exit-code report (`[exitcode] `).
pub const SENTINEL_PREFIX: &[u8] = b"[exitcode] ";

/// What a single payload turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame<'a> {
    /// Workload output, to be displayed as-is.
    Output(&'a [u8]),
    /// Final exit code of the workload.
    ExitCode(i32),
}

/// Classify a payload. Sentinel detection wins over output.
///
/// The prefix is skipped exactly once; the remainder must be a base-10 integer
/// with no surrounding content.
pub fn classify(payload: &[u8]) -> Result<Frame<'_>, RunError> {
    let Some(rest) = payload.strip_prefix(SENTINEL_PREFIX) else {
        return Ok(Frame::Output(payload));
    };

    std::str::from_utf8(rest)
        .ok()
        .and_then(|s| s.parse::<i32>().ok())
        .map(Frame::ExitCode)
        .ok_or_else(|| RunError::MalformedSentinel {
            payload: String::from_utf8_lossy(rest).into_owned(),
        })
}
