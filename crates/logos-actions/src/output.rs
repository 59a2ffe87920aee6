use std::io::Write;
use std::path::PathBuf;

use logos_core::LogosError;
use serde::Serialize;

/// Variable naming the step-output file. Set by the runner on every step.
pub const OUTPUT_PATH_VAR: &str = "GITHUB_OUTPUT";

/// Base sentinel for multi-line output blocks.
const DELIMITER_BASE: &str = "LOGOS_EOF";

/// Append-only writer for the step-output channel.
///
/// Later workflow steps read the values written here; this agent writes
/// exactly once per run and never reads the file back. Two encodings are
/// supported: heredoc blocks for multi-line text and single-line
/// `key=<json>` for structured bundles.
///
/// A fixed heredoc sentinel can collide with model output that happens to
/// contain the sentinel as a line of its own, silently truncating the
/// value. [`append_multiline`](OutputSink::append_multiline) therefore
/// scans the value and picks the first sentinel that does not occur in it;
/// the JSON encoding cannot collide at all since `serde_json` escapes
/// newlines.
pub struct OutputSink {
    path: PathBuf,
}

impl OutputSink {
    /// Open the sink named by `GITHUB_OUTPUT`.
    ///
    /// # Errors
    ///
    /// Returns [`LogosError::Config`] when the variable is unset.
    pub fn from_env() -> Result<Self, LogosError> {
        match std::env::var(OUTPUT_PATH_VAR) {
            Ok(path) if !path.is_empty() => Ok(Self::new(path)),
            _ => Err(LogosError::Config(format!(
                "{OUTPUT_PATH_VAR} is not set; this command expects the GitHub Actions environment"
            ))),
        }
    }

    /// Open a sink at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append a multi-line value as a heredoc block:
    /// `key<<SENTINEL\nvalue\nSENTINEL\n`.
    ///
    /// # Errors
    ///
    /// Returns [`LogosError::Io`] when the file cannot be opened or written.
    pub fn append_multiline(&self, key: &str, value: &str) -> Result<(), LogosError> {
        let delimiter = pick_delimiter(value);
        self.append_raw(&format!("{key}<<{delimiter}\n{value}\n{delimiter}\n"))
    }

    /// Append a value as a single line: `key=<json>`.
    ///
    /// # Errors
    ///
    /// Returns [`LogosError::Serialization`] when the value cannot be
    /// serialized, [`LogosError::Io`] when the file cannot be written.
    pub fn append_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), LogosError> {
        let json = serde_json::to_string(value)?;
        self.append_raw(&format!("{key}={json}\n"))
    }

    fn append_raw(&self, entry: &str) -> Result<(), LogosError> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(entry.as_bytes())?;
        Ok(())
    }
}

/// Pick the first sentinel in `LOGOS_EOF`, `LOGOS_EOF_1`, ... that does not
/// occur as a full line of `value`.
fn pick_delimiter(value: &str) -> String {
    let mut candidate = DELIMITER_BASE.to_string();
    let mut n = 0u32;
    while value.lines().any(|line| line == candidate) {
        n += 1;
        candidate = format!("{DELIMITER_BASE}_{n}");
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink_in(dir: &tempfile::TempDir) -> (OutputSink, PathBuf) {
        let path = dir.path().join("github_output");
        (OutputSink::new(&path), path)
    }

    #[test]
    fn multiline_writes_heredoc_block() {
        let dir = tempfile::tempdir().unwrap();
        let (sink, path) = sink_in(&dir);

        sink.append_multiline("comment_body", "line one\nline two").unwrap();

        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            written,
            "comment_body<<LOGOS_EOF\nline one\nline two\nLOGOS_EOF\n"
        );
    }

    #[test]
    fn multiline_sidesteps_sentinel_collision() {
        let dir = tempfile::tempdir().unwrap();
        let (sink, path) = sink_in(&dir);

        let hostile = "before\nLOGOS_EOF\nafter";
        sink.append_multiline("comment_body", hostile).unwrap();

        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            written,
            "comment_body<<LOGOS_EOF_1\nbefore\nLOGOS_EOF\nafter\nLOGOS_EOF_1\n"
        );
    }

    #[test]
    fn delimiter_skips_every_colliding_candidate() {
        let value = "LOGOS_EOF\nLOGOS_EOF_1\nLOGOS_EOF_2";
        assert_eq!(pick_delimiter(value), "LOGOS_EOF_3");
    }

    #[test]
    fn delimiter_ignores_partial_line_matches() {
        // The sentinel only terminates the block as a full line.
        assert_eq!(pick_delimiter("prefix LOGOS_EOF suffix"), "LOGOS_EOF");
    }

    #[test]
    fn json_writes_single_line() {
        let dir = tempfile::tempdir().unwrap();
        let (sink, path) = sink_in(&dir);

        #[derive(Serialize)]
        struct Bundle<'a> {
            title: &'a str,
            body: &'a str,
        }
        sink.append_json(
            "proposal",
            &Bundle {
                title: "t",
                body: "multi\nline",
            },
        )
        .unwrap();

        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(written.lines().count(), 1);
        assert!(written.starts_with("proposal={"));
        assert!(written.contains("multi\\nline"));
    }

    #[test]
    fn writes_append_rather_than_truncate() {
        let dir = tempfile::tempdir().unwrap();
        let (sink, path) = sink_in(&dir);

        sink.append_json("first", &1).unwrap();
        sink.append_json("second", &2).unwrap();

        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(written, "first=1\nsecond=2\n");
    }
}
