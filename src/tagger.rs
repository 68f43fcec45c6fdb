use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use crate::config::DEFAULT_CRF_TEST;

#[derive(Debug, Error)]
pub enum TaggerError {
    #[error("failed to run tagger: {0}")]
    Io(#[from] std::io::Error),
    /// Display is exactly what the tagger printed.
    #[error("{output}")]
    Failed {
        status: Option<ExitStatus>,
        output: String,
    },
}

impl TaggerError {
    pub fn failed(output: impl Into<String>) -> Self {
        TaggerError::Failed {
            status: None,
            output: output.into(),
        }
    }
}

/// Labels a tagger input table with a trained model.
pub trait Tagger: Send + Sync {
    fn tag(&self, model: &Path, input: &str) -> Result<String, TaggerError>;
}

/// Runs CRF++'s `crf_test -v 1` over a temporary copy of the input table.
#[derive(Clone, Debug)]
pub struct CrfTestTagger {
    program: PathBuf,
}

impl Default for CrfTestTagger {
    fn default() -> Self {
        Self::new(DEFAULT_CRF_TEST)
    }
}

impl CrfTestTagger {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Tagger for CrfTestTagger {
    fn tag(&self, model: &Path, input: &str) -> Result<String, TaggerError> {
        let mut data = NamedTempFile::new()?;
        data.write_all(input.as_bytes())?;
        data.flush()?;

        debug!(
            program = %self.program.display(),
            model = %model.display(),
            data = %data.path().display(),
            "running crf_test"
        );
        let result = Command::new(&self.program)
            .arg("-v")
            .arg("1")
            .arg("-m")
            .arg(model)
            .arg(data.path())
            .stdin(Stdio::null())
            .output()?;

        if !result.status.success() {
            debug!(status = %result.status, "crf_test failed");
            // crf_test reports problems on either stream; keep them together.
            let mut combined = result.stdout;
            combined.extend_from_slice(&result.stderr);
            return Err(TaggerError::Failed {
                status: Some(result.status),
                output: String::from_utf8_lossy(&combined).into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&result.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_displays_collaborator_output() {
        let err = TaggerError::failed("open failed: file");
        assert_eq!(err.to_string(), "open failed: file");
    }

    #[test]
    fn missing_program_is_io_error() {
        let tagger = CrfTestTagger::new("/nonexistent/crf_test");
        let err = tagger
            .tag(Path::new("/path/to/model"), "salt\tI1\tL4\tNoCAP\tNoPAREN\n")
            .unwrap_err();
        assert!(matches!(err, TaggerError::Io(_)));
    }
}
