//! Text language classification.
//!
//! The classifier is a black box: text in, label (and maybe a score) out.
//! Any line may fail on its own without affecting the rest of the batch.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use super::normalize::NormalizedLine;

/// Errors from a classification call. Always scoped to one line.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OracleError {
    /// The classifier process could not be started.
    #[error("Failed to run {tool}: {message}")]
    Spawn { tool: String, message: String },

    /// The classifier exited with an error.
    #[error("{tool} failed with exit code {exit_code}: {message}")]
    Failed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// No prediction came back for this line.
    #[error("No prediction for line {line}")]
    MissingOutput { line: usize },

    /// A prediction line could not be parsed.
    #[error("Unparseable prediction for line {line}: '{output}'")]
    Unparseable { line: usize, output: String },
}

/// A classifier verdict for one line.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Language label as the classifier emits it (e.g. "en").
    pub label: String,
    /// Probability, when the classifier reports one.
    pub score: Option<f32>,
}

impl Classification {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            score: None,
        }
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }
}

/// Maps a normalized text line to a language label.
pub trait ClassificationOracle {
    /// Classify one line.
    fn classify(&self, text: &str) -> Result<Classification, OracleError>;

    /// Classify a batch, one result per input line in input order.
    ///
    /// The default calls `classify` per line. Implementations backed by a
    /// process should override it to pay the startup cost once.
    fn classify_batch(&self, lines: &[NormalizedLine]) -> Vec<Result<Classification, OracleError>> {
        lines.iter().map(|line| self.classify(line.as_str())).collect()
    }
}

/// fasttext CLI language identification (`fasttext predict-prob <model> - 1`).
#[derive(Debug, Clone)]
pub struct FastTextOracle {
    binary: PathBuf,
    model: PathBuf,
}

impl FastTextOracle {
    pub fn new(binary: impl Into<PathBuf>, model: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &PathBuf {
        &self.model
    }

    fn tool_name(&self) -> String {
        self.binary.display().to_string()
    }

    /// Run fasttext over all lines at once, returning its stdout.
    fn predict(&self, input: String) -> Result<String, OracleError> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("predict-prob")
            .arg(&self.model)
            .arg("-")
            .arg("1")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!("Running fasttext: {:?}", cmd);

        let mut child = cmd.spawn().map_err(|e| OracleError::Spawn {
            tool: self.tool_name(),
            message: e.to_string(),
        })?;

        // Feed stdin from a separate thread so a full stdout pipe cannot stall us
        let stdin = child.stdin.take();
        let writer = std::thread::spawn(move || {
            if let Some(mut stdin) = stdin {
                let _ = stdin.write_all(input.as_bytes());
            }
        });

        let mut stdout = String::new();
        if let Some(mut out) = child.stdout.take() {
            out.read_to_string(&mut stdout).map_err(|e| OracleError::Spawn {
                tool: self.tool_name(),
                message: format!("Failed to read output: {}", e),
            })?;
        }
        let _ = writer.join();

        let output = child.wait_with_output().map_err(|e| OracleError::Spawn {
            tool: self.tool_name(),
            message: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(OracleError::Failed {
                tool: self.tool_name(),
                exit_code: output.status.code().unwrap_or(-1),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(stdout)
    }
}

impl ClassificationOracle for FastTextOracle {
    fn classify(&self, text: &str) -> Result<Classification, OracleError> {
        let stdout = self.predict(format!("{}\n", text))?;
        let first = stdout.lines().next().ok_or(OracleError::MissingOutput { line: 1 })?;
        parse_prediction(first, 1)
    }

    fn classify_batch(&self, lines: &[NormalizedLine]) -> Vec<Result<Classification, OracleError>> {
        if lines.is_empty() {
            return Vec::new();
        }

        let mut input = String::new();
        for line in lines {
            input.push_str(line.as_str());
            input.push('\n');
        }

        let stdout = match self.predict(input) {
            Ok(out) => out,
            Err(e) => return vec![Err(e); lines.len()],
        };

        let mut outputs = stdout.lines();
        (1..=lines.len())
            .map(|n| match outputs.next() {
                Some(out) => parse_prediction(out, n),
                None => Err(OracleError::MissingOutput { line: n }),
            })
            .collect()
    }
}

/// Parse `__label__en 0.98` into a classification.
pub fn parse_prediction(output: &str, line: usize) -> Result<Classification, OracleError> {
    let unparseable = || OracleError::Unparseable {
        line,
        output: output.to_string(),
    };

    let mut parts = output.split_whitespace();
    let label = parts
        .next()
        .and_then(|l| l.strip_prefix("__label__"))
        .filter(|l| !l.is_empty())
        .ok_or_else(unparseable)?;

    let mut classification = Classification::new(label);
    if let Some(score) = parts.next() {
        classification = classification.with_score(score.parse().map_err(|_| unparseable())?);
    }

    Ok(classification)
}
