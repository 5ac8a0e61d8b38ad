use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Collects per-game diagnostics into a single `; `-joined message.
#[derive(Debug, Clone, Default)]
pub struct ErrorAccumulator(Option<String>);

impl ErrorAccumulator {
    pub fn push(&mut self, msg: impl AsRef<str>) {
        let msg = msg.as_ref();
        match &mut self.0 {
            Some(existing) => {
                existing.push_str("; ");
                existing.push_str(msg);
            }
            None => {
                self.0 = Some(msg.to_string());
            }
        }
    }

    pub fn take(&mut self) -> Option<String> {
        self.0.take()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

/// A `[Name "value"]` line that could not be split into a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// No `]` at the end of the line.
    MissingBracket(String),
    /// No space-quote between the tag name and its value.
    MissingSeparator(String),
    /// The value is not terminated by a quote before the closing bracket.
    MissingQuote(String),
    /// The tag name is empty or contains characters outside `[A-Za-z0-9_]`.
    InvalidName(String),
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBracket(line) => write!(f, "header missing closing bracket: {line}"),
            Self::MissingSeparator(line) => write!(f, "header missing tag/value separator: {line}"),
            Self::MissingQuote(line) => write!(f, "header missing closing quote: {line}"),
            Self::InvalidName(line) => write!(f, "header has invalid tag name: {line}"),
        }
    }
}

impl Error for HeaderError {}

/// A clock or time-of-day value that is neither `H:MM:SS` nor a colon-separated triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockError {
    pub raw: String,
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid clock value '{}' (expected H:MM:SS)", self.raw)
    }
}

impl Error for ClockError {}

/// A game block that was consumed up to its boundary but could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedGame {
    /// Line number (1-based) of the first non-blank line of the block.
    pub line: usize,
    pub game_id: Option<String>,
    pub message: String,
    /// Partial tag map rendered as a JSON object.
    pub tags: String,
}

impl fmt::Display for MalformedGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed game at line {}", self.line)?;
        if let Some(id) = &self.game_id {
            write!(f, " (id {id})")?;
        }
        write!(f, ": {}; tags={}", self.message, self.tags)
    }
}

#[derive(Debug)]
pub enum ReadError {
    /// The underlying stream failed; no further games are produced.
    Io(io::Error),
    /// One game block was discarded; reading continues with the next block.
    Malformed(MalformedGame),
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read game stream: {e}"),
            Self::Malformed(game) => fmt::Display::fmt(game, f),
        }
    }
}

impl Error for ReadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Malformed(_) => None,
        }
    }
}

impl From<io::Error> for ReadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Failure writing one output batch.
#[derive(Debug)]
pub struct BatchError {
    pub path: PathBuf,
    pub source: io::Error,
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to write batch '{}': {}", self.path.display(), self.source)
    }
}

impl Error for BatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Structural failures that stop a conversion run.
#[derive(Debug)]
pub enum PipelineError {
    Openings { path: PathBuf, source: io::Error },
    Pattern(glob::PatternError),
    NoInputs(String),
    Open { path: PathBuf, source: io::Error },
    Read { path: PathBuf, source: io::Error },
    Batch(BatchError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Openings { path, source } => write!(
                f,
                "Failed to load opening table '{}': {}",
                path.display(),
                source
            ),
            Self::Pattern(e) => write!(f, "Invalid input pattern: {e}"),
            Self::NoInputs(pattern) => write!(f, "No input files match '{pattern}'"),
            Self::Open { path, source } => {
                write!(f, "Failed to open file '{}': {}", path.display(), source)
            }
            Self::Read { path, source } => {
                write!(f, "Failed to read file '{}': {}", path.display(), source)
            }
            Self::Batch(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Openings { source, .. } | Self::Open { source, .. } | Self::Read { source, .. } => {
                Some(source)
            }
            Self::Pattern(e) => Some(e),
            Self::NoInputs(_) => None,
            Self::Batch(e) => Some(e),
        }
    }
}

impl From<glob::PatternError> for PipelineError {
    fn from(e: glob::PatternError) -> Self {
        Self::Pattern(e)
    }
}

impl From<BatchError> for PipelineError {
    fn from(e: BatchError) -> Self {
        Self::Batch(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator_joins_game_diagnostics() {
        let mut diagnostics = ErrorAccumulator::default();
        diagnostics.push("truncated annotation '0:01:00'");
        diagnostics.push(ClockError { raw: "x".into() }.to_string());

        assert_eq!(
            diagnostics.take().as_deref(),
            Some("truncated annotation '0:01:00'; invalid clock value 'x' (expected H:MM:SS)")
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_default_accumulator_is_empty() {
        let mut diagnostics = ErrorAccumulator::default();
        assert!(diagnostics.is_empty());
        assert!(diagnostics.take().is_none());
    }

    #[test]
    fn test_malformed_game_reports_context() {
        let game = MalformedGame {
            line: 17,
            game_id: Some("abcd1234".to_string()),
            message: "header missing closing quote: [White \"x]".to_string(),
            tags: r#"{"Site":"https://lichess.org/abcd1234"}"#.to_string(),
        };
        let text = ReadError::Malformed(game).to_string();

        assert!(text.starts_with("malformed game at line 17 (id abcd1234): "));
        assert!(text.contains("missing closing quote"));
        assert!(text.ends_with(r#"tags={"Site":"https://lichess.org/abcd1234"}"#));
    }

    #[test]
    fn test_read_error_display_and_source() {
        let io = ReadError::from(io::Error::other("disk gone"));
        assert!(matches!(io, ReadError::Io(_)));
        assert!(io.source().is_some());

        let malformed = ReadError::Malformed(MalformedGame {
            line: 1,
            game_id: None,
            message: "bad".to_string(),
            tags: "{}".to_string(),
        });
        assert!(malformed.source().is_none());
        assert_eq!(malformed.to_string(), "malformed game at line 1: bad; tags={}");
    }
}
