//! Haiku data model
//!
//! - [`HaikuCandidate`]: transient generator output, any number of lines
//! - [`ValidationVerdict`]: result of one structural validation
//! - [`HaikuRecord`]: a persisted haiku, immutable once created

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Number of lines in a haiku
pub const LINE_COUNT: usize = 3;

/// Target syllables per line
pub const EXPECTED_SYLLABLES: [u32; LINE_COUNT] = [5, 7, 5];

/// The fixed three-line shape of a stored haiku
pub type HaikuLines = [String; LINE_COUNT];

/// Free-form candidate metadata (generation attempt, generator name, ...)
pub type CandidateMetadata = BTreeMap<String, String>;

/// Metadata key holding the 1-based generation attempt
pub const ATTEMPT_KEY: &str = "attempt";

/// A candidate haiku as produced by a generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HaikuCandidate {
    pub lines: Vec<String>,
    #[serde(default)]
    pub metadata: CandidateMetadata,
}

impl HaikuCandidate {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            metadata: CandidateMetadata::new(),
        }
    }

    /// Parse free text into a candidate, one line per text line.
    ///
    /// Generators backed by an LLM often wrap their answer in a Markdown
    /// code fence; the fence is removed first. Surrounding blank lines are
    /// ignored but blank lines inside the block are kept, so they still
    /// count against the line total.
    pub fn from_text(text: &str) -> Self {
        let body = strip_code_fence(text);
        if body.is_empty() {
            return Self::new(Vec::<String>::new());
        }
        Self::new(body.lines().map(str::trim))
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Generation attempt recorded in the metadata, if any
    pub fn attempt(&self) -> Option<u32> {
        self.metadata.get(ATTEMPT_KEY).and_then(|v| v.parse().ok())
    }

    /// The lines as a fixed-size array, or `None` unless there are exactly three
    pub fn to_lines(&self) -> Option<HaikuLines> {
        let [a, b, c]: &[String; LINE_COUNT] = self.lines.as_slice().try_into().ok()?;
        Some([a.clone(), b.clone(), c.clone()])
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string ("```text", "```haiku", ...)
    let body = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => rest,
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Unique, never-reused haiku identifier, rendered as `h-001`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct HaikuId(i64);

impl HaikuId {
    pub const PREFIX: &'static str = "h-";

    /// Wrap a store-assigned sequence number
    pub fn from_seq(seq: i64) -> Self {
        Self(seq)
    }

    pub fn seq(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for HaikuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", Self::PREFIX, self.0)
    }
}

impl FromStr for HaikuId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(Self::PREFIX)
            .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| Error::InvalidInput(format!("malformed haiku id: {s}")))?;
        let seq: i64 = digits
            .parse()
            .map_err(|_| Error::InvalidInput(format!("haiku id out of range: {s}")))?;
        if seq <= 0 {
            return Err(Error::InvalidInput(format!("haiku id out of range: {s}")));
        }
        Ok(Self(seq))
    }
}

impl TryFrom<String> for HaikuId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HaikuId> for String {
    fn from(id: HaikuId) -> Self {
        id.to_string()
    }
}

/// A persisted haiku
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HaikuRecord {
    pub id: HaikuId,
    pub lines: HaikuLines,
    pub created_at: DateTime<Utc>,
    /// Per-line syllable estimates, kept for audit
    pub syllable_counts: [u32; LINE_COUNT],
}

impl HaikuRecord {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Why a verdict came out the way it did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictReason {
    Valid,
    WrongLineCount,
    SyllableMismatch,
}

/// Structured result of validating one candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub valid: bool,
    pub reason: VerdictReason,
    /// Number of lines the candidate actually had
    pub line_count: usize,
    /// `None` when the line count was wrong; counts are never computed then
    pub per_line_counts: Option<[u32; LINE_COUNT]>,
    pub expected: [u32; LINE_COUNT],
    /// Zero-based indices of lines whose count differs from `expected`
    pub mismatches: BTreeSet<usize>,
}

impl ValidationVerdict {
    /// Structured hint for the next generation attempt
    pub fn feedback(&self) -> GenerationFeedback {
        let mismatches = match self.per_line_counts {
            Some(counts) => self
                .mismatches
                .iter()
                .map(|&line| LineMismatch {
                    line,
                    expected: self.expected[line],
                    actual: counts[line],
                })
                .collect(),
            None => Vec::new(),
        };

        GenerationFeedback {
            reason: self.reason,
            line_count: self.line_count,
            mismatches,
        }
    }
}

/// One line that missed its syllable target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineMismatch {
    pub line: usize,
    pub expected: u32,
    pub actual: u32,
}

/// Hint passed back to the generator after a failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationFeedback {
    pub reason: VerdictReason,
    pub line_count: usize,
    pub mismatches: Vec<LineMismatch>,
}

impl GenerationFeedback {
    /// One-sentence, human-readable summary suitable for a prompt
    pub fn summary(&self) -> String {
        match self.reason {
            VerdictReason::Valid => "The haiku is valid.".to_string(),
            VerdictReason::WrongLineCount => format!(
                "A haiku has exactly {} lines, but {} were given.",
                LINE_COUNT, self.line_count
            ),
            VerdictReason::SyllableMismatch => {
                let parts: Vec<String> = self
                    .mismatches
                    .iter()
                    .map(|m| {
                        format!(
                            "line {} has {} syllables instead of {}",
                            m.line + 1,
                            m.actual,
                            m.expected
                        )
                    })
                    .collect();
                format!("Follow the 5-7-5 pattern: {}.", parts.join("; "))
            }
        }
    }
}
