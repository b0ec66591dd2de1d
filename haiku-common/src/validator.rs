//! 5-7-5 structure validation
//!
//! Pure functions of their input: validating the same candidate twice
//! always yields the same verdict.

use std::collections::BTreeSet;

use crate::models::{
    HaikuCandidate, ValidationVerdict, VerdictReason, EXPECTED_SYLLABLES, LINE_COUNT,
};
use crate::syllables::count_line;

/// Validate a candidate against the 5-7-5 pattern.
///
/// A candidate without exactly three lines is rejected as
/// [`VerdictReason::WrongLineCount`] before any syllables are counted.
pub fn validate(candidate: &HaikuCandidate) -> ValidationVerdict {
    let line_count = candidate.lines.len();
    if line_count != LINE_COUNT {
        return ValidationVerdict {
            valid: false,
            reason: VerdictReason::WrongLineCount,
            line_count,
            per_line_counts: None,
            expected: EXPECTED_SYLLABLES,
            mismatches: BTreeSet::new(),
        };
    }

    let mut counts = [0u32; LINE_COUNT];
    for (slot, line) in counts.iter_mut().zip(&candidate.lines) {
        *slot = count_line(line);
    }

    let mismatches: BTreeSet<usize> = counts
        .iter()
        .zip(EXPECTED_SYLLABLES.iter())
        .enumerate()
        .filter(|(_, (actual, expected))| actual != expected)
        .map(|(i, _)| i)
        .collect();

    let valid = mismatches.is_empty();
    ValidationVerdict {
        valid,
        reason: if valid {
            VerdictReason::Valid
        } else {
            VerdictReason::SyllableMismatch
        },
        line_count,
        per_line_counts: Some(counts),
        expected: EXPECTED_SYLLABLES,
        mismatches,
    }
}

/// Parse free text (one haiku line per text line) and validate it
pub fn validate_text(text: &str) -> ValidationVerdict {
    validate(&HaikuCandidate::from_text(text))
}

/// Per-line syllable counts for lines that are already known to be a haiku
/// shape; used by the store to record counts for audit.
pub fn syllable_counts(lines: &[String; LINE_COUNT]) -> [u32; LINE_COUNT] {
    [count_line(&lines[0]), count_line(&lines[1]), count_line(&lines[2])]
}
