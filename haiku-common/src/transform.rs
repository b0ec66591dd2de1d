//! Haiku text utilities
//!
//! Whole-text case changes plus two line-preserving effects.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::Error;

/// Available text transformations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformCommand {
    /// Uppercase everything
    Louder,
    /// Lowercase everything
    Quieter,
    /// Alternate lower/upper case per character, line by line
    Spooky,
    /// Put a period after every word
    Choppy,
}

impl TransformCommand {
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Louder => louder(text),
            Self::Quieter => quieter(text),
            Self::Spooky => spooky_case(text),
            Self::Choppy => make_choppy(text),
        }
    }
}

impl FromStr for TransformCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "louder" => Ok(Self::Louder),
            "quieter" => Ok(Self::Quieter),
            "spooky" | "spooky_case" => Ok(Self::Spooky),
            "choppy" | "make_choppy" => Ok(Self::Choppy),
            other => Err(Error::InvalidInput(format!("unknown transform: {other}"))),
        }
    }
}

pub fn louder(text: &str) -> String {
    text.to_uppercase()
}

pub fn quieter(text: &str) -> String {
    text.to_lowercase()
}

/// `"hello world\nnew line"` becomes `"hElLo wOrLd\nnEw lInE"`.
///
/// Character positions restart at zero on each line.
pub fn spooky_case(text: &str) -> String {
    text.lines()
        .map(|line| {
            line.chars()
                .enumerate()
                .flat_map(|(i, c)| {
                    let mapped: Vec<char> = if i % 2 == 1 {
                        c.to_uppercase().collect()
                    } else {
                        c.to_lowercase().collect()
                    };
                    mapped
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `"Hello world\nAnother line"` becomes `"Hello. world.\nAnother. line."`.
///
/// Blank lines stay blank.
pub fn make_choppy(text: &str) -> String {
    text.lines()
        .map(|line| {
            let words: Vec<&str> = line.split_whitespace().collect();
            if words.is_empty() {
                String::new()
            } else {
                format!("{}.", words.join(". "))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_louder_and_quieter() {
        assert_eq!(louder("An old pond\nsplash"), "AN OLD POND\nSPLASH");
        assert_eq!(quieter("An OLD Pond"), "an old pond");
    }

    #[test]
    fn test_spooky_case() {
        assert_eq!(spooky_case("hello world\nnew line"), "hElLo wOrLd\nnEw lInE");
        assert_eq!(spooky_case("ABC"), "aBc");
    }

    #[test]
    fn test_make_choppy() {
        assert_eq!(make_choppy("Hello world\nAnother line"), "Hello. world.\nAnother. line.");
        assert_eq!(make_choppy("one\n   \ntwo three"), "one.\n\ntwo. three.");
    }

    #[test]
    fn test_command_parse_and_apply() {
        assert_eq!("LOUDER".parse::<TransformCommand>().unwrap(), TransformCommand::Louder);
        assert_eq!("spooky_case".parse::<TransformCommand>().unwrap(), TransformCommand::Spooky);
        assert!("whisper".parse::<TransformCommand>().is_err());
        assert_eq!(TransformCommand::Choppy.apply("a b"), "a. b.");
    }
}
