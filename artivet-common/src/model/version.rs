// artivet-common/src/model/version.rs
//! Build-tool style version ordering.
//!
//! A version string is split into numeric and qualifier tokens on `.`, `-`,
//! `_` and on every digit/letter boundary. Zero and release tokens are then
//! dropped from the end and from in front of every qualifier, so `1`, `1.0`
//! and `1.0.0` are all equal and `1.0.0-beta` is the same as `1-beta`.
//! Tokens are compared position by position; a missing token is a plain
//! release.
//!
//! Qualifier order: `alpha` < `beta` < `milestone` < `rc` < `snapshot` <
//! release (`ga`, `final`, `release` or nothing) < `sp` < anything else.
//! Unknown qualifiers sort lexicographically among themselves and every
//! positive number beats every qualifier.
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ArtivetError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// Decimal digits with leading zeros stripped; empty means zero.
    Number(String),
    /// Lower-cased letters.
    Qualifier(String),
}

impl Token {
    /// Tokens that carry no ordering weight at the end of a segment.
    fn is_null(&self) -> bool {
        match self {
            Token::Number(digits) => digits.is_empty(),
            Token::Qualifier(q) => matches!(q.as_str(), "" | "ga" | "final" | "release"),
        }
    }
}

/// Sort key for a single token position. Variant order is the total order.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Rank<'a> {
    PreRelease(u8),
    Release,
    ServicePack,
    Unknown(&'a str),
    Number(usize, &'a str),
}

fn rank(token: Option<&Token>) -> Rank<'_> {
    match token {
        None => Rank::Release,
        Some(Token::Number(digits)) => Rank::Number(digits.len(), digits),
        Some(Token::Qualifier(q)) => match q.as_str() {
            "alpha" | "a" => Rank::PreRelease(0),
            "beta" | "b" => Rank::PreRelease(1),
            "milestone" | "m" => Rank::PreRelease(2),
            "rc" | "cr" => Rank::PreRelease(3),
            "snapshot" => Rank::PreRelease(4),
            "" | "ga" | "final" | "release" => Rank::Release,
            "sp" => Rank::ServicePack,
            other => Rank::Unknown(other),
        },
    }
}

#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    tokens: Vec<Token>,
}

impl Version {
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            tokens: tokenize(raw),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn tokenize(raw: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = raw.trim().chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            let mut digits = String::new();
            while let Some(&d) = chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                digits.push(d);
                chars.next();
            }
            tokens.push(Token::Number(digits.trim_start_matches('0').to_string()));
        } else if matches!(c, '.' | '-' | '_') {
            chars.next();
        } else {
            let mut qualifier = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_ascii_digit() || matches!(d, '.' | '-' | '_') {
                    break;
                }
                qualifier.extend(d.to_lowercase());
                chars.next();
            }
            while tokens.last().is_some_and(Token::is_null) {
                tokens.pop();
            }
            tokens.push(Token::Qualifier(qualifier));
        }
    }
    while tokens.last().is_some_and(Token::is_null) {
        tokens.pop();
    }
    tokens
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.tokens.len().max(other.tokens.len());
        for i in 0..len {
            let ord = rank(self.tokens.get(i)).cmp(&rank(other.tokens.get(i)));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Version {
    type Err = ArtivetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ArtivetError::Parse("version", "empty version string".into()));
        }
        Ok(Self::parse(s))
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
