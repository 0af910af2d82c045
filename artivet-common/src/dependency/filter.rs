// artivet-common/src/dependency/filter.rs
//! Predicates deciding which artifacts a graph builder keeps.
use glob::Pattern;

use crate::error::{ArtivetError, Result};
use crate::model::Artifact;

pub trait ArtifactFilter {
    fn include(&self, artifact: &Artifact) -> bool;
}

impl<F: Fn(&Artifact) -> bool> ArtifactFilter for F {
    fn include(&self, artifact: &Artifact) -> bool {
        self(artifact)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl ArtifactFilter for AcceptAll {
    fn include(&self, _artifact: &Artifact) -> bool {
        true
    }
}

/// `group[:name[:type[:version]]]`, each segment a glob. Missing trailing
/// segments match anything.
#[derive(Debug, Clone)]
pub struct ArtifactPattern {
    source: String,
    segments: Vec<Pattern>,
}

impl ArtifactPattern {
    pub fn parse(source: &str) -> Result<Self> {
        let parts: Vec<&str> = source.split(':').collect();
        if parts.len() > 4 || parts.iter().any(|p| p.is_empty()) {
            return Err(ArtivetError::Pattern(
                source.to_string(),
                "expected group[:name[:type[:version]]]".to_string(),
            ));
        }
        let segments = parts
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ArtivetError::Pattern(source.to_string(), e.to_string()))?;
        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, artifact: &Artifact) -> bool {
        let fields = [
            artifact.group(),
            artifact.name(),
            artifact.kind.as_str(),
            artifact.version.as_str(),
        ];
        self.segments
            .iter()
            .zip(fields)
            .all(|(pattern, field)| pattern.matches(field))
    }
}

fn parse_all(patterns: &[String]) -> Result<Vec<ArtifactPattern>> {
    patterns.iter().map(|p| ArtifactPattern::parse(p)).collect()
}

/// Keeps artifacts matching at least one pattern; no patterns keeps all.
#[derive(Debug, Clone)]
pub struct IncludesFilter {
    patterns: Vec<ArtifactPattern>,
}

impl IncludesFilter {
    pub fn new(patterns: &[String]) -> Result<Self> {
        Ok(Self {
            patterns: parse_all(patterns)?,
        })
    }
}

impl ArtifactFilter for IncludesFilter {
    fn include(&self, artifact: &Artifact) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.matches(artifact))
    }
}

/// Drops artifacts matching any pattern.
#[derive(Debug, Clone)]
pub struct ExcludesFilter {
    patterns: Vec<ArtifactPattern>,
}

impl ExcludesFilter {
    pub fn new(patterns: &[String]) -> Result<Self> {
        Ok(Self {
            patterns: parse_all(patterns)?,
        })
    }
}

impl ArtifactFilter for ExcludesFilter {
    fn include(&self, artifact: &Artifact) -> bool {
        !self.patterns.iter().any(|p| p.matches(artifact))
    }
}

#[derive(Debug, Clone)]
pub struct TypeFilter {
    kind: String,
}

impl TypeFilter {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

impl ArtifactFilter for TypeFilter {
    fn include(&self, artifact: &Artifact) -> bool {
        artifact.kind == self.kind
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OptionalFilter {
    include_optional: bool,
}

impl OptionalFilter {
    pub fn new(include_optional: bool) -> Self {
        Self { include_optional }
    }
}

impl ArtifactFilter for OptionalFilter {
    fn include(&self, artifact: &Artifact) -> bool {
        self.include_optional || !artifact.optional
    }
}

/// Every inner filter must accept.
#[derive(Default)]
pub struct AndFilter {
    filters: Vec<Box<dyn ArtifactFilter>>,
}

impl AndFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filter: impl ArtifactFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl ArtifactFilter for AndFilter {
    fn include(&self, artifact: &Artifact) -> bool {
        self.filters.iter().all(|f| f.include(artifact))
    }
}
