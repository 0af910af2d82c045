// artivet-common/src/model/artifact.rs
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::coordinate::Coordinate;
use super::version::Version;

pub const DEFAULT_TYPE: &str = "jar";
pub const DEFAULT_SCOPE: &str = "compile";

/// A specific version of a dependency, optionally backed by a local file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub coordinate: Coordinate,
    pub version: Version,
    #[serde(rename = "type", default = "default_type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file: Option<PathBuf>,
}

fn default_type() -> String {
    DEFAULT_TYPE.to_string()
}

impl Artifact {
    /// A `jar` artifact in `compile` scope.
    pub fn new(group: impl Into<String>, name: impl Into<String>, version: &str) -> Self {
        Self {
            coordinate: Coordinate::new(group, name),
            version: Version::parse(version),
            kind: DEFAULT_TYPE.to_string(),
            classifier: None,
            scope: Some(DEFAULT_SCOPE.to_string()),
            optional: false,
            file: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    pub fn with_scope(mut self, scope: Option<String>) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn group(&self) -> &str {
        &self.coordinate.group
    }

    pub fn name(&self) -> &str {
        &self.coordinate.name
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Records where the artifact was materialized. Only the first
    /// resolution sticks; an artifact never moves once it has a file.
    pub fn set_file(&mut self, file: PathBuf) {
        if self.file.is_none() {
            self.file = Some(file);
        }
    }

    /// Same coordinate and same version, regardless of file or metadata.
    pub fn same_release(&self, other: &Artifact) -> bool {
        self.coordinate == other.coordinate && self.version == other.version
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group(), self.name(), self.kind)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{classifier}")?;
        }
        write!(f, ":{}", self.version)?;
        if let Some(scope) = &self.scope {
            write!(f, ":{scope}")?;
        }
        Ok(())
    }
}
