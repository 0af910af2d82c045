// artivet-core/src/graph/document.rs
use std::path::Path;

use artivet_common::dependency::{DependencyNode, GraphNode, LegacyNode};
use artivet_common::error::Result;
use serde_json::Value;
use tracing::debug;

/// Layout of a tree document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeFormat {
    /// Pick per document: nodes carrying a `dependency` object are graph
    /// nodes, everything else is legacy.
    #[default]
    Auto,
    Legacy,
    Graph,
}

fn detect(document: &Value) -> TreeFormat {
    match document.get("dependency") {
        Some(Value::Object(_)) => TreeFormat::Graph,
        _ => TreeFormat::Legacy,
    }
}

pub(crate) fn parse_tree(document: Value, format: TreeFormat) -> Result<DependencyNode> {
    let format = match format {
        TreeFormat::Auto => detect(&document),
        explicit => explicit,
    };
    debug!("Reading tree document as {:?}", format);
    match format {
        TreeFormat::Graph => {
            let node: GraphNode = serde_json::from_value(document)?;
            DependencyNode::try_from(&node)
        }
        _ => {
            let node: LegacyNode = serde_json::from_value(document)?;
            Ok(DependencyNode::from(&node))
        }
    }
}

pub(crate) fn load_tree(path: &Path, format: TreeFormat) -> Result<DependencyNode> {
    let document: Value = artivet_aio::read_json(path)?;
    parse_tree(document, format)
}

#[cfg(test)]
mod tests {
    use artivet_common::error::ArtivetError;
    use serde_json::json;

    use super::*;

    #[test]
    fn graph_documents_are_detected() {
        let doc = json!({
            "dependency": { "artifact": "org.acme:app:1.0" },
            "children": [
                { "dependency": { "artifact": "com.acme:a1:jar:tests:2.0", "scope": "test" } }
            ]
        });
        let root = parse_tree(doc, TreeFormat::Auto).unwrap();
        let child = root.children()[0].artifact();
        assert_eq!(child.to_string(), "com.acme:a1:jar:tests:2.0:test");
    }

    #[test]
    fn legacy_documents_are_detected() {
        let doc = json!({
            "groupId": "org.acme",
            "artifactId": "app",
            "version": "1.0",
            "children": [{ "groupId": "com.acme", "artifactId": "a1", "version": "1.1" }]
        });
        let root = parse_tree(doc, TreeFormat::Auto).unwrap();
        assert_eq!(root.artifact().name(), "app");
        assert_eq!(root.children()[0].artifact().version.as_str(), "1.1");
    }

    #[test]
    fn forcing_the_wrong_format_fails() {
        let doc = json!({ "dependency": { "artifact": "org.acme:app:1.0" } });
        assert!(matches!(
            parse_tree(doc, TreeFormat::Legacy),
            Err(ArtivetError::Json(_))
        ));
    }

    #[test]
    fn bad_coordinates_are_a_parse_error() {
        let doc = json!({ "dependency": { "artifact": "org.acme" } });
        assert!(matches!(
            parse_tree(doc, TreeFormat::Graph),
            Err(ArtivetError::Parse(..))
        ));
    }
}
