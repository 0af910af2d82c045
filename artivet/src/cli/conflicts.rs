// artivet/src/cli/conflicts.rs
use std::collections::BTreeMap;

use artivet_common::config::Config;
use artivet_common::dependency::{
    collect_resolved, DependencyNode, DependencyVisitor, GraphBuilder, GraphRequest,
    ProjectContext,
};
use artivet_common::error::Result;
use artivet_common::model::{Coordinate, Version};
use artivet_core::TreeDocumentBuilder;
use clap::Args;
use colored::Colorize;
use prettytable::{format, Cell, Row, Table};

use super::{FilterArgs, TreeSource};

#[derive(Debug, Args)]
pub struct Conflicts {
    #[command(flatten)]
    pub source: TreeSource,

    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Every distinct version text seen per coordinate, in encounter order.
#[derive(Debug, Default)]
struct VersionCollector {
    seen: BTreeMap<Coordinate, Vec<Version>>,
}

impl DependencyVisitor for VersionCollector {
    fn leave(&mut self, node: &DependencyNode) -> bool {
        let artifact = node.artifact();
        let versions = self.seen.entry(artifact.coordinate.clone()).or_default();
        if !versions.iter().any(|v| v.as_str() == artifact.version.as_str()) {
            versions.push(artifact.version.clone());
        }
        true
    }
}

#[derive(Debug, PartialEq)]
struct Conflict {
    coordinate: Coordinate,
    versions: Vec<Version>,
    winner: Version,
}

fn find_conflicts(root: &DependencyNode) -> Vec<Conflict> {
    let mut collector = VersionCollector::default();
    root.accept(&mut collector);
    let resolved = collect_resolved(root);
    collector
        .seen
        .into_iter()
        .filter(|(_, versions)| versions.len() > 1)
        .filter_map(|(coordinate, versions)| {
            let winner = resolved.get(&coordinate)?.version.clone();
            Some(Conflict {
                coordinate,
                versions,
                winner,
            })
        })
        .collect()
}

impl Conflicts {
    pub fn run(&self, config: &Config) -> Result<()> {
        let request = GraphRequest::raw(ProjectContext::from_descriptor(&self.source.path));
        let root = TreeDocumentBuilder::new()
            .with_format(self.source.format.into())
            .with_repository(config.repository())
            .build_graph(&request, &self.filters.build()?)?;

        let conflicts = find_conflicts(&root);
        if conflicts.is_empty() {
            println!("{}", "No version conflicts".green());
            return Ok(());
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
        table.add_row(Row::new(vec![
            Cell::new("Coordinate").style_spec("b"),
            Cell::new("Versions").style_spec("b"),
            Cell::new("Selected").style_spec("b"),
        ]));
        for conflict in &conflicts {
            let versions = conflict
                .versions
                .iter()
                .map(Version::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            table.add_row(Row::new(vec![
                Cell::new(&conflict.coordinate.to_string()),
                Cell::new(&versions),
                Cell::new(conflict.winner.as_str()).style_spec("Fg"),
            ]));
        }
        table.printstd();
        println!("{} coordinates with conflicting versions", conflicts.len());
        Ok(())
    }
}
