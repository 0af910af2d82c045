// artivet/src/cli/resolve.rs
use std::path::PathBuf;

use artivet_common::config::Config;
use artivet_common::dependency::{collect_resolved, DependencyNode, ProjectContext};
use artivet_common::error::Result;
use artivet_common::model::Artifact;
use artivet_core::{DependencyResolver, LocalStorage, ResolutionContext, TreeDocumentBuilder};
use artivet_net::RemoteArtifactResolver;
use clap::{Args, ValueEnum};
use colored::Colorize;
use prettytable::{format, Cell, Row, Table};
use serde::Serialize;
use tracing::instrument;

use super::{FilterArgs, TreeSource};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Plain,
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub source: TreeSource,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Resolution passes before giving up on corrupted downloads
    /// (defaults to the configured max_attempts)
    #[arg(long, allow_negative_numbers = true)]
    pub attempts: Option<i32>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Also write the resolved artifacts as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ResolvedEntry {
    artifact: String,
    version: String,
    file: Option<PathBuf>,
    size: Option<u64>,
}

#[derive(Debug, Serialize)]
struct ResolutionReport {
    project: String,
    artifacts: Vec<ResolvedEntry>,
}

impl ResolvedEntry {
    fn from_artifact(artifact: &Artifact) -> Self {
        let file = artifact.file().map(|p| p.to_path_buf());
        let size = file.as_deref().and_then(|p| artivet_aio::file_len(p).ok());
        Self {
            artifact: artifact.to_string(),
            version: artifact.version.to_string(),
            file,
            size,
        }
    }
}

/// Winning non-root artifacts of a validated tree, in resolution order.
fn resolved_entries(root: &DependencyNode) -> Vec<ResolvedEntry> {
    collect_resolved(root)
        .without(&root.artifact().coordinate)
        .iter()
        .map(ResolvedEntry::from_artifact)
        .collect()
}

impl ResolveArgs {
    #[instrument(skip(self, config), fields(tree = %self.source.path.display()))]
    pub fn run(&self, config: &Config) -> Result<()> {
        let filter = self.filters.build()?;
        let builder = TreeDocumentBuilder::new()
            .with_format(self.source.format.into())
            .with_repository(config.repository());
        let artifact_resolver = RemoteArtifactResolver::from_config(config)?;
        let project = ProjectContext::from_descriptor(&self.source.path);
        let attempts = self.attempts.unwrap_or(config.max_attempts);

        println!(
            "{}{}",
            "==> ".bold().blue(),
            format!("Resolving {}", project.name).bold()
        );
        let resolver = DependencyResolver::new(ResolutionContext {
            project,
            graph_builder: &builder,
            filter: &filter,
            artifact_resolver: &artifact_resolver,
            storage: &LocalStorage,
        });
        let root = resolver.resolve(attempts)?;
        let entries = resolved_entries(&root);

        match self.format {
            OutputFormat::Table => print_table(&entries),
            OutputFormat::Plain => print_plain(&entries),
        }
        println!(
            "{}{}",
            "==> ".bold().green(),
            format!("{} artifacts resolved", entries.len()).bold()
        );

        if let Some(path) = &self.report {
            let report = ResolutionReport {
                project: resolver.project().to_string(),
                artifacts: entries,
            };
            artivet_aio::write_json(path, &report)?;
            println!("Report written to {}", path.display());
        }
        Ok(())
    }
}

fn print_table(entries: &[ResolvedEntry]) {
    if entries.is_empty() {
        println!("{}", "No dependencies".yellow());
        return;
    }
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.add_row(Row::new(vec![
        Cell::new("Artifact").style_spec("b"),
        Cell::new("Version").style_spec("b"),
        Cell::new("File").style_spec("b"),
        Cell::new("Size").style_spec("b"),
    ]));
    for entry in entries {
        table.add_row(Row::new(vec![
            Cell::new(&entry.artifact),
            Cell::new(&entry.version),
            Cell::new(
                &entry
                    .file
                    .as_ref()
                    .map_or_else(|| "-".to_string(), |p| p.display().to_string()),
            ),
            Cell::new(&entry.size.map_or_else(|| "-".to_string(), |s| s.to_string())).style_spec("r"),
        ]));
    }
    table.printstd();
}

fn print_plain(entries: &[ResolvedEntry]) {
    for entry in entries {
        match &entry.file {
            Some(file) => println!("{} {}", entry.artifact, file.display()),
            None => println!("{}", entry.artifact),
        }
    }
}
