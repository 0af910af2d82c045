// artivet/src/cli.rs
//! Defines the command-line argument structure using clap.
use std::path::PathBuf;

use artivet_common::dependency::{
    AndFilter, DependencyNode, ExcludesFilter, IncludesFilter, OptionalFilter, TypeFilter,
};
use artivet_common::error::Result;
use artivet_common::Config;
use artivet_core::TreeFormat;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

pub mod conflicts;
pub mod resolve;
pub mod tree;

use crate::cli::conflicts::Conflicts;
use crate::cli::resolve::ResolveArgs;
use crate::cli::tree::Tree;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "artivet", bin_name = "artivet")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve and validate every dependency of a project
    Resolve(ResolveArgs),
    /// Print a dependency tree without downloading anything
    Tree(Tree),
    /// List coordinates that appear at more than one version
    Conflicts(Conflicts),
}

impl Command {
    pub fn run(&self, config: &Config) -> Result<()> {
        match self {
            Self::Resolve(command) => command.run(config),
            Self::Tree(command) => command.run(config),
            Self::Conflicts(command) => command.run(config),
        }
    }
}

/// Where the tree comes from and how to read it. Shared by every command.
#[derive(Args, Debug)]
pub struct TreeSource {
    /// JSON document holding the exported dependency tree
    #[arg(value_name = "TREE_FILE")]
    pub path: PathBuf,

    /// Layout of the tree document
    #[arg(id = "tree_format", long = "tree-format", value_enum, default_value_t = DocumentFormat::Auto)]
    pub format: DocumentFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Auto,
    Legacy,
    Graph,
}

impl From<DocumentFormat> for TreeFormat {
    fn from(format: DocumentFormat) -> Self {
        match format {
            DocumentFormat::Auto => TreeFormat::Auto,
            DocumentFormat::Legacy => TreeFormat::Legacy,
            DocumentFormat::Graph => TreeFormat::Graph,
        }
    }
}

/// Artifact selection flags.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Keep only artifacts matching group[:name[:type[:version]]] (repeatable)
    #[arg(long = "include", value_name = "PATTERN")]
    pub include: Vec<String>,

    /// Drop artifacts matching group[:name[:type[:version]]] (repeatable)
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Keep only artifacts of this type
    #[arg(long = "type", value_name = "TYPE")]
    pub kind: Option<String>,

    #[arg(long)]
    pub include_optional: bool,
}

impl FilterArgs {
    pub fn build(&self) -> Result<AndFilter> {
        let mut filter = AndFilter::new()
            .with(IncludesFilter::new(&self.include)?)
            .with(ExcludesFilter::new(&self.exclude)?)
            .with(OptionalFilter::new(self.include_optional));
        if let Some(kind) = &self.kind {
            filter = filter.with(TypeFilter::new(kind));
        }
        Ok(filter)
    }
}

/// Indented rendering of a tree, one artifact per line.
pub fn render_tree(root: &DependencyNode) -> String {
    fn walk(node: &DependencyNode, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&node.artifact().to_string());
        out.push('\n');
        for child in node.children() {
            walk(child, depth + 1, out);
        }
    }
    let mut out = String::new();
    walk(root, 0, &mut out);
    out
}
