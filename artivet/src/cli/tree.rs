// artivet/src/cli/tree.rs
use artivet_common::config::Config;
use artivet_common::dependency::{GraphBuilder, GraphRequest, GraphTransform, ProjectContext};
use artivet_common::error::Result;
use artivet_core::TreeDocumentBuilder;
use clap::Args;

use super::{render_tree, FilterArgs, TreeSource};

#[derive(Debug, Args)]
pub struct Tree {
    #[command(flatten)]
    pub source: TreeSource,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Apply nearest-wins conflict resolution before printing
    #[arg(long)]
    pub transform: bool,
}

impl Tree {
    pub fn run(&self, config: &Config) -> Result<()> {
        let request = GraphRequest {
            project: ProjectContext::from_descriptor(&self.source.path),
            transform: if self.transform {
                GraphTransform::ConflictResolution
            } else {
                GraphTransform::None
            },
        };
        let root = TreeDocumentBuilder::new()
            .with_format(self.source.format.into())
            .with_repository(config.repository())
            .build_graph(&request, &self.filters.build()?)?;
        print!("{}", render_tree(&root));
        Ok(())
    }
}
