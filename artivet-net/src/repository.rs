// artivet-net/src/repository.rs
use std::path::PathBuf;

use artivet_common::config::Config;
use artivet_common::error::{ArtivetError, Result};
use artivet_common::model::Artifact;
use artivet_common::repository::{ArtifactResolver, LocalRepository};
use reqwest::blocking::Client;
use tracing::{debug, error};
use url::Url;

use crate::http::{build_http_client, download_to};
use crate::validation::validate_url;

/// Resolves artifacts into a local repository, downloading missing files
/// from a list of remote repositories tried in order.
pub struct RemoteArtifactResolver {
    local: LocalRepository,
    remotes: Vec<Url>,
    client: Client,
}

impl RemoteArtifactResolver {
    pub fn new(local: LocalRepository, remotes: &[String], allow_insecure: bool) -> Result<Self> {
        Self::with_client(local, remotes, allow_insecure, build_http_client()?)
    }

    pub fn with_client(
        local: LocalRepository,
        remotes: &[String],
        allow_insecure: bool,
        client: Client,
    ) -> Result<Self> {
        let remotes = remotes
            .iter()
            .map(|r| validate_url(r, allow_insecure))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            local,
            remotes,
            client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.repository(),
            &config.remote_repositories,
            config.allow_insecure,
        )
    }

    fn remote_url(base: &Url, relative: &str) -> String {
        format!("{}/{}", base.as_str().trim_end_matches('/'), relative)
    }
}

impl ArtifactResolver for RemoteArtifactResolver {
    fn resolve_artifact(&self, artifact: &Artifact) -> Result<PathBuf> {
        let target = self.local.artifact_path(artifact);
        if artivet_aio::is_file(&target) && artivet_aio::file_len(&target)? > 0 {
            debug!("Using local file for {}: {}", artifact, target.display());
            return Ok(target);
        }

        let relative = LocalRepository::relative_path(artifact);
        let mut last_error: Option<ArtivetError> = None;
        for remote in &self.remotes {
            let url = Self::remote_url(remote, &relative);
            debug!("Attempting download of {} from: {}", artifact, url);
            match download_to(&self.client, &url, &target) {
                Ok(_) => return Ok(target),
                Err(e) => {
                    error!("Download attempt failed from {}: {}", url, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ArtivetError::Download(
                artifact.to_string(),
                relative,
                "No remote repositories configured.".to_string(),
            )
        }))
    }
}
