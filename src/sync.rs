use std::sync::Arc;

use chrono::Utc;
use futures::future::try_join_all;
use log::info;

use crate::config::Config;
use crate::error::Result;
use crate::providers::JenkinsClient;
use crate::repository::BuildRepository;

/// Refreshes stored build data from Jenkins for the configured pipelines.
pub struct UpdatingService {
    repository: Arc<dyn BuildRepository>,
    targets: Vec<SyncTarget>,
}

struct SyncTarget {
    pipeline_id: String,
    client: JenkinsClient,
}

impl UpdatingService {
    /// Build one Jenkins client per configured pipeline.
    pub fn new(config: &Config, repository: Arc<dyn BuildRepository>) -> Result<Self> {
        let credentials = config.jenkins.credentials();

        let targets = config
            .pipelines
            .iter()
            .map(|pipeline| {
                let client = JenkinsClient::new(
                    &config.jenkins.base_url,
                    &pipeline.job,
                    credentials.clone(),
                )?;
                Ok(SyncTarget {
                    pipeline_id: pipeline.id.clone(),
                    client,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            repository,
            targets,
        })
    }

    /// Refresh every configured pipeline and return the completion timestamp
    /// in epoch seconds.
    ///
    /// Pipelines sync concurrently. Any failure fails the whole update:
    /// callers get either a timestamp covering all pipelines or an error,
    /// never a partial result.
    pub async fn update(&self) -> Result<i64> {
        try_join_all(self.targets.iter().map(|target| self.sync_target(target))).await?;

        Ok(Utc::now().timestamp())
    }

    async fn sync_target(&self, target: &SyncTarget) -> Result<()> {
        let runs = target.client.fetch_runs().await?;

        let mut builds = Vec::with_capacity(runs.len());
        for run in runs {
            let commit_id = target
                .client
                .fetch_commit_id(&run.id)
                .await?
                .unwrap_or_default();
            let url = target.client.run_url(&run.id);
            builds.push(run.into_build(&target.pipeline_id, url, commit_id));
        }

        info!(
            "Synced {} builds for pipeline: {}",
            builds.len(),
            target.pipeline_id
        );
        self.repository.save_builds(&target.pipeline_id, builds);

        Ok(())
    }
}
