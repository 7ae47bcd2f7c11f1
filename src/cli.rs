use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{start_api, ApiState};
use crate::config::Config;
use crate::repository::{BuildRepository, InMemoryBuildRepository};
use crate::sync::UpdatingService;

#[derive(Parser)]
#[command(name = "fourkeys")]
#[command(author, version, about = "CI/CD four key metrics service", long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind, overriding the configuration file
    #[arg(long, env = "FOURKEYS_HOST")]
    host: Option<String>,

    /// Port to bind, overriding the configuration file
    #[arg(short, long, env = "FOURKEYS_PORT")]
    port: Option<u16>,
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        let mut config = Config::load(self.config.as_deref())?;

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        if config.pipelines.is_empty() {
            warn!("No pipelines configured; POST /api/build will have nothing to sync");
        }
        info!(
            "Tracking {} pipelines against {}",
            config.pipelines.len(),
            config.jenkins.base_url
        );

        let repository: Arc<dyn BuildRepository> = Arc::new(InMemoryBuildRepository::new());
        let updater = Arc::new(UpdatingService::new(&config, Arc::clone(&repository))?);

        let state = ApiState {
            repository,
            updater,
        };
        start_api(state, &config.server.host, config.server.port).await?;

        Ok(())
    }
}
