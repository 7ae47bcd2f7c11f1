use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use url::Url;

use crate::error::{FourKeysError, Result};
use crate::models::Status;

use super::types::JenkinsRun;

/// Jenkins API client for fetching pipeline run data.
#[derive(Clone)]
pub struct JenkinsClient {
    /// HTTP client
    client: reqwest::Client,
    /// Jenkins instance base URL
    base_url: Url,
    /// Job the client reads runs from
    job: String,
    /// Basic-auth pair (username, API token)
    credentials: Option<(String, String)>,
}

impl JenkinsClient {
    /// Create a new Jenkins API client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Jenkins instance base URL (e.g., "https://jenkins.example.com")
    /// * `job` - Name of the job to read runs from
    /// * `credentials` - Optional (username, API token) pair for basic auth
    ///
    /// # Returns
    ///
    /// A configured Jenkins API client.
    pub fn new(base_url: &str, job: &str, credentials: Option<(String, String)>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("fourkeys/0.3"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| FourKeysError::Config(format!("Failed to create HTTP client: {e}")))?;

        let base_url = Url::parse(base_url)
            .map_err(|e| FourKeysError::Config(format!("Invalid base URL: {e}")))?;

        Ok(Self {
            client,
            base_url,
            job: job.to_string(),
            credentials,
        })
    }

    /// Fetch completed pipeline runs for the job.
    ///
    /// In-progress runs are dropped: their stage set is still changing and
    /// they carry no final outcome worth storing.
    pub async fn fetch_runs(&self) -> Result<Vec<JenkinsRun>> {
        let url = self.job_url("wfapi/runs?fullStages=true")?;
        debug!("Fetching runs for job {} from {url}", self.job);

        let response = self.auth_request(self.client.get(url)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FourKeysError::Api {
                status: status.as_u16(),
                message: read_error_body(response).await,
            });
        }

        let runs: Vec<JenkinsRun> = response.json().await?;

        Ok(runs
            .into_iter()
            .filter(|run| run.status != Status::InProgress)
            .collect())
    }

    /// Resolve the commit SHA a run was built from.
    ///
    /// Returns `None` for runs without SCM data, e.g. manually triggered jobs
    /// that perform no checkout.
    pub async fn fetch_commit_id(&self, run_id: &str) -> Result<Option<String>> {
        let url = self.job_url(&format!(
            "{run_id}/api/json?tree=actions[lastBuiltRevision[SHA1]]"
        ))?;

        let response = self.auth_request(self.client.get(url)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FourKeysError::Api {
                status: status.as_u16(),
                message: read_error_body(response).await,
            });
        }

        let details: RunDetails = response.json().await?;

        Ok(details
            .actions
            .into_iter()
            .filter_map(|action| action.last_built_revision)
            .map(|revision| revision.sha1)
            .next())
    }

    /// Browser URL for a run.
    pub fn run_url(&self, run_id: &str) -> String {
        format!("{}job/{}/{}/", self.base_url, self.job, run_id)
    }

    fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some((username, token)) = &self.credentials {
            request.basic_auth(username, Some(token))
        } else {
            request
        }
    }

    fn job_url(&self, tail: &str) -> Result<Url> {
        self.base_url
            .join(&format!("job/{}/{tail}", self.job))
            .map_err(|e| FourKeysError::Config(format!("Invalid request URL: {e}")))
    }
}

async fn read_error_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string())
}

/// Response shape for the commit lookup
/// (`GET /job/{job}/{run}/api/json?tree=actions[lastBuiltRevision[SHA1]]`).
#[derive(Deserialize)]
struct RunDetails {
    #[serde(default)]
    actions: Vec<RunAction>,
}

#[derive(Deserialize)]
struct RunAction {
    #[serde(rename = "lastBuiltRevision")]
    last_built_revision: Option<BuiltRevision>,
}

#[derive(Deserialize)]
struct BuiltRevision {
    #[serde(rename = "SHA1")]
    sha1: String,
}
