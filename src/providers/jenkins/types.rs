use serde::Deserialize;

use crate::models::{Build, Stage, Status};

/// A pipeline run as returned by the Jenkins workflow API
/// (`GET /job/{job}/wfapi/runs`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JenkinsRun {
    /// Run identifier; Jenkins reports the build number as a string
    pub id: String,
    /// Run outcome
    pub status: Status,
    /// When the run began, epoch milliseconds
    pub start_time_millis: i64,
    /// Run duration in milliseconds
    #[serde(default)]
    pub duration_millis: u64,
    /// Stages executed by this run, in execution order
    #[serde(default)]
    pub stages: Vec<JenkinsStage>,
}

/// A stage entry within a Jenkins workflow run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JenkinsStage {
    pub name: String,
    pub status: Status,
    #[serde(default)]
    pub start_time_millis: i64,
    #[serde(default)]
    pub duration_millis: u64,
}

impl JenkinsRun {
    /// Convert the wire record into a domain build.
    ///
    /// Jenkins reports times in epoch milliseconds; the domain model keys the
    /// time window on epoch seconds.
    pub fn into_build(self, pipeline_id: &str, url: String, commit_id: String) -> Build {
        Build {
            pipeline_id: pipeline_id.to_string(),
            number: self.id.parse().unwrap_or(0),
            result: self.status,
            start_timestamp: self.start_time_millis / 1000,
            duration_millis: self.duration_millis,
            url,
            commit_id,
            stages: self.stages.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<JenkinsStage> for Stage {
    fn from(stage: JenkinsStage) -> Self {
        Stage {
            name: stage.name,
            status: stage.status,
            start_time_millis: stage.start_time_millis,
            duration_millis: stage.duration_millis,
        }
    }
}
