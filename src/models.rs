use serde::{Deserialize, Serialize};

/// Outcome of a pipeline run or of a single stage, as reported by the CI
/// provider.
///
/// Wire values arrive in SCREAMING_SNAKE_CASE (`SUCCESS`, `IN_PROGRESS`, ...).
/// Values this enum does not know decode to [`Status::Other`] instead of
/// failing deserialization, so a new provider status never breaks ingestion
/// and never silently aliases to a known one. Only `Success` ever counts
/// towards a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Success,
    Failed,
    Aborted,
    InProgress,
    NotExecuted,
    Unstable,
    #[serde(other)]
    Other,
}

/// One execution of a CI/CD pipeline.
///
/// Builds are immutable snapshots supplied by the build repository for a
/// single request; metric computations neither mutate nor persist them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    /// Identifier of the configured pipeline this build belongs to
    pub pipeline_id: String,
    /// Provider build number
    #[serde(default)]
    pub number: u32,
    /// Overall run outcome
    pub result: Status,
    /// When the run began, epoch seconds
    pub start_timestamp: i64,
    /// Total run duration in milliseconds
    #[serde(default)]
    pub duration_millis: u64,
    /// Link to the run in the provider UI
    #[serde(default)]
    pub url: String,
    /// Revision that triggered the run; empty when the run carries no SCM data
    #[serde(rename = "commitID")]
    pub commit_id: String,
    /// Stage results in execution order
    pub stages: Vec<Stage>,
}

impl Build {
    /// First stage with the given name, if any.
    ///
    /// Stage names are matched case-sensitively. A build carries at most one
    /// stage per name; duplicates beyond the first are ignored.
    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|stage| stage.name == name)
    }
}

/// A named phase within a build (e.g., "deploy to prod").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    /// Stage name as configured in the pipeline
    pub name: String,
    /// Stage outcome
    pub status: Status,
    /// When the stage began, epoch milliseconds
    #[serde(default)]
    pub start_time_millis: i64,
    /// Stage duration in milliseconds
    #[serde(default)]
    pub duration_millis: u64,
}
