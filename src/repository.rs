use std::sync::RwLock;

use indexmap::IndexMap;

use crate::models::Build;

/// Lookup and storage of build snapshots, keyed by pipeline identifier.
///
/// Implementations hand out complete, consistent snapshots: a reader always
/// sees either the previous sync's builds or the next one's, never a mix of
/// the two.
pub trait BuildRepository: Send + Sync {
    /// All known builds for the pipeline, or empty when the pipeline is
    /// unknown.
    fn get_all_builds(&self, pipeline_id: &str) -> Vec<Build>;

    /// Replace the pipeline's snapshot wholesale.
    fn save_builds(&self, pipeline_id: &str, builds: Vec<Build>);
}

/// Process-local build store backing the HTTP service.
#[derive(Default)]
pub struct InMemoryBuildRepository {
    builds: RwLock<IndexMap<String, Vec<Build>>>,
}

impl InMemoryBuildRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BuildRepository for InMemoryBuildRepository {
    fn get_all_builds(&self, pipeline_id: &str) -> Vec<Build> {
        self.builds
            .read()
            .unwrap()
            .get(pipeline_id)
            .cloned()
            .unwrap_or_default()
    }

    fn save_builds(&self, pipeline_id: &str, builds: Vec<Build>) {
        self.builds
            .write()
            .unwrap()
            .insert(pipeline_id.to_string(), builds);
    }
}
