mod client;
mod types;

pub use client::JenkinsClient;
pub use types::{JenkinsRun, JenkinsStage};
