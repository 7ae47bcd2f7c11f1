mod deployment;

pub use deployment::{count_effective_deployments, deployment_count};
