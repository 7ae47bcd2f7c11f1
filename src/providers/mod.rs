mod jenkins;

pub use jenkins::JenkinsClient;
