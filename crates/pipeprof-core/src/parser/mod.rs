pub mod github;
pub mod workflow;
