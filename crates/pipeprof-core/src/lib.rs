pub mod analyzer;
pub mod config;
pub mod cost;
pub mod error;
pub mod parser;

pub use analyzer::report::{Issue, IssueKind, Report, Severity};
pub use analyzer::{analyze, analyze_with, analyze_workflow};
pub use config::{AnalyzerConfig, RuleMarkers};
pub use cost::CostModel;
pub use error::ConfigError;
pub use parser::github::WorkflowParser;
pub use parser::workflow::{Job, Needs, Step, Workflow};
