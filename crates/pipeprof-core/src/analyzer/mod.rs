pub mod job_rules;
pub mod pipeline_rules;
pub mod report;

use crate::config::{AnalyzerConfig, RuleMarkers};
use crate::parser::github::WorkflowParser;
use crate::parser::workflow::Workflow;
use report::{IssueKind, Report};
use tracing::debug;

/// Inputs shared by every rule. The cost is fixed before any rule runs.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub monthly_cost: f64,
    pub markers: &'a RuleMarkers,
}

impl RuleContext<'_> {
    pub fn savings(&self, kind: IssueKind) -> f64 {
        self.monthly_cost * kind.savings_ratio()
    }
}

/// Analyze raw workflow bytes with the default cost model and markers.
pub fn analyze(raw: &[u8]) -> Report {
    analyze_with(raw, &AnalyzerConfig::default())
}

/// Analyze raw workflow bytes. Undecodable input yields an empty report.
pub fn analyze_with(raw: &[u8], config: &AnalyzerConfig) -> Report {
    let workflow = WorkflowParser::parse(raw);
    analyze_workflow(&workflow, &String::from_utf8_lossy(raw), config)
}

/// Run all rules against a parsed workflow.
///
/// `raw` is the original document text, used by rules that look for tokens
/// the model does not capture.
pub fn analyze_workflow(workflow: &Workflow, raw: &str, config: &AnalyzerConfig) -> Report {
    let total_jobs = workflow.job_count();
    let monthly_cost = config.cost.monthly_cost(total_jobs);
    let mut report = Report::new(workflow.name.clone(), total_jobs, monthly_cost);

    if total_jobs == 0 {
        debug!("workflow has no jobs, skipping rules");
        return report;
    }

    let ctx = RuleContext {
        monthly_cost,
        markers: &config.rules,
    };

    for job in workflow.jobs() {
        for issue in job_rules::check_job(job, &ctx) {
            report.push(issue);
        }
    }

    for issue in pipeline_rules::check_pipeline(workflow, raw, &ctx) {
        report.push(issue);
    }

    debug!(
        workflow = %report.workflow_name,
        jobs = total_jobs,
        issues = report.issues.len(),
        monthly_cost = report.monthly_cost,
        potential_savings = report.potential_savings,
        "analysis complete"
    );

    report
}
