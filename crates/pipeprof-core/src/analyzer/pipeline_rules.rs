use crate::analyzer::report::{Issue, IssueKind, Severity};
use crate::analyzer::RuleContext;
use crate::parser::workflow::Workflow;

/// Run the whole-pipeline rules: caching, then concurrency, then sequencing.
pub fn check_pipeline(workflow: &Workflow, raw: &str, ctx: &RuleContext<'_>) -> Vec<Issue> {
    [
        check_cache(workflow, ctx),
        check_concurrency(raw, ctx),
        check_sequential(workflow, ctx),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Fires when no step in any job references a caching action.
pub fn check_cache(workflow: &Workflow, ctx: &RuleContext<'_>) -> Option<Issue> {
    let marker = ctx.markers.cache_action.as_str();
    let has_cache = workflow
        .jobs()
        .flat_map(|j| j.steps.iter())
        .any(|s| s.uses_action_containing(marker));
    if has_cache {
        return None;
    }

    Some(Issue {
        severity: Severity::High,
        kind: IssueKind::MissingCache,
        title: "No dependency caching detected".to_string(),
        fix_suggestion: "Add actions/cache to cut build time ~30%".to_string(),
        job: None,
        estimated_monthly_savings: ctx.savings(IssueKind::MissingCache),
    })
}

/// Concurrency groups may sit at the top level or inside a job, so the raw
/// text is scanned instead of the model.
pub fn check_concurrency(raw: &str, ctx: &RuleContext<'_>) -> Option<Issue> {
    if raw.contains(ctx.markers.concurrency.as_str()) {
        return None;
    }

    Some(Issue {
        severity: Severity::Warn,
        kind: IssueKind::MissingConcurrency,
        title: "No concurrency control".to_string(),
        fix_suggestion: "Add concurrency group to cancel redundant runs".to_string(),
        job: None,
        estimated_monthly_savings: ctx.savings(IssueKind::MissingConcurrency),
    })
}

/// Fires when all but at most one job waits on another, for pipelines of
/// three or more jobs.
pub fn check_sequential(workflow: &Workflow, ctx: &RuleContext<'_>) -> Option<Issue> {
    let total = workflow.job_count();
    let dependent = workflow.dependent_job_count();
    if total <= 2 || dependent + 1 < total {
        return None;
    }

    Some(Issue {
        severity: Severity::Warn,
        kind: IssueKind::SequentialPipeline,
        title: "Pipeline is mostly sequential".to_string(),
        fix_suggestion: "Parallelize independent jobs to reduce wall time".to_string(),
        job: None,
        estimated_monthly_savings: ctx.savings(IssueKind::SequentialPipeline),
    })
}
