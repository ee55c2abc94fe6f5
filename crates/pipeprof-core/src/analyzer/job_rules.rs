use crate::analyzer::report::{Issue, IssueKind, Severity};
use crate::analyzer::RuleContext;
use crate::parser::workflow::Job;

/// Run every job-scoped rule against one job, in fixed order.
pub fn check_job(job: &Job, ctx: &RuleContext<'_>) -> Vec<Issue> {
    [check_timeout(job, ctx), check_runner_tier(job, ctx)]
        .into_iter()
        .flatten()
        .collect()
}

/// Jobs without `timeout-minutes` fall back to the 6 hour platform limit.
pub fn check_timeout(job: &Job, ctx: &RuleContext<'_>) -> Option<Issue> {
    if job.has_timeout() {
        return None;
    }

    Some(Issue {
        severity: Severity::Warn,
        kind: IssueKind::MissingTimeout,
        title: format!("Job '{}' has no timeout-minutes", job.id),
        fix_suggestion: "Add timeout-minutes to prevent runaway builds".to_string(),
        job: Some(job.id.clone()),
        estimated_monthly_savings: ctx.savings(IssueKind::MissingTimeout),
    })
}

pub fn check_runner_tier(job: &Job, ctx: &RuleContext<'_>) -> Option<Issue> {
    if !job.runs_on.contains(ctx.markers.expensive_tier.as_str()) {
        return None;
    }

    Some(Issue {
        severity: Severity::High,
        kind: IssueKind::ExpensiveRunner,
        title: format!("Job '{}' uses expensive runner: {}", job.id, job.runs_on),
        fix_suggestion: "Switch to standard runners or self-hosted".to_string(),
        job: Some(job.id.clone()),
        estimated_monthly_savings: ctx.savings(IssueKind::ExpensiveRunner),
    })
}
