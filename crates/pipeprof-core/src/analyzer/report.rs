use serde::{Deserialize, Serialize};

/// Severity level for a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Warn,
}

impl Severity {
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Warn => "WARN",
        }
    }
}

/// Which rule produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    MissingTimeout,
    ExpensiveRunner,
    MissingCache,
    MissingConcurrency,
    SequentialPipeline,
}

impl IssueKind {
    pub fn label(&self) -> &'static str {
        match self {
            IssueKind::MissingTimeout => "Missing Timeout",
            IssueKind::ExpensiveRunner => "Expensive Runner",
            IssueKind::MissingCache => "Missing Dependency Cache",
            IssueKind::MissingConcurrency => "Missing Concurrency Control",
            IssueKind::SequentialPipeline => "Serial Bottleneck",
        }
    }

    /// Share of the monthly cost recovered by fixing this kind of issue.
    pub fn savings_ratio(&self) -> f64 {
        match self {
            IssueKind::MissingTimeout => 0.05,
            IssueKind::ExpensiveRunner => 0.15,
            IssueKind::MissingCache => 0.30,
            IssueKind::MissingConcurrency => 0.10,
            IssueKind::SequentialPipeline => 0.20,
        }
    }
}

/// A single cost finding with a suggested fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub kind: IssueKind,
    pub title: String,
    #[serde(rename = "fix")]
    pub fix_suggestion: String,
    /// Affected job, set for job-scoped rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    #[serde(rename = "savings_per_month")]
    pub estimated_monthly_savings: f64,
}

/// Result of analyzing one workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub workflow_name: String,
    pub total_jobs: usize,
    pub issues: Vec<Issue>,
    pub monthly_cost: f64,
    pub potential_savings: f64,
}

impl Report {
    pub fn new(workflow_name: String, total_jobs: usize, monthly_cost: f64) -> Self {
        Self {
            workflow_name,
            total_jobs,
            issues: Vec::new(),
            monthly_cost,
            potential_savings: 0.0,
        }
    }

    /// Append an issue and fold its savings into the running total.
    pub fn push(&mut self, issue: Issue) {
        self.potential_savings += issue.estimated_monthly_savings;
        self.issues.push(issue);
    }

    pub fn high_count(&self) -> usize {
        self.issues.iter().filter(|i| i.severity == Severity::High).count()
    }

    pub fn warn_count(&self) -> usize {
        self.issues.iter().filter(|i| i.severity == Severity::Warn).count()
    }

    pub fn has_issue(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }

    /// Savings as a percentage of the monthly cost. May exceed 100.
    pub fn savings_pct(&self) -> f64 {
        if self.monthly_cost == 0.0 {
            return 0.0;
        }
        self.potential_savings / self.monthly_cost * 100.0
    }
}
