use serde::{Deserialize, Serialize};

/// A single step within a CI job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub name: Option<String>,
    /// Reusable action invoked by the step (`uses:`).
    pub uses: Option<String>,
    /// Inline shell command (`run:`).
    pub run: Option<String>,
}

impl Step {
    pub fn uses_action_containing(&self, marker: &str) -> bool {
        self.uses.as_deref().is_some_and(|u| u.contains(marker))
    }
}

/// Dependency declaration of a job.
///
/// The source format allows `needs` to be omitted, a single job name, or a list
/// of job names. Rules only care whether a declaration exists at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Needs {
    #[default]
    None,
    One(String),
    Many(Vec<String>),
}

impl Needs {
    /// True for any explicit declaration, including an empty list.
    pub fn is_declared(&self) -> bool {
        !matches!(self, Needs::None)
    }
}

/// A job in the workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    /// Runner label the job executes on (`runs-on:`).
    pub runs_on: String,
    pub steps: Vec<Step>,
    pub needs: Needs,
    pub timeout_minutes: Option<i64>,
}

impl Job {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// A zero timeout is treated the same as a missing one.
    pub fn has_timeout(&self) -> bool {
        self.timeout_minutes.is_some_and(|t| t != 0)
    }
}

/// Structural model of a parsed workflow file.
///
/// Jobs are kept in document order so that every report built from the same
/// bytes lists its findings in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    pub name: String,
    jobs: Vec<Job>,
}

impl Workflow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            jobs: Vec::new(),
        }
    }

    /// Insert a job, replacing any earlier job with the same id in place.
    pub fn add_job(&mut self, job: Job) {
        match self.jobs.iter_mut().find(|j| j.id == job.id) {
            Some(existing) => *existing = job,
            None => self.jobs.push(job),
        }
    }

    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    pub fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Number of jobs with an explicit `needs` declaration.
    pub fn dependent_job_count(&self) -> usize {
        self.jobs.iter().filter(|j| j.needs.is_declared()).count()
    }
}
