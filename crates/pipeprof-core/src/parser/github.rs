use crate::parser::workflow::{Job, Needs, Step, Workflow};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_yaml::Value;
use std::path::Path;
use tracing::{debug, trace};

/// Best-effort parser for GitHub Actions style workflow YAML.
///
/// Parsing never fails on content. Fields of an unexpected shape are treated as
/// absent, and a document that cannot be decoded at all yields an empty
/// [`Workflow`].
pub struct WorkflowParser;

impl WorkflowParser {
    /// Read and parse a workflow file. Only I/O failures are reported.
    pub fn parse_file(path: &Path) -> Result<Workflow> {
        let content = std::fs::read(path)
            .with_context(|| format!("Failed to read workflow file: {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    /// Parse raw workflow bytes into a [`Workflow`].
    ///
    /// Only the first YAML document is read; anything after a `---` is ignored.
    pub fn parse(content: &[u8]) -> Workflow {
        let Some(mut yaml) = Self::decode_first_document(content) else {
            return Workflow::default();
        };

        if let Err(e) = yaml.apply_merge() {
            debug!(error = %e, "could not apply YAML merge keys, continuing without them");
        }

        let name = yaml.get("name").and_then(scalar_text).unwrap_or_default();
        let mut workflow = Workflow::new(name);

        let Some(jobs) = yaml.get("jobs").and_then(Value::as_mapping) else {
            debug!("no 'jobs' mapping found in workflow");
            return workflow;
        };

        for (job_id, job_config) in jobs {
            let Some(job_id) = scalar_text(job_id) else {
                continue;
            };
            trace!(job = %job_id, "parsing job");
            workflow.add_job(Self::parse_job(job_id, job_config));
        }

        workflow
    }

    fn decode_first_document(content: &[u8]) -> Option<Value> {
        let Some(document) = serde_yaml::Deserializer::from_slice(content).next() else {
            debug!("workflow contains no YAML document, using empty workflow");
            return None;
        };
        match Value::deserialize(document) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!(error = %e, "workflow could not be decoded, using empty workflow");
                None
            }
        }
    }

    fn parse_job(job_id: String, config: &Value) -> Job {
        let mut job = Job::new(job_id);

        if let Some(runs_on) = config.get("runs-on").and_then(scalar_text) {
            job.runs_on = runs_on;
        }

        if let Some(needs) = config.get("needs") {
            job.needs = Self::parse_needs(needs);
        }

        job.timeout_minutes = config.get("timeout-minutes").and_then(integer);

        if let Some(steps) = config.get("steps").and_then(Value::as_sequence) {
            job.steps = steps
                .iter()
                .filter(|s| s.is_mapping())
                .map(Self::parse_step)
                .collect();
        }

        job
    }

    fn parse_needs(needs: &Value) -> Needs {
        match untag(needs) {
            Value::Null => Needs::None,
            Value::Sequence(seq) => Needs::Many(seq.iter().filter_map(scalar_text).collect()),
            other => match scalar_text(other) {
                Some(name) => Needs::One(name),
                // A mapping is still an explicit declaration.
                None => Needs::Many(Vec::new()),
            },
        }
    }

    fn parse_step(step: &Value) -> Step {
        Step {
            name: step.get("name").and_then(scalar_text),
            uses: step.get("uses").and_then(scalar_text),
            run: step.get("run").and_then(scalar_text),
        }
    }
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

/// Integers, and floats without a fractional part such as `10.0`.
fn integer(value: &Value) -> Option<i64> {
    let value = untag(value);
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Render a scalar node as text. Collections and null yield `None`.
fn scalar_text(value: &Value) -> Option<String> {
    match untag(value) {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_workflow() {
        let yaml = r#"
name: CI
on: push
jobs:
  build:
    runs-on: ubuntu-latest
    timeout-minutes: 10
    steps:
      - uses: actions/checkout@v4
      - name: Install
        run: npm ci
  test:
    needs: build
    runs-on: ubuntu-latest
    steps:
      - run: npm test
"#;
        let wf = WorkflowParser::parse(yaml.as_bytes());
        assert_eq!(wf.name, "CI");
        assert_eq!(
            wf.jobs().map(|j| j.id.as_str()).collect::<Vec<_>>(),
            vec!["build", "test"]
        );

        let build = wf.job("build").unwrap();
        assert_eq!(build.runs_on, "ubuntu-latest");
        assert_eq!(build.timeout_minutes, Some(10));
        assert_eq!(build.steps[0].uses.as_deref(), Some("actions/checkout@v4"));
        assert_eq!(build.steps[1].name.as_deref(), Some("Install"));
        assert_eq!(build.steps[1].run.as_deref(), Some("npm ci"));

        let test = wf.job("test").unwrap();
        assert_eq!(test.needs, Needs::One("build".to_string()));
    }

    #[test]
    fn test_parse_needs_shapes() {
        let yaml = r#"
jobs:
  a:
    runs-on: ubuntu-latest
  b:
    needs: [a]
  c:
    needs:
      - a
      - b
  d:
    needs: []
  e:
    needs: ~
"#;
        let wf = WorkflowParser::parse(yaml.as_bytes());
        assert_eq!(wf.job("a").unwrap().needs, Needs::None);
        assert_eq!(wf.job("b").unwrap().needs, Needs::Many(vec!["a".into()]));
        assert_eq!(
            wf.job("c").unwrap().needs,
            Needs::Many(vec!["a".into(), "b".into()])
        );
        assert!(wf.job("d").unwrap().needs.is_declared());
        assert!(!wf.job("e").unwrap().needs.is_declared());
        assert_eq!(wf.dependent_job_count(), 3);
    }

    #[test]
    fn test_malformed_fields_are_ignored() {
        let yaml = r#"
name: [not, a, string]
jobs:
  build:
    runs-on: [self-hosted, linux]
    timeout-minutes: "${{ inputs.timeout }}"
    steps: "not a list"
  lint:
    steps:
      - just a string
      - uses: actions/cache@v4
"#;
        let wf = WorkflowParser::parse(yaml.as_bytes());
        assert_eq!(wf.name, "");
        assert_eq!(wf.job_count(), 2);

        let build = wf.job("build").unwrap();
        assert_eq!(build.runs_on, "");
        assert_eq!(build.timeout_minutes, None);
        assert!(build.steps.is_empty());

        let lint = wf.job("lint").unwrap();
        assert_eq!(lint.steps.len(), 1);
        assert!(lint.steps[0].uses_action_containing("cache"));
    }

    #[test]
    fn test_undecodable_input_yields_empty_workflow() {
        let garbage = b"jobs: [unclosed\n  - : :\n\t{{";
        assert_eq!(WorkflowParser::parse(garbage), Workflow::default());
        assert_eq!(WorkflowParser::parse(&[0x6a, 0xc3, 0x28, 0x80]), Workflow::default());
        assert_eq!(WorkflowParser::parse(b""), Workflow::default());
    }

    #[test]
    fn test_null_job_body_still_counts() {
        let wf = WorkflowParser::parse(b"jobs:\n  build:\n");
        assert_eq!(wf.job_count(), 1);
        assert_eq!(wf.job("build").unwrap(), &Job::new("build"));
    }

    #[test]
    fn test_only_first_document_is_read() {
        let trailing = b"name: First\njobs:\n  a:\n    runs-on: ubuntu-latest\n---\n";
        let wf = WorkflowParser::parse(trailing);
        assert_eq!(wf.name, "First");
        assert_eq!(wf.job_count(), 1);

        let two_docs = b"name: First\njobs:\n  a:\n    runs-on: ubuntu-latest\n  b:\n    needs: a\n---\nname: Second\njobs:\n  c: {}\n";
        let wf = WorkflowParser::parse(two_docs);
        assert_eq!(wf.name, "First");
        assert_eq!(wf.job_count(), 2);
        assert!(wf.job("c").is_none());

        let leading = b"---\nname: Lead\njobs:\n  a: {}\n";
        assert_eq!(WorkflowParser::parse(leading).job_count(), 1);
    }

    #[test]
    fn test_merge_keys_are_applied() {
        let yaml = r#"
name: Anchored
x-defaults: &base
  runs-on: ubuntu-latest-8xlarge
  timeout-minutes: 10
jobs:
  build:
    <<: *base
    steps:
      - run: make
  test:
    <<: *base
    runs-on: ubuntu-latest
    steps:
      - run: make test
"#;
        let wf = WorkflowParser::parse(yaml.as_bytes());
        let build = wf.job("build").unwrap();
        assert_eq!(build.runs_on, "ubuntu-latest-8xlarge");
        assert_eq!(build.timeout_minutes, Some(10));
        assert_eq!(build.steps.len(), 1);

        let test = wf.job("test").unwrap();
        assert_eq!(test.runs_on, "ubuntu-latest");
        assert_eq!(test.timeout_minutes, Some(10));
    }

    #[test]
    fn test_integral_float_timeout() {
        let yaml = "jobs:\n  a:\n    timeout-minutes: 10.0\n  b:\n    timeout-minutes: 2.5\n";
        let wf = WorkflowParser::parse(yaml.as_bytes());
        assert_eq!(wf.job("a").unwrap().timeout_minutes, Some(10));
        assert_eq!(wf.job("b").unwrap().timeout_minutes, None);
    }

    #[test]
    fn test_parse_file_reports_missing_file() {
        let err = WorkflowParser::parse_file(Path::new("/nonexistent/ci.yml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read workflow file"));
    }
}
