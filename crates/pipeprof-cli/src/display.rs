use colored::*;
use pipeprof_core::{Issue, Report, Severity};
use std::path::Path;

const RULE_WIDTH: usize = 60;

/// Print a cost report for one workflow file to the terminal.
pub fn print_report(file: &Path, report: &Report) {
    let name = if report.workflow_name.is_empty() {
        "(unnamed workflow)"
    } else {
        report.workflow_name.as_str()
    };

    println!();
    println!(" {}", "=".repeat(RULE_WIDTH).dimmed());
    println!(
        "{}",
        format!(
            " PipeProf v{} — {} ({})",
            env!("CARGO_PKG_VERSION"),
            name,
            file.display()
        )
        .bold()
    );
    println!(" {}", "=".repeat(RULE_WIDTH).dimmed());

    println!(
        " {} Jobs: {}  |  Est. cost: {}",
        "|-".dimmed(),
        report.total_jobs,
        format!("${:.2}/mo", report.monthly_cost).bold()
    );
    println!(
        " {} Issues: {} ({} high, {} warn)  |  Savings: {} ({:.0}% of cost)",
        "|-".dimmed(),
        report.issues.len(),
        if report.high_count() > 0 {
            report.high_count().to_string().yellow().bold().to_string()
        } else {
            "0".to_string()
        },
        report.warn_count(),
        format!("${:.2}/mo", report.potential_savings).green(),
        report.savings_pct()
    );
    println!(" {}", "-".repeat(RULE_WIDTH).dimmed());

    if report.issues.is_empty() {
        println!(" {} Pipeline looks optimized!", "OK".green().bold());
    } else {
        for (i, issue) in report.issues.iter().enumerate() {
            print_issue(i + 1, issue);
        }
    }

    println!(" {}", "=".repeat(RULE_WIDTH).dimmed());
    println!();
}

fn print_issue(position: usize, issue: &Issue) {
    let severity_tag = match issue.severity {
        Severity::High => format!(" {} ", issue.severity.symbol())
            .on_yellow()
            .black()
            .bold()
            .to_string(),
        Severity::Warn => format!(" {} ", issue.severity.symbol())
            .on_blue()
            .white()
            .bold()
            .to_string(),
    };

    println!(" {}. {} {}", position, severity_tag, issue.title.bold());
    println!("    {} {}", "|".dimmed(), issue.kind.label().cyan());
    println!(
        "    {} {} (saves {})",
        "->".dimmed(),
        issue.fix_suggestion,
        format!("${:.2}/mo", issue.estimated_monthly_savings).green()
    );
    println!();
}
