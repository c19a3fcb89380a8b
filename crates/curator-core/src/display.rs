//! Display formatting for domain models.
//!
//! All formatters produce markdown so the same data renders well in a rich
//! terminal and degrades to readable plain text. Domain models implement
//! [`std::fmt::Display`] directly; collection helpers wrap them with
//! headers for list contexts.

use std::fmt;

use crate::models::{ExecutionLog, ExecutionStatus, Plan, PlanSummary, Step, StepKind};

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            StepKind::CreateDir => write!(f, "[{}] create directory {}", self.id, self.destination)?,
            StepKind::MoveFile => {
                write!(f, "[{}] move {} -> {}", self.id, self.source, self.destination)?;
            }
            StepKind::MoveDir => {
                write!(
                    f,
                    "[{}] move directory {} -> {}",
                    self.id, self.source, self.destination
                )?;
                if self.file_count > 0 {
                    write!(f, " ({} files)", self.file_count)?;
                }
            }
        }
        if !self.reason.is_empty() {
            write!(f, " ({})", self.reason)?;
        }
        Ok(())
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Plan {}", self.id)?;
        writeln!(f)?;
        writeln!(f, "Generated: {}", self.timestamp)?;
        writeln!(f, "Steps: {}", self.moves.len())?;
        if !self.rationale.is_empty() {
            writeln!(f)?;
            writeln!(f, "## Rationale")?;
            writeln!(f, "{}", self.rationale)?;
        }
        if !self.moves.is_empty() {
            writeln!(f)?;
            writeln!(f, "## Steps")?;
            for (index, step) in self.moves.iter().enumerate() {
                writeln!(f, "{}. {}", index + 1, step)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- **{}**: {} step(s), {} ({})",
            self.id,
            self.move_count,
            self.status_label(),
            self.timestamp
        )
    }
}

impl fmt::Display for ExecutionLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Execution of plan {}", self.plan_id)?;
        writeln!(f)?;
        writeln!(f, "Started: {}", self.timestamp)?;
        writeln!(f, "Status: {}", self.status)?;
        writeln!(
            f,
            "Outcome: {} completed, {} failed, {} skipped",
            self.completed.len(),
            self.failed.len(),
            self.skipped.len()
        )?;

        if !self.completed.is_empty() {
            writeln!(f)?;
            writeln!(f, "## Completed")?;
            for entry in &self.completed {
                writeln!(f, "- {} at {}", entry.step_id, entry.timestamp)?;
            }
        }
        if !self.failed.is_empty() {
            writeln!(f)?;
            writeln!(f, "## Failed")?;
            for entry in &self.failed {
                writeln!(f, "- {}: {}", entry.step_id, entry.error)?;
            }
        }
        if !self.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "## Skipped")?;
            for entry in &self.skipped {
                writeln!(f, "- {}: {}", entry.step_id, entry.reason)?;
            }
        }
        Ok(())
    }
}

/// Formats plan summaries as a markdown list with an optional title.
pub fn format_plan_list(summaries: &[PlanSummary], title: Option<&str>) -> String {
    let mut output = String::new();
    if let Some(title) = title {
        output.push_str(&format!("# {title}\n\n"));
    }

    if summaries.is_empty() {
        output.push_str("No plans found.\n");
    } else {
        for summary in summaries {
            output.push_str(&summary.to_string());
        }
    }
    output
}

/// Formats the execution history as a markdown list, newest first.
pub fn format_history(logs: &[ExecutionLog]) -> String {
    if logs.is_empty() {
        return "No executions recorded.\n".to_string();
    }

    let mut output = String::from("# Execution History\n\n");
    for log in logs {
        output.push_str(&format!(
            "- **{}**: {} at {} ({} completed, {} failed, {} skipped)\n",
            log.plan_id,
            log.status,
            log.timestamp,
            log.completed.len(),
            log.failed.len(),
            log.skipped.len()
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Step;

    #[test]
    fn test_format_plan_list() {
        let plan = Plan::new("tidy-downloads", vec![Step::create_dir("m1", "/Docs")]);
        let summaries = vec![PlanSummary::from_plan(&plan, None)];

        let output = format_plan_list(&summaries, Some("Plans"));
        assert!(output.contains("# Plans"));
        assert!(output.contains("tidy-downloads"));
        assert!(output.contains("pending"));

        assert!(format_plan_list(&[], None).contains("No plans found"));
    }

    #[test]
    fn test_execution_log_display_mentions_outcomes() {
        let mut log = ExecutionLog::begin("p1");
        log.record_completed("m1");
        log.record_skipped("m2", "destination already exists: /D/a.txt");
        log.finalize();

        let output = log.to_string();
        assert!(output.contains("Status: PARTIAL"));
        assert!(output.contains("## Completed"));
        assert!(output.contains("## Skipped"));
        assert!(output.contains("destination already exists"));
    }
}
