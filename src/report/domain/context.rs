//! Plain-text project context fed to report generation.
//!
//! The document is line-oriented so the fallback path can recover its
//! figures by prefix without a structured side channel:
//!
//! ```text
//! Project Name: <name>
//! Project Key: <key>
//! Description: <description>
//!
//! Task Statistics:
//! - Total Tasks: <n>
//! - To Do: <n>
//! - In Progress: <n>
//! - Done: <n>
//!
//! Team Information:
//! - Team Size: <n>
//! - Project Lead: <name>
//! ```

use crate::project::domain::{Project, User};
use crate::task::domain::{Task, TaskStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

const PROJECT_NAME_PREFIX: &str = "Project Name:";
const TOTAL_PREFIX: &str = "- Total Tasks:";
const TODO_PREFIX: &str = "- To Do:";
const IN_PROGRESS_PREFIX: &str = "- In Progress:";
const DONE_PREFIX: &str = "- Done:";
const TEAM_SIZE_PREFIX: &str = "- Team Size:";
const NO_LEAD: &str = "Not assigned";

/// Task counts per reported status bucket.
///
/// `IN_REVIEW` tasks count towards the total but have no bucket of their
/// own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStatistics {
    /// All tasks in the project.
    pub total: u64,
    /// Tasks in `TODO`.
    pub todo: u64,
    /// Tasks in `IN_PROGRESS`.
    pub in_progress: u64,
    /// Tasks in `DONE`.
    pub done: u64,
}

impl TaskStatistics {
    /// Counts tasks by status.
    #[must_use]
    pub fn tally(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut stats, task| {
            stats.total = stats.total.saturating_add(1);
            match task.status() {
                TaskStatus::Todo => stats.todo = stats.todo.saturating_add(1),
                TaskStatus::InProgress => stats.in_progress = stats.in_progress.saturating_add(1),
                TaskStatus::Done => stats.done = stats.done.saturating_add(1),
                TaskStatus::InReview => {}
            }
            stats
        })
    }
}

/// Context document describing one project at one moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportContext(String);

impl ReportContext {
    /// Builds the context document for a project.
    ///
    /// `lead` is the project's lead when one is assigned and resolvable.
    #[must_use]
    pub fn build(project: &Project, lead: Option<&User>, tasks: &[Task]) -> Self {
        let stats = TaskStatistics::tally(tasks);
        let mut lines = vec![
            format!("{PROJECT_NAME_PREFIX} {}", project.name()),
            format!("Project Key: {}", project.key()),
        ];
        if let Some(description) = project.description().filter(|text| !text.is_empty()) {
            lines.push(format!("Description: {description}"));
        }
        lines.extend([
            String::new(),
            "Task Statistics:".to_owned(),
            format!("{TOTAL_PREFIX} {}", stats.total),
            format!("{TODO_PREFIX} {}", stats.todo),
            format!("{IN_PROGRESS_PREFIX} {}", stats.in_progress),
            format!("{DONE_PREFIX} {}", stats.done),
            String::new(),
            "Team Information:".to_owned(),
            format!("{TEAM_SIZE_PREFIX} {}", project.team_size()),
            format!("- Project Lead: {}", lead.map_or(NO_LEAD, User::name)),
        ]);

        let mut document = String::new();
        for line in lines {
            document.push_str(&line);
            document.push('\n');
        }
        Self(document)
    }

    /// Wraps an existing context document.
    #[must_use]
    pub const fn from_text(text: String) -> Self {
        Self(text)
    }

    /// Returns the document text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recovers the figures written into the document.
    #[must_use]
    pub fn figures(&self) -> ContextFigures {
        ContextFigures::parse(&self.0)
    }
}

impl fmt::Display for ReportContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Figures recovered from a context document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContextFigures {
    /// Project name.
    pub project_name: String,
    /// Total task count.
    pub total_tasks: u64,
    /// `TODO` task count.
    pub todo: u64,
    /// `IN_PROGRESS` task count.
    pub in_progress: u64,
    /// `DONE` task count.
    pub done: u64,
    /// Number of project members.
    pub team_size: u64,
}

impl ContextFigures {
    /// Parses the document line by line.
    ///
    /// Missing lines leave their figure at its default, a repeated line
    /// overrides earlier ones and an unparseable number reads as zero.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut figures = Self::default();
        for line in text.lines() {
            if let Some(rest) = line.strip_prefix(PROJECT_NAME_PREFIX) {
                rest.trim().clone_into(&mut figures.project_name);
            } else if let Some(rest) = line.strip_prefix(TOTAL_PREFIX) {
                figures.total_tasks = parse_count(rest);
            } else if let Some(rest) = line.strip_prefix(TODO_PREFIX) {
                figures.todo = parse_count(rest);
            } else if let Some(rest) = line.strip_prefix(IN_PROGRESS_PREFIX) {
                figures.in_progress = parse_count(rest);
            } else if let Some(rest) = line.strip_prefix(DONE_PREFIX) {
                figures.done = parse_count(rest);
            } else if let Some(rest) = line.strip_prefix(TEAM_SIZE_PREFIX) {
                figures.team_size = parse_count(rest);
            }
        }
        figures
    }

    /// Returns the truncated completion percentage.
    #[must_use]
    pub const fn completion_percentage(&self) -> u64 {
        completion_percentage(self.done, self.total_tasks)
    }
}

fn parse_count(raw: &str) -> u64 {
    raw.trim().parse().unwrap_or_default()
}

/// Returns `done * 100 / total`, truncated, or zero when there are no
/// tasks.
#[must_use]
#[expect(
    clippy::integer_division,
    reason = "completion is reported as a truncated whole percentage"
)]
pub const fn completion_percentage(done: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    done.saturating_mul(100) / total
}
