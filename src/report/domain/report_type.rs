//! Report types and their generation profiles.

use super::ParseReportTypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of report requested by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportType {
    /// Overall project status.
    StatusReport,
    /// Sprint velocity and completion.
    SprintAnalysis,
    /// Team composition and productivity.
    TeamPerformance,
    /// Project risks and mitigations.
    RiskAssessment,
    /// Free-form report driven by the prompt.
    Custom,
}

/// Deterministic template used when no generation service is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackTemplate {
    /// Status report layout.
    StatusReport,
    /// Sprint analysis layout.
    SprintAnalysis,
    /// Prompt-echoing layout shared by the remaining types.
    General,
}

/// Generation settings attached to a report type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportProfile {
    /// System instruction sent to the generation service.
    pub instruction: &'static str,
    /// Template rendered on the fallback path.
    pub template: FallbackTemplate,
}

const STATUS_REPORT_PROFILE: ReportProfile = ReportProfile {
    instruction: "You are a project management assistant that creates detailed status reports. \
        Format your response in Markdown with clear sections including Project Overview, \
        Task Status, Team Performance, and Next Steps.",
    template: FallbackTemplate::StatusReport,
};

const SPRINT_ANALYSIS_PROFILE: ReportProfile = ReportProfile {
    instruction: "You are a scrum master assistant that analyzes sprint performance. Format your \
        response in Markdown with sections for Sprint Overview, Velocity Analysis, \
        Completed vs Planned Work, and Recommendations for the next sprint.",
    template: FallbackTemplate::SprintAnalysis,
};

const TEAM_PERFORMANCE_PROFILE: ReportProfile = ReportProfile {
    instruction: "You are a team performance analyst. Format your response in Markdown with \
        sections for Team Composition, Productivity Metrics, Strengths and Areas for \
        Improvement, and Recommendations.",
    template: FallbackTemplate::General,
};

const RISK_ASSESSMENT_PROFILE: ReportProfile = ReportProfile {
    instruction: "You are a project risk assessment specialist. Format your response in Markdown \
        with sections for Risk Overview, Key Risks Identified, Impact Analysis, \
        Mitigation Strategies, and Recommendations.",
    template: FallbackTemplate::General,
};

const CUSTOM_PROFILE: ReportProfile = ReportProfile {
    instruction: "You are a project management assistant that helps create reports based on \
        project data. Your responses should be in Markdown format with clear sections \
        and actionable insights.",
    template: FallbackTemplate::General,
};

impl ReportType {
    /// Every report type, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::StatusReport,
        Self::SprintAnalysis,
        Self::TeamPerformance,
        Self::RiskAssessment,
        Self::Custom,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StatusReport => "STATUS_REPORT",
            Self::SprintAnalysis => "SPRINT_ANALYSIS",
            Self::TeamPerformance => "TEAM_PERFORMANCE",
            Self::RiskAssessment => "RISK_ASSESSMENT",
            Self::Custom => "CUSTOM",
        }
    }

    /// Parses a requested type name, treating anything unrecognised as
    /// [`ReportType::Custom`]. Matching is case-sensitive.
    #[must_use]
    pub fn parse_or_custom(value: &str) -> Self {
        Self::try_from(value).unwrap_or(Self::Custom)
    }

    /// Returns the generation profile for this type.
    #[must_use]
    pub const fn profile(self) -> &'static ReportProfile {
        match self {
            Self::StatusReport => &STATUS_REPORT_PROFILE,
            Self::SprintAnalysis => &SPRINT_ANALYSIS_PROFILE,
            Self::TeamPerformance => &TEAM_PERFORMANCE_PROFILE,
            Self::RiskAssessment => &RISK_ASSESSMENT_PROFILE,
            Self::Custom => &CUSTOM_PROFILE,
        }
    }

    /// Returns the type as sentence-case words, e.g. `Status report`.
    #[must_use]
    pub fn display_words(self) -> String {
        let lowered = self.as_str().replace('_', " ").to_ascii_lowercase();
        let mut chars = lowered.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_ascii_uppercase().to_string() + chars.as_str()
        })
    }
}

impl TryFrom<&str> for ReportType {
    type Error = ParseReportTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == value)
            .ok_or_else(|| ParseReportTypeError(value.to_owned()))
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the title of a generated report: `<project name> - <type words>`.
#[must_use]
pub fn report_title(project_name: &str, report_type: ReportType) -> String {
    format!("{project_name} - {}", report_type.display_words())
}
