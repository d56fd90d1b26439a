//! Report content generation.
//!
//! Content comes from the external generation service when one is
//! configured and from deterministic Markdown templates otherwise. The two
//! paths share the instruction and template lookup on [`ReportType`].

use crate::config::GenerationConfig;
use crate::report::{
    adapters::http::OpenAiChatGenerator,
    domain::{FallbackTemplate, ReportContext, ReportType},
    ports::{GenerationError, GenerationRequest, ReportTextGenerator},
};
use minijinja::{Environment, context};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Prefix of the context message sent to the generation service.
pub const CONTEXT_PREAMBLE: &str = "Here is the project data:\n";

/// Content returned when the service answers without any text.
pub const EMPTY_RESPONSE_CONTENT: &str = "Failed to generate report content.";

/// Prefix of the content returned when the service call fails.
pub const GENERATION_FAILURE_PREFIX: &str = "Error generating report: ";

/// Largest batch suggested for the next planning round.
const NEXT_BATCH_LIMIT: u64 = 5;

const STATUS_REPORT_TEMPLATE: &str = include_str!("templates/status_report.md.j2");
const SPRINT_ANALYSIS_TEMPLATE: &str = include_str!("templates/sprint_analysis.md.j2");
const GENERAL_TEMPLATE: &str = include_str!("templates/general.md.j2");

/// Errors raised while producing report content.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReportContentError {
    /// A fallback template failed to render.
    #[error("failed to render {template:?} report template: {reason}")]
    TemplateRender {
        /// Template that failed.
        template: FallbackTemplate,
        /// Renderer message.
        reason: String,
    },
}

/// Produces report text from a project context and a user prompt.
#[derive(Clone, Default)]
pub struct ReportContentGenerator {
    external: Option<Arc<dyn ReportTextGenerator>>,
}

impl ReportContentGenerator {
    /// Creates a generator that always renders the fallback templates.
    #[must_use]
    pub const fn fallback() -> Self {
        Self { external: None }
    }

    /// Creates a generator that calls the given service.
    #[must_use]
    pub fn with_generator(generator: Arc<dyn ReportTextGenerator>) -> Self {
        Self {
            external: Some(generator),
        }
    }

    /// Creates a generator from configuration.
    ///
    /// A missing or placeholder credential selects the fallback templates,
    /// as does an HTTP client that cannot be built.
    #[must_use]
    pub fn from_config(config: &GenerationConfig) -> Self {
        match OpenAiChatGenerator::from_config(config) {
            Ok(generator) => Self::with_generator(Arc::new(generator)),
            Err(GenerationError::Unconfigured) => {
                debug!("no generation credential configured; using fallback templates");
                Self::fallback()
            }
            Err(error) => {
                warn!(%error, "generation client unavailable; using fallback templates");
                Self::fallback()
            }
        }
    }

    /// Returns `true` when content comes from the external service.
    #[must_use]
    pub const fn uses_external_service(&self) -> bool {
        self.external.is_some()
    }

    /// Generates report content.
    ///
    /// Failures of the external service never surface as errors: they are
    /// logged and returned as diagnostic content.
    ///
    /// # Errors
    ///
    /// Returns [`ReportContentError::TemplateRender`] when a fallback
    /// template cannot be rendered.
    pub async fn generate(
        &self,
        context: &ReportContext,
        prompt: &str,
        report_type: ReportType,
    ) -> Result<String, ReportContentError> {
        let Some(generator) = &self.external else {
            debug!(report_type = %report_type, "rendering fallback report");
            return render_fallback(context, prompt, report_type);
        };

        let request = GenerationRequest {
            instruction: report_type.profile().instruction.to_owned(),
            context: format!("{CONTEXT_PREAMBLE}{context}"),
            prompt: prompt.to_owned(),
        };
        debug!(report_type = %report_type, "requesting external report");

        match generator.generate(&request).await {
            Ok(Some(text)) if !text.is_empty() => Ok(text),
            Ok(_) => {
                warn!(report_type = %report_type, "generation service returned no content");
                Ok(EMPTY_RESPONSE_CONTENT.to_owned())
            }
            Err(error) => {
                warn!(report_type = %report_type, %error, "report generation failed");
                Ok(format!("{GENERATION_FAILURE_PREFIX}{error}"))
            }
        }
    }
}

/// Renders the deterministic template for the report type.
///
/// The figures are re-read from the context document, so equal inputs
/// always render equal output.
///
/// # Errors
///
/// Returns [`ReportContentError::TemplateRender`] when the template cannot
/// be rendered.
pub fn render_fallback(
    context: &ReportContext,
    prompt: &str,
    report_type: ReportType,
) -> Result<String, ReportContentError> {
    let template = report_type.profile().template;
    let figures = context.figures();
    let values = context! {
        project_name => figures.project_name,
        total_tasks => figures.total_tasks,
        todo => figures.todo,
        in_progress => figures.in_progress,
        done => figures.done,
        team_size => figures.team_size,
        completion => figures.completion_percentage(),
        next_batch => figures.todo.min(NEXT_BATCH_LIMIT),
        prompt => prompt,
    };

    template_environment()
        .render_str(template_source(template), values)
        .map_err(|error| ReportContentError::TemplateRender {
            template,
            reason: error.to_string(),
        })
}

fn template_environment() -> Environment<'static> {
    let mut environment = Environment::new();
    environment.set_trim_blocks(true);
    environment.set_lstrip_blocks(true);
    environment.set_keep_trailing_newline(true);
    environment
}

const fn template_source(template: FallbackTemplate) -> &'static str {
    match template {
        FallbackTemplate::StatusReport => STATUS_REPORT_TEMPLATE,
        FallbackTemplate::SprintAnalysis => SPRINT_ANALYSIS_TEMPLATE,
        FallbackTemplate::General => GENERAL_TEMPLATE,
    }
}
