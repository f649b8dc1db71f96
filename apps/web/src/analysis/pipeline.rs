//! Analysis pipeline: fill a template, call the model once, present the result.

use tracing::{info, warn};

use crate::analysis::presenter::{
    present_ats, present_questions, present_sections, AtsReport, QuestionList, SectionBreakdown,
};
use crate::analysis::prompts::{
    ats_evaluation, dsa_questions, mock_interview, section_breakdown, PromptTemplate,
    ATS_EVALUATION, DSA_QUESTIONS, MOCK_INTERVIEW, SECTION_BREAKDOWN,
};
use crate::errors::AppError;
use crate::llm_client::CompletionModel;
use crate::session::{InterviewOptions, InterviewRound};

async fn complete(
    model: &dyn CompletionModel,
    template: &PromptTemplate,
    prompt: String,
) -> Result<String, AppError> {
    info!(
        "Invoking model with '{}' prompt ({} chars)",
        template.name,
        prompt.len()
    );
    let response = model.complete(&prompt).await?;
    info!(
        "Model returned {} chars for '{}'",
        response.len(),
        template.name
    );
    Ok(response)
}

pub async fn run_breakdown(
    model: &dyn CompletionModel,
    resume: &str,
) -> Result<SectionBreakdown, AppError> {
    let response = complete(model, &SECTION_BREAKDOWN, section_breakdown(resume)).await?;
    Ok(present_sections(&response))
}

pub async fn run_ats(model: &dyn CompletionModel, resume: &str) -> Result<AtsReport, AppError> {
    let response = complete(model, &ATS_EVALUATION, ats_evaluation(resume)).await?;
    let report = present_ats(&response);

    if report.is_degraded() {
        warn!(
            "ATS response too short for score/verdict (score_fallback={}, verdict_fallback={})",
            report.score_fallback, report.verdict_fallback
        );
    }

    Ok(report)
}

/// Coding rounds ask for DSA problems at the chosen level; other rounds ask
/// for resume-driven questions.
pub async fn run_interview(
    model: &dyn CompletionModel,
    resume: &str,
    options: &InterviewOptions,
) -> Result<QuestionList, AppError> {
    let response = match options.round {
        InterviewRound::Coding => {
            complete(model, &DSA_QUESTIONS, dsa_questions(&options.level)).await?
        }
        round => complete(model, &MOCK_INTERVIEW, mock_interview(resume, round)).await?,
    };
    let questions = present_questions(&response);

    if questions.shortfall() > 0 {
        warn!(
            "Model returned {} of {} requested {} questions",
            questions.questions.len(),
            questions.requested,
            options.round.label()
        );
    }

    Ok(questions)
}
