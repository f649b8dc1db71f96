//! Response presenters: pure functions from a raw completion to display blocks.
//!
//! Each presenter only makes sense for the template that produced the
//! completion. None of them validate the model's output; the ATS presenter
//! records when it had to fall back instead of raising.

use crate::analysis::prompts::REQUESTED_QUESTIONS;

pub const SCORE_FALLBACK: &str = "ATS Score: Not available";
pub const VERDICT_FALLBACK: &str = "Verdict: Unknown";

/// Lines starting with one of these open a feedback subsection.
pub const SECTION_MARKERS: [&str; 4] = ["🔍", "📝", "🎯", "💡"];

/// Section breakdown markdown, exactly as the model returned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBreakdown {
    pub markdown: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailLine {
    Heading(String),
    Body(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtsReport {
    pub score_line: String,
    /// Text after the last `:` of the verdict line.
    pub verdict: String,
    pub details: Vec<DetailLine>,
    pub score_fallback: bool,
    pub verdict_fallback: bool,
}

impl AtsReport {
    /// True when the response was too short to carry a score and verdict.
    pub fn is_degraded(&self) -> bool {
        self.score_fallback || self.verdict_fallback
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionList {
    pub questions: Vec<String>,
    pub requested: usize,
}

impl QuestionList {
    /// How many questions short of the requested count the model came up.
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.questions.len())
    }
}

pub fn present_sections(response: &str) -> SectionBreakdown {
    SectionBreakdown {
        markdown: response.to_string(),
    }
}

/// Line 0 is the score, line 1 the verdict, everything after is detail.
pub fn present_ats(response: &str) -> AtsReport {
    let mut lines = response.trim().lines();

    let score = lines.next();
    let verdict = lines.next();

    let score_line = score.unwrap_or(SCORE_FALLBACK).to_string();
    let verdict_line = verdict.unwrap_or(VERDICT_FALLBACK);
    let verdict_fragment = verdict_line
        .rsplit(':')
        .next()
        .unwrap_or(verdict_line)
        .trim()
        .to_string();

    let details = lines
        .map(|line| {
            if SECTION_MARKERS.iter().any(|m| line.starts_with(m)) {
                DetailLine::Heading(line.to_string())
            } else {
                DetailLine::Body(line.to_string())
            }
        })
        .collect();

    AtsReport {
        score_line,
        verdict: verdict_fragment,
        details,
        score_fallback: score.is_none(),
        verdict_fallback: verdict.is_none(),
    }
}

/// One question per non-blank line, in order. Short lists are passed through.
pub fn present_questions(response: &str) -> QuestionList {
    let questions = response
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    QuestionList {
        questions,
        requested: REQUESTED_QUESTIONS,
    }
}
