//! Askama views for the shell and its three modes.

use askama::Template;

use crate::analysis::presenter::{AtsReport, DetailLine, QuestionList};
use crate::session::{ExtractedResume, InterviewOptions, InterviewRound, Mode, NavigationState, LEVELS};
use crate::ui::markdown::markdown_to_html;

pub struct NavItem {
    pub key: &'static str,
    pub label: &'static str,
    pub active: bool,
}

pub struct ResumeBadge<'a> {
    pub file_name: &'a str,
    pub media: &'static str,
    pub chars: usize,
}

/// The full page: sidebar with upload + navigation, and the active view.
#[derive(Template)]
#[template(path = "shell.html")]
pub struct ShellPage<'a> {
    pub nav: Vec<NavItem>,
    pub resume: Option<ResumeBadge<'a>>,
    /// Pre-rendered HTML of the active view.
    pub body: String,
}

impl<'a> ShellPage<'a> {
    pub fn new(
        navigation: &NavigationState,
        resume: Option<&'a ExtractedResume>,
        body: String,
    ) -> Self {
        let active = navigation.mode();
        Self {
            nav: Mode::ALL
                .into_iter()
                .map(|mode| NavItem {
                    key: mode.key(),
                    label: mode.label(),
                    active: mode == active,
                })
                .collect(),
            resume: resume.map(|r| ResumeBadge {
                file_name: &r.file_name,
                media: r.media_type.label(),
                chars: r.text.chars().count(),
            }),
            body,
        }
    }
}

#[derive(Template)]
#[template(path = "breakdown.html")]
pub struct BreakdownView {
    pub html: Option<String>,
}

impl BreakdownView {
    pub fn idle() -> Self {
        Self { html: None }
    }

    pub fn with_markdown(markdown: &str) -> Self {
        Self {
            html: Some(markdown_to_html(markdown)),
        }
    }
}

pub struct RenderedLine {
    /// Marker lines get the `detail-heading` class.
    pub heading: bool,
    pub html: String,
}

pub struct AtsReportView {
    pub score_line: String,
    pub verdict: String,
    pub lines: Vec<RenderedLine>,
    pub degraded: bool,
}

impl From<&AtsReport> for AtsReportView {
    fn from(report: &AtsReport) -> Self {
        let lines = report
            .details
            .iter()
            .map(|line| match line {
                DetailLine::Heading(text) => RenderedLine {
                    heading: true,
                    html: markdown_to_html(&format!("#### {text}")),
                },
                DetailLine::Body(text) => RenderedLine {
                    heading: false,
                    html: markdown_to_html(text),
                },
            })
            .collect();

        Self {
            score_line: report.score_line.clone(),
            verdict: report.verdict.clone(),
            lines,
            degraded: report.is_degraded(),
        }
    }
}

#[derive(Template)]
#[template(path = "ats.html")]
pub struct AtsView {
    pub report: Option<AtsReportView>,
}

pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

pub struct QuestionsView {
    pub heading: String,
    pub questions: Vec<String>,
    pub shortfall_note: Option<String>,
}

impl QuestionsView {
    pub fn new(round: InterviewRound, list: QuestionList) -> Self {
        let shortfall_note = (list.shortfall() > 0).then(|| {
            format!(
                "The model returned {} of the {} requested questions.",
                list.questions.len(),
                list.requested
            )
        });
        Self {
            heading: format!("📌 {} Round Questions", round.label()),
            questions: list.questions,
            shortfall_note,
        }
    }
}

#[derive(Template)]
#[template(path = "interview.html")]
pub struct InterviewView {
    pub rounds: Vec<SelectOption>,
    pub levels: Vec<SelectOption>,
    pub result: Option<QuestionsView>,
}

impl InterviewView {
    pub fn new(options: &InterviewOptions, result: Option<QuestionsView>) -> Self {
        Self {
            rounds: InterviewRound::ALL
                .into_iter()
                .map(|round| SelectOption {
                    value: round.label(),
                    label: round.label(),
                    selected: round == options.round,
                })
                .collect(),
            levels: LEVELS
                .into_iter()
                .map(|level| SelectOption {
                    value: level,
                    label: level,
                    selected: level == options.level,
                })
                .collect(),
            result,
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage<'a> {
    pub message: &'a str,
}
