//! Axum route handlers for the interactive shell.

use askama::Template;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use crate::analysis::pipeline::{run_ats, run_breakdown, run_interview};
use crate::errors::AppError;
use crate::extract::{extract_text, ExtractError, MediaType, ResumeDocument};
use crate::routes::MAX_UPLOAD_BYTES;
use crate::session::{ExtractedResume, InterviewOptions, Mode, NavigationState, DEFAULT_LEVEL};
use crate::state::AppState;
use crate::ui::views::{AtsView, BreakdownView, InterviewView, QuestionsView, ShellPage};

const UPLOAD_FIELD: &str = "resume";

type PageResponse = Result<(CookieJar, Html<String>), AppError>;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NavigateForm {
    pub mode: String,
}

#[derive(Debug, Deserialize)]
pub struct InterviewForm {
    pub round: String,
    pub level: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
///
/// Renders the current view without calling the model.
pub async fn handle_home(State(state): State<AppState>, jar: CookieJar) -> PageResponse {
    let session = state.sessions.load(&jar).await;
    let body = idle_view(&session.navigation)?;
    Ok((jar, render_shell(&session.navigation, session.resume.as_ref(), body)?))
}

/// POST /upload
///
/// Extracts the uploaded resume and replaces whatever the session held.
/// When the breakdown view is active it is run straight away; otherwise the
/// browser is sent back to the shell.
pub async fn handle_upload(
    State(state): State<AppState>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut upload: Option<(String, Option<String>, Bytes)> = None;
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            field.bytes().await.map_err(upload_error)?;
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(upload_error)?;
        upload = Some((file_name, content_type, data));
    }

    let (file_name, content_type, data) = match upload {
        Some((name, _, data)) if name.is_empty() && data.is_empty() => {
            return Err(AppError::Validation("Please choose a resume file to upload.".to_string()))
        }
        Some(upload) => upload,
        None => {
            return Err(AppError::Validation("No resume file was uploaded.".to_string()))
        }
    };

    let media_type = MediaType::detect(content_type.as_deref(), Some(&file_name)).ok_or_else(|| {
        AppError::UnsupportedMediaType(format!(
            "'{file_name}' is not a PDF or plain-text file."
        ))
    })?;

    let document = ResumeDocument {
        bytes: data,
        media_type,
    };
    let size = document.bytes.len();
    let text = tokio::task::spawn_blocking(move || extract_text(&document))
        .await
        .map_err(|e| ExtractError::DocumentParse(format!("extraction aborted: {e}")))??;

    info!(
        "Extracted {} chars from {} upload '{}' ({} bytes)",
        text.chars().count(),
        media_type.label(),
        file_name,
        size
    );

    let resume = ExtractedResume {
        file_name,
        media_type,
        text,
    };
    let navigation = state.sessions.load(&jar).await.navigation;
    let jar = state.sessions.set_resume(jar, resume.clone()).await;

    if navigation != NavigationState::Breakdown {
        return Ok((jar, Redirect::to("/")).into_response());
    }
    Ok(respond(jar, breakdown_page(&state, &resume).await))
}

/// POST /navigate
///
/// Switches view. Landing on the breakdown view with a resume loaded runs it.
pub async fn handle_navigate(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<NavigateForm>,
) -> Result<Response, AppError> {
    let mode: Mode = form.mode.parse().map_err(AppError::Validation)?;
    let session = state.sessions.load(&jar).await;

    let navigation = session.navigation.switch_to(mode);
    let jar = state.sessions.set_navigation(jar, navigation.clone()).await;

    let page = match (&navigation, &session.resume) {
        (NavigationState::Breakdown, Some(resume)) => breakdown_page(&state, resume).await,
        _ => idle_view(&navigation)
            .and_then(|body| render_shell(&navigation, session.resume.as_ref(), body)),
    };
    Ok(respond(jar, page))
}

/// POST /breakdown
pub async fn handle_breakdown(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let resume = state.sessions.load(&jar).await.resume.ok_or(AppError::NoResume)?;
    let jar = state
        .sessions
        .set_navigation(jar, NavigationState::Breakdown)
        .await;

    Ok(respond(jar, breakdown_page(&state, &resume).await))
}

/// POST /ats
pub async fn handle_ats(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let resume = state.sessions.load(&jar).await.resume.ok_or(AppError::NoResume)?;
    let navigation = NavigationState::AtsAnalysis;
    let jar = state.sessions.set_navigation(jar, navigation.clone()).await;

    Ok(respond(jar, ats_page(&state, &navigation, &resume).await))
}

/// POST /interview
///
/// Stores the chosen round and level, then generates questions.
pub async fn handle_interview(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<InterviewForm>,
) -> Result<Response, AppError> {
    let options = InterviewOptions {
        round: form.round.parse().map_err(AppError::Validation)?,
        level: form.level.unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
    };
    let resume = state.sessions.load(&jar).await.resume.ok_or(AppError::NoResume)?;
    let navigation = NavigationState::InterviewGen(options.clone());
    let jar = state.sessions.set_navigation(jar, navigation.clone()).await;

    Ok(respond(jar, interview_page(&state, &navigation, &options, &resume).await))
}

/// POST /reset
///
/// Ends the session: the extracted resume and navigation state are dropped.
pub async fn handle_reset(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let jar = state.sessions.end(jar).await;
    (jar, Redirect::to("/"))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Failure notices after a session write still carry its cookie.
fn respond(jar: CookieJar, page: Result<Html<String>, AppError>) -> Response {
    match page {
        Ok(html) => (jar, html).into_response(),
        Err(err) => (jar, err).into_response(),
    }
}

fn upload_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::UploadTooLarge {
            limit: MAX_UPLOAD_BYTES,
        }
    } else {
        AppError::Validation(format!("Malformed upload: {}", err.body_text()))
    }
}

async fn breakdown_page(
    state: &AppState,
    resume: &ExtractedResume,
) -> Result<Html<String>, AppError> {
    let sections = run_breakdown(state.model.as_ref(), &resume.text).await?;
    let body = BreakdownView::with_markdown(&sections.markdown).render()?;
    render_shell(&NavigationState::Breakdown, Some(resume), body)
}

async fn ats_page(
    state: &AppState,
    navigation: &NavigationState,
    resume: &ExtractedResume,
) -> Result<Html<String>, AppError> {
    let report = run_ats(state.model.as_ref(), &resume.text).await?;
    let body = AtsView {
        report: Some((&report).into()),
    }
    .render()?;
    render_shell(navigation, Some(resume), body)
}

async fn interview_page(
    state: &AppState,
    navigation: &NavigationState,
    options: &InterviewOptions,
    resume: &ExtractedResume,
) -> Result<Html<String>, AppError> {
    let questions = run_interview(state.model.as_ref(), &resume.text, options).await?;
    let body = InterviewView::new(options, Some(QuestionsView::new(options.round, questions)))
        .render()?;
    render_shell(navigation, Some(resume), body)
}

/// The view for `navigation` before any model call has been made.
fn idle_view(navigation: &NavigationState) -> Result<String, AppError> {
    let html = match navigation {
        NavigationState::Breakdown => BreakdownView::idle().render()?,
        NavigationState::AtsAnalysis => AtsView { report: None }.render()?,
        NavigationState::InterviewGen(options) => InterviewView::new(options, None).render()?,
    };
    Ok(html)
}

fn render_shell(
    navigation: &NavigationState,
    resume: Option<&ExtractedResume>,
    body: String,
) -> Result<Html<String>, AppError> {
    Ok(Html(ShellPage::new(navigation, resume, body).render()?))
}
