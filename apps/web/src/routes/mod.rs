pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::ui::handlers;

/// Largest accepted request body; bounds resume uploads.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/", get(handlers::handle_home))
        .route("/upload", post(handlers::handle_upload))
        .route("/navigate", post(handlers::handle_navigate))
        .route("/breakdown", post(handlers::handle_breakdown))
        .route("/ats", post(handlers::handle_ats))
        .route("/interview", post(handlers::handle_interview))
        .route("/reset", post(handlers::handle_reset))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, Response, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::extract::build_test_pdf;
    use crate::llm_client::{CompletionModel, FailingModel, MockModel};
    use crate::session::{SessionStore, SESSION_COOKIE};

    const BOUNDARY: &str = "jobjockey-test-boundary";

    fn app_with_store(model: Arc<dyn CompletionModel>) -> (Router, SessionStore) {
        let sessions = SessionStore::new();
        let router = build_router(AppState {
            model,
            sessions: sessions.clone(),
        });
        (router, sessions)
    }

    fn app(model: Arc<dyn CompletionModel>) -> Router {
        app_with_store(model).0
    }

    fn multipart_upload(file_name: &str, content_type: &str, data: &[u8]) -> Body {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        Body::from(body)
    }

    async fn upload(
        router: &Router,
        cookie: Option<&str>,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> Response<Body> {
        let mut request = Request::post("/upload").header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        router
            .clone()
            .oneshot(
                request
                    .body(multipart_upload(file_name, content_type, data))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn post_form(
        router: &Router,
        uri: &str,
        cookie: Option<&str>,
        form: &str,
    ) -> Response<Body> {
        let mut request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        router
            .clone()
            .oneshot(request.body(Body::from(form.to_string())).unwrap())
            .await
            .unwrap()
    }

    /// `name=value` of the session cookie a response sets.
    fn session_cookie(response: &Response<Body>) -> String {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(SESSION_COOKIE))
            .and_then(|v| v.split(';').next())
            .expect("session cookie")
            .to_string()
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let router = app(Arc::new(MockModel::replying("")));
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("\"status\":\"ok\""));
    }

    #[tokio::test]
    async fn test_home_without_resume_prompts_upload() {
        let model = Arc::new(MockModel::replying("unused"));
        let (router, sessions) = app_with_store(model.clone());
        let response = router
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert!(body_text(response).await.contains("Upload a resume to get started."));
        assert!(model.prompts().is_empty());
        assert_eq!(sessions.len().await, 0);
    }

    #[tokio::test]
    async fn test_pdf_upload_on_breakdown_view_runs_breakdown() {
        let model = Arc::new(MockModel::replying("## Experience\n\n- Software Engineer at Acme"));
        let router = app(model.clone());

        let pdf = build_test_pdf(&["John Doe, Software Engineer"]);
        let response = upload(&router, None, "resume.pdf", "application/pdf", &pdf).await;
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = session_cookie(&response);
        let html = body_text(response).await;

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Split this resume into structured sections:"));
        assert!(prompts[0].contains("John Doe, Software Engineer"));
        assert!(html.contains("<h2>Experience</h2>"), "{html}");
        assert!(html.contains("<li>Software Engineer at Acme</li>"), "{html}");

        let response = post_form(&router, "/navigate", Some(&cookie), "mode=breakdown").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(model.prompts().len(), 2);
    }

    #[tokio::test]
    async fn test_upload_on_other_view_redirects_without_model_call() {
        let model = Arc::new(MockModel::replying("Score: 1"));
        let router = app(model.clone());

        let response = post_form(&router, "/navigate", None, "mode=ats").await;
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = session_cookie(&response);

        let response = upload(&router, Some(&cookie), "cv.txt", "text/plain", b"Jane Roe").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");

        let response = router
            .clone()
            .oneshot(
                Request::get("/")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains("Run ATS Evaluation"), "{html}");
        assert!(html.contains("✅ Resume uploaded!"), "{html}");
        assert!(model.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_ats_report_rendered() {
        let model = Arc::new(MockModel::replying(
            "Score: 88\nVerdict: Good\n🔍 Missing\nSome detail",
        ));
        let router = app(model.clone());
        let response = upload(&router, None, "cv.txt", "text/plain", b"Jane Roe, SRE").await;
        let cookie = session_cookie(&response);

        let response = post_form(&router, "/ats", Some(&cookie), "").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;

        assert!(html.contains(r#"<div class="ats-score">Score: 88</div>"#), "{html}");
        assert!(html.contains("<code>Good</code>"), "{html}");
        assert!(html.contains("<h4>🔍 Missing</h4>"), "{html}");
        let prompts = model.prompts();
        let prompt = prompts.last().unwrap();
        assert!(prompt.contains("You are an ATS evaluation assistant."));
        assert!(prompt.contains("Jane Roe, SRE"));
    }

    #[tokio::test]
    async fn test_coding_interview_uses_level() {
        let model = Arc::new(MockModel::replying("Q1: Two Sum\n\nQ2: Merge Intervals"));
        let router = app(model.clone());
        let response = upload(&router, None, "cv.txt", "text/plain", b"cv").await;
        let cookie = session_cookie(&response);

        let response =
            post_form(&router, "/interview", Some(&cookie), "round=Coding&level=5").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;

        assert_eq!(html.matches("question-block question-spacing").count(), 2);
        assert!(html.contains("📌 Coding Round Questions"));
        assert!(html.contains(r#"<option value="5" selected>"#));
        let prompts = model.prompts();
        assert!(prompts
            .last()
            .unwrap()
            .contains("Generate 10 questions of level 5 difficulty"));
    }

    #[tokio::test]
    async fn test_new_upload_replaces_previous_resume() {
        let model = Arc::new(MockModel::replying("ok"));
        let router = app(model.clone());
        let response = upload(&router, None, "a.txt", "text/plain", b"FIRST RESUME").await;
        let cookie = session_cookie(&response);
        upload(&router, Some(&cookie), "b.txt", "text/plain", b"SECOND RESUME").await;

        post_form(&router, "/breakdown", Some(&cookie), "").await;
        let prompts = model.prompts();
        let prompt = prompts.last().unwrap();
        assert!(prompt.contains("SECOND RESUME"));
        assert!(!prompt.contains("FIRST RESUME"));
    }

    #[tokio::test]
    async fn test_upload_failures_are_inline_notices() {
        let (router, sessions) = app_with_store(Arc::new(MockModel::replying("")));

        let response = upload(&router, None, "cv.txt", "text/plain", &[0xff, 0xfe, 0x00]).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(response).await.contains("not valid UTF-8"));

        let response = upload(&router, None, "cv.pdf", "application/pdf", b"%PDF-garbage").await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(response).await.contains(r#"class="notice""#));

        let response = upload(&router, None, "cv.docx", "application/msword", b"doc").await;
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        assert_eq!(sessions.len().await, 0);
    }

    #[tokio::test]
    async fn test_oversized_upload_is_payload_too_large() {
        let (router, sessions) = app_with_store(Arc::new(MockModel::replying("")));
        let data = vec![b'a'; MAX_UPLOAD_BYTES + 1024 * 1024];

        let response = upload(&router, None, "cv.txt", "text/plain", &data).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body_text(response).await.contains("10 MB limit"));
        assert_eq!(sessions.len().await, 0);
    }

    #[tokio::test]
    async fn test_cookieless_analysis_creates_no_session() {
        let model = Arc::new(MockModel::replying("unused"));
        let (router, sessions) = app_with_store(model.clone());

        for _ in 0..5 {
            let response = post_form(&router, "/ats", None, "").await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert!(response.headers().get(header::SET_COOKIE).is_none());
        }
        let response = post_form(&router, "/interview", None, "round=HR").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert_eq!(sessions.len().await, 0);
        assert!(model.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_is_bad_gateway() {
        let (router, sessions) = app_with_store(Arc::new(FailingModel));

        let response = upload(&router, None, "cv.txt", "text/plain", b"cv").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let cookie = session_cookie(&response);
        assert!(body_text(response).await.contains("could not be reached"));
        assert_eq!(sessions.len().await, 1);

        let response = post_form(&router, "/ats", Some(&cookie), "").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(sessions.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_round_is_bad_request() {
        let router = app(Arc::new(MockModel::replying("")));
        let response = upload(&router, None, "cv.txt", "text/plain", b"cv").await;
        let cookie = session_cookie(&response);

        let response = post_form(&router, "/interview", Some(&cookie), "round=Panel").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reset_forgets_resume() {
        let model = Arc::new(MockModel::replying("ok"));
        let (router, sessions) = app_with_store(model.clone());
        let response = upload(&router, None, "cv.txt", "text/plain", b"cv").await;
        let cookie = session_cookie(&response);
        let calls = model.prompts().len();

        let response = post_form(&router, "/reset", Some(&cookie), "").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(sessions.len().await, 0);

        let response = post_form(&router, "/breakdown", Some(&cookie), "").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(model.prompts().len(), calls);
    }
}
