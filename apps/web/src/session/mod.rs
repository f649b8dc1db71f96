//! Per-browser session state for the interactive shell.
//!
//! Sessions are keyed by an opaque cookie and live only in process memory.
//! A session is only stored once something is written to it. Idle sessions
//! are discarded the next time any request touches the store.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::extract::MediaType;

pub const SESSION_COOKIE: &str = "jobjockey_session";
const SESSION_IDLE_MINUTES: i64 = 120;

pub const DEFAULT_LEVEL: &str = "3";
pub const LEVELS: [&str; 5] = ["1", "2", "3", "4", "5"];

/// Interview round offered by the question generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InterviewRound {
    #[default]
    Hr,
    Technical,
    Coding,
}

impl InterviewRound {
    pub const ALL: [InterviewRound; 3] = [
        InterviewRound::Hr,
        InterviewRound::Technical,
        InterviewRound::Coding,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InterviewRound::Hr => "HR",
            InterviewRound::Technical => "Technical",
            InterviewRound::Coding => "Coding",
        }
    }
}

impl FromStr for InterviewRound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InterviewRound::ALL
            .into_iter()
            .find(|round| round.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown interview round '{s}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewOptions {
    pub round: InterviewRound,
    /// Only read for coding rounds.
    pub level: String,
}

impl Default for InterviewOptions {
    fn default() -> Self {
        Self {
            round: InterviewRound::default(),
            level: DEFAULT_LEVEL.to_string(),
        }
    }
}

/// Which view the user is on, with that view's own sub-state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NavigationState {
    #[default]
    Breakdown,
    AtsAnalysis,
    InterviewGen(InterviewOptions),
}

/// Navigation targets as posted by the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Breakdown,
    AtsAnalysis,
    InterviewGen,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Breakdown, Mode::AtsAnalysis, Mode::InterviewGen];

    pub fn key(&self) -> &'static str {
        match self {
            Mode::Breakdown => "breakdown",
            Mode::AtsAnalysis => "ats",
            Mode::InterviewGen => "interview",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Breakdown => "📑 Resume Breakdown",
            Mode::AtsAnalysis => "📈 ATS Analyzer",
            Mode::InterviewGen => "🧠 Mock Interview",
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.key() == s.trim())
            .ok_or_else(|| format!("Unknown mode '{s}'"))
    }
}

impl NavigationState {
    pub fn mode(&self) -> Mode {
        match self {
            NavigationState::Breakdown => Mode::Breakdown,
            NavigationState::AtsAnalysis => Mode::AtsAnalysis,
            NavigationState::InterviewGen(_) => Mode::InterviewGen,
        }
    }

    /// Moves to `mode`, keeping interview options when already on that view.
    pub fn switch_to(&self, mode: Mode) -> NavigationState {
        match (self, mode) {
            (NavigationState::InterviewGen(opts), Mode::InterviewGen) => {
                NavigationState::InterviewGen(opts.clone())
            }
            (_, Mode::Breakdown) => NavigationState::Breakdown,
            (_, Mode::AtsAnalysis) => NavigationState::AtsAnalysis,
            (_, Mode::InterviewGen) => NavigationState::InterviewGen(InterviewOptions::default()),
        }
    }
}

/// Text extracted from the most recent upload.
#[derive(Debug, Clone)]
pub struct ExtractedResume {
    pub file_name: String,
    pub media_type: MediaType,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub resume: Option<ExtractedResume>,
    pub navigation: NavigationState,
    last_seen: DateTime<Utc>,
}

impl Session {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            resume: None,
            navigation: NavigationState::default(),
            last_seen: now,
        }
    }
}

/// In-memory session map shared by all handlers.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the caller's session so no lock is held while the
    /// caller works. A missing, malformed, unknown or expired cookie yields a
    /// fresh session that is not stored until something is written to it.
    pub async fn load(&self, jar: &CookieJar) -> Session {
        let now = Utc::now();
        let mut sessions = self.inner.write().await;
        prune_idle(&mut sessions, now);

        let existing = match session_id(jar) {
            Some(id) => sessions.get_mut(&id),
            None => None,
        };
        match existing {
            Some(session) => {
                session.last_seen = now;
                session.clone()
            }
            None => Session::new(now),
        }
    }

    /// Applies `apply` to the caller's session, creating the session and
    /// issuing its cookie on first write.
    pub async fn update<F>(&self, jar: CookieJar, apply: F) -> CookieJar
    where
        F: FnOnce(&mut Session),
    {
        let now = Utc::now();
        let mut sessions = self.inner.write().await;
        prune_idle(&mut sessions, now);

        let existing = match session_id(&jar) {
            Some(id) => sessions.get_mut(&id),
            None => None,
        };
        if let Some(session) = existing {
            session.last_seen = now;
            apply(session);
            return jar;
        }

        let id = Uuid::new_v4();
        let mut session = Session::new(now);
        apply(&mut session);
        sessions.insert(id, session);
        debug!("Created session {id} ({} active)", sessions.len());

        let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        jar.add(cookie)
    }

    /// Replaces any previously uploaded resume.
    pub async fn set_resume(&self, jar: CookieJar, resume: ExtractedResume) -> CookieJar {
        self.update(jar, |session| session.resume = Some(resume)).await
    }

    pub async fn set_navigation(&self, jar: CookieJar, navigation: NavigationState) -> CookieJar {
        self.update(jar, |session| session.navigation = navigation).await
    }

    /// Ends a session and returns a jar that clears its cookie.
    pub async fn end(&self, jar: CookieJar) -> CookieJar {
        if let Some(id) = session_id(&jar) {
            self.inner.write().await.remove(&id);
            debug!("Ended session {id}");
        }
        jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

fn session_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
}

fn prune_idle(sessions: &mut HashMap<Uuid, Session>, now: DateTime<Utc>) {
    let cutoff = now - Duration::minutes(SESSION_IDLE_MINUTES);
    sessions.retain(|_, session| session.last_seen > cutoff);
}
