use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use crate::fixtures::{ContentReply, ResultReply, ServiceFixture, StatusReply, SubmitReply};

/// A file part received by `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub size: usize,
}

/// Everything one `POST /api/chat` carried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedSubmission {
    pub fields: BTreeMap<String, String>,
    pub files: Vec<UploadedFile>,
}

/// Request counters per endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestCounts {
    pub submit: usize,
    pub status: usize,
    pub result: usize,
    pub content: usize,
    pub cancel: usize,
}

pub(crate) struct ServiceState {
    fixture: ServiceFixture,
    statuses: VecDeque<StatusReply>,
    sessions: HashSet<String>,
    pub(crate) submissions: Vec<RecordedSubmission>,
    pub(crate) cancelled: Vec<String>,
    pub(crate) counts: RequestCounts,
}

pub(crate) type SharedState = Arc<Mutex<ServiceState>>;

impl ServiceState {
    pub(crate) fn new(fixture: ServiceFixture) -> Self {
        Self {
            statuses: VecDeque::from(fixture.statuses.clone()),
            fixture,
            sessions: HashSet::new(),
            submissions: Vec::new(),
            cancelled: Vec::new(),
            counts: RequestCounts::default(),
        }
    }

    fn next_status(&mut self) -> Option<StatusReply> {
        if self.statuses.len() > 1 {
            self.statuses.pop_front()
        } else {
            self.statuses.front().cloned()
        }
    }
}

fn error_response(status: u16, detail: &str) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "detail": detail }))).into_response()
}

fn unknown_session(session_id: &str) -> Response {
    log::warn!("Request for unknown session {}", session_id);
    error_response(404, "Session not found")
}

fn raw_json(body: String) -> Response {
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "p2s-service-mock"
    }))
}

pub(crate) async fn submit(State(state): State<SharedState>, mut multipart: Multipart) -> Response {
    let mut submission = RecordedSubmission::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return error_response(400, &format!("Malformed multipart body: {}", e)),
        };

        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => match field.bytes().await {
                Ok(bytes) => submission.files.push(UploadedFile {
                    file_name,
                    size: bytes.len(),
                }),
                Err(e) => return error_response(400, &format!("Failed to read {}: {}", file_name, e)),
            },
            None => match field.text().await {
                Ok(value) => {
                    submission.fields.insert(name, value);
                }
                Err(e) => return error_response(400, &format!("Failed to read field {}: {}", name, e)),
            },
        }
    }

    let mut state = state.lock().unwrap();
    state.counts.submit += 1;
    log::info!(
        "Received {} file(s) with fields {:?}",
        submission.files.len(),
        submission.fields
    );
    state.submissions.push(submission);

    match state.fixture.submit.clone() {
        SubmitReply::Accept {
            session_id,
            message,
        } => {
            let session_id = session_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            state.sessions.insert(session_id.clone());
            Json(json!({ "session_id": session_id, "message": message })).into_response()
        }
        SubmitReply::NullSession => {
            Json(json!({ "session_id": null, "message": "Generation started" })).into_response()
        }
        SubmitReply::Reject { status, detail } => error_response(status, &detail),
    }
}

pub(crate) async fn status(
    Path(session_id): Path<String>,
    State(state): State<SharedState>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.counts.status += 1;
    if !state.sessions.contains(&session_id) {
        return unknown_session(&session_id);
    }

    match state.next_status() {
        Some(StatusReply::Snapshot { snapshot }) => Json(snapshot).into_response(),
        Some(StatusReply::Error { status, detail }) => error_response(status, &detail),
        Some(StatusReply::Raw { body }) => raw_json(body),
        None => error_response(500, "No status scripted"),
    }
}

pub(crate) async fn result(
    Path(session_id): Path<String>,
    State(state): State<SharedState>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.counts.result += 1;
    if !state.sessions.contains(&session_id) {
        return unknown_session(&session_id);
    }

    match state.fixture.result.clone() {
        ResultReply::Ready { bundle } => Json(bundle).into_response(),
        ResultReply::NotReady => {
            (StatusCode::ACCEPTED, Json(json!({ "status": "running" }))).into_response()
        }
        ResultReply::Error { status, detail } => error_response(status, &detail),
    }
}

pub(crate) async fn slide_content(
    Path(session_id): Path<String>,
    State(state): State<SharedState>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.counts.content += 1;
    if !state.sessions.contains(&session_id) {
        return unknown_session(&session_id);
    }

    match state.fixture.content.clone() {
        ContentReply::Ready { bundle } => Json(bundle).into_response(),
        ContentReply::Error { status, detail } => error_response(status, &detail),
        ContentReply::Raw { body } => raw_json(body),
    }
}

pub(crate) async fn cancel(
    Path(session_id): Path<String>,
    State(state): State<SharedState>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.counts.cancel += 1;
    if !state.sessions.contains(&session_id) {
        return unknown_session(&session_id);
    }

    log::info!("Cancelling session {}", session_id);
    state.cancelled.push(session_id);
    Json(json!({ "message": "Cancelled" })).into_response()
}
