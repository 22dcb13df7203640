#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    body::Bytes,
    extract::{Path as UrlPath, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{delete, get, post, put},
    Json, Router,
};
use docket_core::{Desk, DeskBuilder};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const TOKEN: &str = "tok-1";
pub const CASE_ID: &str = "case-1";
pub const STRATEGY: &str = "1. Send notice: write a legal notice to the landlord. \
     2. File suit: approach the consumer court. \
     3. Attend hearing: bring all rent receipts.";

/// One request as the mock backend saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub query: HashMap<String, String>,
    pub body: String,
    pub token: Option<String>,
}

/// Behaviour switches and everything the mock backend received.
#[derive(Debug, Default)]
pub struct BackendState {
    pub requests: Vec<Recorded>,
    pub progress: Vec<Value>,
    pub contexts: Vec<Value>,
    /// Step number the case listing reports
    pub remote_step: Option<u32>,
    pub remote_status: String,
    /// Whether a progress write shows up in the next listing
    pub echo_progress: bool,
    pub reject_tokens: bool,
    pub rate_limited: bool,
    pub fail_assistant: bool,
    /// Status every progress write is answered with instead of success
    pub progress_failure: Option<StatusCode>,
}

type Rejection = (StatusCode, Json<Value>);

/// In-process stand-in for the Docket REST backend.
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<BackendState>>,
}

impl MockBackend {
    /// Serves the mock on an ephemeral port and returns its base URL.
    pub async fn start() -> (Self, String) {
        let backend = Self::default();
        backend.update(|state| {
            state.remote_status = "Active".to_string();
            state.echo_progress = true;
        });

        let router = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/register", post(register))
            .route("/auth/forgot-password", post(accept))
            .route("/auth/reset-password", post(accept))
            .route("/analyze", post(analyze))
            .route("/cases", get(list_cases).post(create_case))
            .route("/cases/:id", get(get_case).delete(delete_case))
            .route("/cases/:id/progress", put(update_progress))
            .route("/cases/:id/context", put(save_context))
            .route(
                "/cases/:id/evidence",
                get(list_evidence).post(upload_evidence),
            )
            .route("/cases/:id/evidence/:evidence_id", delete(delete_evidence))
            .route("/ask", post(ask))
            .route("/chat", post(chat))
            .route("/draft-document", post(draft_document))
            .with_state(backend.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend has no address");
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Mock backend stopped");
        });

        (backend, format!("http://{addr}"))
    }

    pub fn update(&self, f: impl FnOnce(&mut BackendState)) {
        f(&mut self.state.lock().unwrap());
    }

    pub fn progress(&self) -> Vec<Value> {
        self.state.lock().unwrap().progress.clone()
    }

    pub fn contexts(&self) -> Vec<Value> {
        self.state.lock().unwrap().contexts.clone()
    }

    /// Requests received for `path`, oldest first.
    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|request| request.path == path)
            .cloned()
            .collect()
    }

    fn record(
        &self,
        path: String,
        headers: &HeaderMap,
        query: HashMap<String, String>,
        body: String,
    ) -> Result<(), Rejection> {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string);
        let mut state = self.state.lock().unwrap();
        state.requests.push(Recorded {
            path,
            query,
            body,
            token,
        });
        if state.rate_limited {
            return Err((
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({"detail": "Too many requests"})),
            ));
        }
        if state.reject_tokens {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({"detail": "Could not validate credentials"})),
            ));
        }
        Ok(())
    }
}

async fn login(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Rejection> {
    backend.record("/auth/login".into(), &headers, HashMap::new(), body.to_string())?;
    if body["password"] == "wrong" {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Incorrect email or password"})),
        ));
    }
    Ok(Json(json!({"access_token": TOKEN, "token_type": "bearer", "user_name": "Asha"})))
}

async fn register(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Rejection> {
    backend.record("/auth/register".into(), &headers, HashMap::new(), body.to_string())?;
    if body["email"] == "taken@example.com" {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Email already registered"})),
        ));
    }
    Ok(Json(json!({"access_token": TOKEN, "token_type": "bearer"})))
}

async fn accept(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Rejection> {
    backend.record("/auth".into(), &headers, HashMap::new(), body.to_string())?;
    Ok(Json(json!({"message": "ok"})))
}

async fn analyze(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, Rejection> {
    let body = String::from_utf8_lossy(&body).into_owned();
    backend.record("/analyze".into(), &headers, HashMap::new(), body)?;
    Ok(Json(json!({
        "facts": {
            "incident_date": "12/03/2024",
            "landlord": "Not mentioned",
            "deposit": 50000
        },
        "strategy": STRATEGY,
        "laws": ["Transfer of Property Act, 1882"]
    })))
}

async fn list_cases(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, Rejection> {
    backend.record("/cases".into(), &headers, query, String::new())?;
    let state = backend.state.lock().unwrap();
    Ok(Json(json!([{
        "_id": CASE_ID,
        "title": "Property: My landlord refu...",
        "type": "Property",
        "status": state.remote_status,
        "step": state.remote_step,
        "date": "2024-03-12"
    }])))
}

async fn create_case(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Rejection> {
    backend.record("/cases/new".into(), &headers, query, body.to_string())?;
    backend.update(|state| state.remote_step = Some(1));
    Ok(Json(json!({
        "id": CASE_ID,
        "title": body["title"],
        "type": body["type"],
        "status": "Active",
        "step": 1
    })))
}

async fn get_case(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<String>,
) -> Result<Json<Value>, Rejection> {
    backend.record(format!("/cases/{id}"), &headers, HashMap::new(), String::new())?;
    Ok(Json(json!({"_id": id, "chat_history": []})))
}

async fn delete_case(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<String>,
) -> Result<Json<Value>, Rejection> {
    backend.record(format!("/cases/{id}/delete"), &headers, HashMap::new(), String::new())?;
    Ok(Json(json!({"message": "Case deleted"})))
}

async fn update_progress(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Rejection> {
    backend.record(format!("/cases/{id}/progress"), &headers, HashMap::new(), body.to_string())?;
    if let Some(status) = backend.state.lock().unwrap().progress_failure {
        return Err((status, Json(json!({"detail": "Progress not saved"}))));
    }
    backend.update(|state| {
        if state.echo_progress {
            state.remote_step = body["step"].as_u64().map(|step| step as u32);
            state.remote_status = body["status"].as_str().unwrap_or_default().to_string();
        }
        state.progress.push(body);
    });
    Ok(Json(json!({"message": "Progress updated"})))
}

async fn save_context(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Rejection> {
    backend.record(format!("/cases/{id}/context"), &headers, HashMap::new(), body.to_string())?;
    backend.update(|state| state.contexts.push(body));
    Ok(Json(json!({"message": "Context saved"})))
}

async fn list_evidence(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<String>,
) -> Result<Json<Value>, Rejection> {
    backend.record(format!("/cases/{id}/evidence"), &headers, HashMap::new(), String::new())?;
    Ok(Json(json!([
        {"_id": "ev-1", "filename": "receipt.txt", "content_type": "text/plain"}
    ])))
}

async fn upload_evidence(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<String>,
    body: Bytes,
) -> Result<Json<Value>, Rejection> {
    let body = String::from_utf8_lossy(&body).into_owned();
    backend.record(format!("/cases/{id}/evidence/upload"), &headers, HashMap::new(), body)?;
    Ok(Json(json!({
        "message": "Uploaded",
        "evidence": {"id": "ev-1", "filename": "receipt.txt", "content_type": "text/plain"}
    })))
}

async fn delete_evidence(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    UrlPath((id, evidence_id)): UrlPath<(String, String)>,
) -> Result<StatusCode, Rejection> {
    backend.record(
        format!("/cases/{id}/evidence/{evidence_id}"),
        &headers,
        HashMap::new(),
        String::new(),
    )?;
    Ok(StatusCode::NO_CONTENT)
}

async fn ask(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Rejection> {
    backend.record("/ask".into(), &headers, query, body.to_string())?;
    if backend.state.lock().unwrap().fail_assistant {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "Model unavailable"})),
        ));
    }
    Ok(Json(json!({"answer": "Send the landlord a legal notice first."})))
}

async fn chat(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Rejection> {
    backend.record("/chat".into(), &headers, HashMap::new(), body.to_string())?;
    if backend.state.lock().unwrap().fail_assistant {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "Model unavailable"})),
        ));
    }
    Ok(Json(json!({"response": "A rent agreement should be registered."})))
}

async fn draft_document(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Rejection> {
    backend.record("/draft-document".into(), &headers, HashMap::new(), body.to_string())?;
    let template = body["template_type"].as_str().unwrap_or_default().to_string();
    Ok(Json(json!({"drafted_document": format!("LEGAL NOTICE ({template})")})))
}

/// Helper function to create a desk talking to `base_url`
pub async fn create_test_desk(base_url: &str, temp_dir: &Path) -> Desk {
    create_test_desk_with_delay(base_url, temp_dir, Duration::from_millis(20)).await
}

pub async fn create_test_desk_with_delay(
    base_url: &str,
    temp_dir: &Path,
    context_delay: Duration,
) -> Desk {
    DeskBuilder::new()
        .with_database_path(Some(temp_dir.join("test.db")))
        .with_base_url(Some(base_url))
        .with_timeout(Duration::from_secs(5))
        .with_context_delay(context_delay)
        .build()
        .await
        .expect("Failed to create desk")
}

/// A running mock, a desk pointed at it and the desk's directory.
pub async fn setup() -> (MockBackend, Desk, TempDir) {
    let (backend, url) = MockBackend::start().await;
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let desk = create_test_desk(&url, temp_dir.path()).await;
    (backend, desk, temp_dir)
}
