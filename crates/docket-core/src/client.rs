//! HTTP client for the Docket backend.
//!
//! [`ApiClient`] wraps a `reqwest::Client` and knows every endpoint the case
//! assistant talks to. All responses pass through one classification step so
//! that status codes map onto [`DocketError`] the same way everywhere:
//!
//! | Status | Error |
//! |---|---|
//! | 401 | [`DocketError::Unauthorized`] |
//! | 429 | [`DocketError::RateLimited`] |
//! | 422 | [`DocketError::Validation`] (body logged at error level) |
//! | other non-2xx | [`DocketError::Api`] |
//!
//! Transport failures surface as [`DocketError::Http`].

use std::{path::Path, time::Duration};

use log::{debug, error};
use reqwest::{
    multipart::{Form, Part},
    Method, RequestBuilder, Response, StatusCode, Url,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    error::{DocketError, Result},
    models::{Analysis, CaseSummary, Evidence, WireMessage},
    params::{CaseContext, CreateCase, ForgotPassword, Login, Register, ResetPassword},
    progress::ProgressUpdate,
};

/// Backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Token and display name returned by login and registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    #[serde(default)]
    pub user_name: String,
}

/// The part of a full case record the client uses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseDetail {
    #[serde(default)]
    pub chat_history: Vec<WireMessage>,
}

#[derive(Serialize)]
struct AskBody<'a> {
    question: &'a str,
    chat_history: &'a [WireMessage],
}

#[derive(Deserialize)]
struct AskReply {
    answer: String,
}

#[derive(Serialize)]
struct ChatBody<'a> {
    query: &'a str,
    case_context: &'a str,
}

#[derive(Deserialize)]
struct ChatReply {
    response: String,
}

#[derive(Serialize)]
struct DraftBody<'a> {
    scenario: &'a str,
    template_type: &'a str,
}

#[derive(Deserialize)]
struct DraftReply {
    drafted_document: String,
}

#[derive(Deserialize)]
struct EvidenceReply {
    evidence: Evidence,
}

/// Async client for the backend REST API.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DocketError::http("Failed to build HTTP client", e))?;
        let raw = base_url.into();
        let base_url = Url::parse(&raw)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| DocketError::Configuration {
                message: format!("Invalid API URL: {raw}"),
            })?;
        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    /// A client sharing this one's pool that sends the given bearer token.
    pub fn with_token(&self, token: Option<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL always has a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!("{method} {url}");
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| DocketError::http("Request failed", e))?;
        check_status(response).await
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        self.send(builder)
            .await?
            .json()
            .await
            .map_err(|e| DocketError::http("Failed to decode response", e))
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        self.send(builder).await.map(|_| ())
    }

    /// `POST /auth/login`
    pub async fn login(&self, params: &Login) -> Result<AuthToken> {
        self.send_json(self.request(Method::POST, &["auth", "login"]).json(params))
            .await
    }

    /// `POST /auth/register`
    pub async fn register(&self, params: &Register) -> Result<AuthToken> {
        let request = self.request(Method::POST, &["auth", "register"]);
        self.send_json(request.json(params)).await
    }

    /// `POST /auth/forgot-password`
    pub async fn forgot_password(&self, params: &ForgotPassword) -> Result<()> {
        let request = self.request(Method::POST, &["auth", "forgot-password"]);
        self.send_empty(request.json(params)).await
    }

    /// `POST /auth/reset-password`
    pub async fn reset_password(&self, params: &ResetPassword) -> Result<()> {
        let request = self.request(Method::POST, &["auth", "reset-password"]);
        self.send_empty(request.json(params)).await
    }

    /// `POST /analyze` with the situation and an optional attachment.
    pub async fn analyze(&self, situation: &str, file: Option<&Path>) -> Result<Analysis> {
        let mut form = Form::new().text("situation", situation.to_string());
        if let Some(path) = file {
            form = form.part("file", file_part(path).await?);
        }
        self.send_json(self.request(Method::POST, &["analyze"]).multipart(form))
            .await
    }

    /// `GET /cases/{id}`
    pub async fn get_case(&self, case_id: &str) -> Result<CaseDetail> {
        self.send_json(self.request(Method::GET, &["cases", case_id]))
            .await
    }

    /// `GET /cases?email=`
    pub async fn list_cases(&self, email: &str) -> Result<Vec<CaseSummary>> {
        let request = self.request(Method::GET, &["cases"]);
        self.send_json(request.query(&[("email", email)])).await
    }

    /// `POST /cases?email=`
    pub async fn create_case(&self, email: &str, params: &CreateCase) -> Result<CaseSummary> {
        self.send_json(
            self.request(Method::POST, &["cases"])
                .query(&[("email", email)])
                .json(params),
        )
        .await
    }

    /// `DELETE /cases/{id}`
    pub async fn delete_case(&self, case_id: &str) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &["cases", case_id]))
            .await
    }

    /// `PUT /cases/{id}/progress`
    pub async fn update_progress(&self, case_id: &str, progress: &ProgressUpdate) -> Result<()> {
        let request = self.request(Method::PUT, &["cases", case_id, "progress"]);
        self.send_empty(request.json(progress)).await
    }

    /// `PUT /cases/{id}/context`
    pub async fn save_context(&self, case_id: &str, context: &CaseContext) -> Result<()> {
        let request = self.request(Method::PUT, &["cases", case_id, "context"]);
        self.send_empty(request.json(context)).await
    }

    /// `POST /ask?case_id=`; returns the assistant's answer.
    pub async fn ask(
        &self,
        case_id: &str,
        question: &str,
        history: &[WireMessage],
    ) -> Result<String> {
        let reply: AskReply = self
            .send_json(
                self.request(Method::POST, &["ask"])
                    .query(&[("case_id", case_id)])
                    .json(&AskBody {
                        question,
                        chat_history: history,
                    }),
            )
            .await?;
        Ok(reply.answer)
    }

    /// `POST /chat`; returns the general assistant's response.
    pub async fn general_chat(&self, query: &str, case_context: &str) -> Result<String> {
        let reply: ChatReply = self
            .send_json(self.request(Method::POST, &["chat"]).json(&ChatBody {
                query,
                case_context,
            }))
            .await?;
        Ok(reply.response)
    }

    /// `POST /draft-document`; returns the drafted text.
    pub async fn draft_document(&self, scenario: &str, template: &str) -> Result<String> {
        let reply: DraftReply = self
            .send_json(
                self.request(Method::POST, &["draft-document"])
                    .json(&DraftBody {
                        scenario,
                        template_type: template,
                    }),
            )
            .await?;
        Ok(reply.drafted_document)
    }

    /// `GET /cases/{id}/evidence`
    pub async fn list_evidence(&self, case_id: &str) -> Result<Vec<Evidence>> {
        self.send_json(self.request(Method::GET, &["cases", case_id, "evidence"]))
            .await
    }

    /// `POST /cases/{id}/evidence`
    pub async fn upload_evidence(&self, case_id: &str, path: &Path) -> Result<Evidence> {
        let form = Form::new().part("file", file_part(path).await?);
        let reply: EvidenceReply = self
            .send_json(
                self.request(Method::POST, &["cases", case_id, "evidence"])
                    .multipart(form),
            )
            .await?;
        Ok(reply.evidence)
    }

    /// `DELETE /cases/{id}/evidence/{evidenceId}`
    pub async fn delete_evidence(&self, case_id: &str, evidence_id: &str) -> Result<()> {
        self.send_empty(self.request(
            Method::DELETE,
            &["cases", case_id, "evidence", evidence_id],
        ))
        .await
    }
}

async fn file_part(path: &Path) -> Result<Part> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| DocketError::FileSystem {
            path: path.to_path_buf(),
            source,
        })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(Part::bytes(bytes).file_name(file_name))
}

/// Maps a response onto the error taxonomy, passing successes through.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED => Err(DocketError::Unauthorized),
        StatusCode::TOO_MANY_REQUESTS => Err(DocketError::RateLimited),
        StatusCode::UNPROCESSABLE_ENTITY => {
            error!("Backend rejected request (422): {body}");
            Err(DocketError::Validation {
                detail: error_detail(&body, status),
            })
        }
        _ => Err(DocketError::Api {
            status: status.as_u16(),
            message: error_detail(&body, status),
        }),
    }
}

/// Pulls a readable message out of an error body.
///
/// The backend answers errors with `{"detail": ...}` where `detail` is either
/// a string or a list of validation records.
fn error_detail(body: &str, status: StatusCode) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("detail").cloned());
    match detail {
        Some(serde_json::Value::String(message)) => message,
        Some(other) => other.to_string(),
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    }
}
