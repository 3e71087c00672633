//! HTTP client for the MentorAI backend.
//!
//! Every call is a thin wrapper: build the request, attach the bearer token,
//! decode JSON. Nothing here retries or caches.

use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::settings::ApiConfig;
use crate::payloads::{
    Assessment, AssessmentRequest, AuthResponse, Difficulty, FeedbackReport, FeedbackRequest,
    LoginRequest, MarksAnalysis, RegisterRequest, SyllabusAnalysis, User,
};
use crate::stager::StagedFile;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("could not reach the server: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{detail}")]
    Status { status: StatusCode, detail: String },
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("request ended without a result")]
    Interrupted,
    #[error("offline mode")]
    Offline,
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    offline: bool,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            offline: false,
        })
    }

    pub fn from_config(cfg: &ApiConfig) -> ApiResult<Self> {
        let mut client = Self::new(&cfg.base_url, cfg.timeout())?;
        client.offline = cfg.offline;
        Ok(client)
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    fn ensure_online(&self) -> ApiResult<()> {
        if self.offline {
            return Err(ApiError::Offline);
        }
        Ok(())
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.ensure_online()?;
        log::debug!(target: "api", "GET {path}");
        let resp = self.authorize(self.http.get(self.endpoint(path))).send().await?;
        decode(resp).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.ensure_online()?;
        log::debug!(target: "api", "POST {path}");
        let resp = self
            .authorize(self.http.post(self.endpoint(path)).json(body))
            .send()
            .await?;
        decode(resp).await
    }

    async fn post_file<T: DeserializeOwned>(
        &self,
        path: &str,
        file: &StagedFile,
        fields: Vec<(&'static str, String)>,
    ) -> ApiResult<T> {
        self.ensure_online()?;
        log::debug!(target: "api", "POST {path} (multipart, {} bytes)", file.size);
        let bytes = file.read().await?;
        let part = Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(file.mime())?;
        let mut form = Form::new().part("file", part);
        for (name, value) in fields {
            form = form.text(name, value);
        }
        let resp = self
            .authorize(self.http.post(self.endpoint(path)).multipart(form))
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse> {
        self.post_json("/auth/login", &LoginRequest { email, password })
            .await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> ApiResult<AuthResponse> {
        self.post_json(
            "/auth/register",
            &RegisterRequest {
                name,
                email,
                password,
            },
        )
        .await
    }

    pub async fn profile(&self) -> ApiResult<User> {
        self.get_json("/auth/profile").await
    }

    pub async fn analyze_marks(&self, csv: &StagedFile) -> ApiResult<MarksAnalysis> {
        self.post_file("/analyze-marks", csv, Vec::new()).await
    }

    pub async fn analyze_syllabus(&self, pdf: &StagedFile) -> ApiResult<SyllabusAnalysis> {
        self.post_file("/analyze-syllabus", pdf, Vec::new()).await
    }

    pub async fn generate_assessment(&self, req: &AssessmentRequest) -> ApiResult<Assessment> {
        self.post_json("/generate-assessment", req).await
    }

    pub async fn generate_assessment_from_pdf(
        &self,
        pdf: &StagedFile,
        difficulty: Difficulty,
        num_questions: u32,
    ) -> ApiResult<Assessment> {
        self.post_file(
            "/academic/generate-assessment-from-pdf",
            pdf,
            vec![
                ("difficulty", difficulty.as_str().to_string()),
                ("num_questions", num_questions.to_string()),
            ],
        )
        .await
    }

    pub async fn generate_feedback(&self, req: &FeedbackRequest) -> ApiResult<FeedbackReport> {
        self.post_json("/generate-feedback", req).await
    }

    pub async fn upload_text_material(&self, file: &StagedFile) -> ApiResult<Value> {
        self.post_file("/analytics/upload-text-material", file, Vec::new())
            .await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> ApiResult<T> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        let detail = detail_from_body(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
        });
        log::warn!(target: "api", "request failed with {status}: {detail}");
        return Err(ApiError::Status { status, detail });
    }
    Ok(serde_json::from_str(&body)?)
}

/// Pulls a readable message out of an error body. FastAPI-style bodies carry
/// it under `detail`, either as a string or as a list of validation errors.
pub fn detail_from_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let msgs: Vec<String> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .map(str::to_string)
                .collect();
            if msgs.is_empty() {
                Some(Value::Array(items.clone()).to_string())
            } else {
                Some(msgs.join("; "))
            }
        }
        other => Some(other.to_string()),
    }
}
