use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Method, RequestBuilder, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use shared::{
    domain::{Proceeding, Writ, WritId},
    protocol::{
        AttachmentUpload, AuthResponse, DashboardMetrics, Envelope, GraphPoint, LoginRequest,
        NewProceeding, NewWrit, SignupRequest,
    },
};
use tracing::{debug, info, warn};

use crate::{attachment::validate_upload, error::ClientError, session::Session};

pub const DEFAULT_TOKEN_HEADER: &str = "x-access-token";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const AUTH_PATH_PREFIX: &str = "/auth/";

#[async_trait]
pub trait CaseApi: Send + Sync {
    async fn list_writs(&self) -> Result<Vec<Writ>, ClientError>;
    async fn search_writs(&self, query: &str) -> Result<Vec<Writ>, ClientError>;
    async fn get_writ(&self, writ_id: &WritId) -> Result<Writ, ClientError>;
    async fn dashboard_metrics(&self) -> Result<DashboardMetrics, ClientError>;
    async fn graph(&self) -> Result<Vec<GraphPoint>, ClientError>;
    async fn create_writ(
        &self,
        payload: &NewWrit,
        attachment: Option<&AttachmentUpload>,
    ) -> Result<Writ, ClientError>;
    async fn list_proceedings(&self) -> Result<Vec<Proceeding>, ClientError>;
    async fn list_proceedings_for_writ(
        &self,
        writ_id: &WritId,
    ) -> Result<Vec<Proceeding>, ClientError>;
    async fn draft_for_writ(&self, writ_id: &WritId) -> Result<Option<Proceeding>, ClientError>;
    async fn create_proceeding(
        &self,
        payload: &NewProceeding,
        attachment: Option<&AttachmentUpload>,
    ) -> Result<Proceeding, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub token_header: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token_header: DEFAULT_TOKEN_HEADER.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

pub struct CaseClient {
    http: Client,
    base_url: String,
    token_header: String,
    session: Arc<Session>,
}

impl CaseClient {
    pub fn new(config: ClientConfig, session: Arc<Session>) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token_header: config.token_header,
            session,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self
            .execute(Method::POST, "/auth/login", |req| req.json(&request))
            .await?;
        self.session
            .sign_in(response.token.clone(), response.user.clone());
        info!(email, "signed in");
        Ok(response)
    }

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let request = SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self
            .execute(Method::POST, "/auth/signup", |req| req.json(&request))
            .await?;
        self.session
            .sign_in(response.token.clone(), response.user.clone());
        info!(email, "signed up");
        Ok(response)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(Method::GET, path, |req| req).await
    }

    async fn create<T, P>(
        &self,
        path: &str,
        payload: &P,
        attachment: Option<&AttachmentUpload>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        P: Serialize + Sync,
    {
        match attachment {
            None => self.execute(Method::POST, path, |req| req.json(payload)).await,
            Some(upload) => {
                validate_upload(upload)?;
                let form = multipart_form(payload, upload)?;
                debug!(path, filename = %upload.filename, "uploading with attachment");
                self.execute(Method::POST, path, |req| req.multipart(form))
                    .await
            }
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<T, ClientError> {
        let body = self.execute_raw(method, path, build).await?;
        let envelope: Envelope<T> = serde_json::from_value(body)?;
        Ok(envelope.into_inner())
    }

    async fn execute_raw(
        &self,
        method: Method,
        path: &str,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Value, ClientError> {
        let protected = !path.starts_with(AUTH_PATH_PREFIX);
        let mut request = self.http.request(method, format!("{}{path}", self.base_url));
        if protected {
            let token = self
                .session
                .token()
                .ok_or_else(|| ClientError::Unauthenticated {
                    path: path.to_string(),
                })?;
            request = request.header(self.token_header.as_str(), token);
        }

        let response = build(request).send().await?;
        let status = response.status();
        let text = response.text().await?;
        let parsed = if text.trim().is_empty() {
            Ok(Value::Null)
        } else {
            serde_json::from_str::<Value>(&text)
        };

        let embedded = parsed.as_ref().ok().and_then(embedded_status);
        let auth_failure = is_auth_status(status.as_u16()) || embedded.is_some_and(is_auth_status);
        if auth_failure {
            let status = embedded
                .filter(|s| is_auth_status(*s))
                .unwrap_or(status.as_u16());
            let message = parsed
                .as_ref()
                .ok()
                .and_then(body_message)
                .unwrap_or_else(|| "Session expired. Please sign in again.".to_string());
            if protected {
                warn!(path, status, "access token rejected; clearing session");
                self.session.invalidate();
            }
            return Err(ClientError::Auth { status, message });
        }

        let failed_status = if !status.is_success() {
            Some(status.as_u16())
        } else {
            embedded.filter(|s| *s >= 400)
        };
        if let Some(failed_status) = failed_status {
            let message = parsed
                .as_ref()
                .ok()
                .and_then(body_message)
                .unwrap_or_else(|| fallback_message(failed_status));
            debug!(path, status = failed_status, %message, "request rejected");
            return Err(ClientError::rejected(failed_status, message));
        }

        Ok(parsed?)
    }
}

#[async_trait]
impl CaseApi for CaseClient {
    async fn list_writs(&self) -> Result<Vec<Writ>, ClientError> {
        self.get("/v1/firs").await
    }

    async fn search_writs(&self, query: &str) -> Result<Vec<Writ>, ClientError> {
        self.execute(Method::GET, "/v1/firs/search", |req| {
            req.query(&[("q", query)])
        })
        .await
    }

    async fn get_writ(&self, writ_id: &WritId) -> Result<Writ, ClientError> {
        self.get(&format!("/v1/firs/{writ_id}")).await
    }

    async fn dashboard_metrics(&self) -> Result<DashboardMetrics, ClientError> {
        self.get("/v1/firs/dash").await
    }

    async fn graph(&self) -> Result<Vec<GraphPoint>, ClientError> {
        self.get("/v1/firs/graph").await
    }

    async fn create_writ(
        &self,
        payload: &NewWrit,
        attachment: Option<&AttachmentUpload>,
    ) -> Result<Writ, ClientError> {
        let writ: Writ = self.create("/v1/firs", payload, attachment).await?;
        info!(writ_id = %writ.id, writ_number = %writ.writ_number, "writ created");
        Ok(writ)
    }

    async fn list_proceedings(&self) -> Result<Vec<Proceeding>, ClientError> {
        self.get("/v1/proceedings").await
    }

    async fn list_proceedings_for_writ(
        &self,
        writ_id: &WritId,
    ) -> Result<Vec<Proceeding>, ClientError> {
        self.get(&format!("/v1/proceedings/fir/{writ_id}")).await
    }

    async fn draft_for_writ(&self, writ_id: &WritId) -> Result<Option<Proceeding>, ClientError> {
        let path = format!("/v1/proceedings/fir/{writ_id}");
        let body = match self
            .execute_raw(Method::GET, &path, |req| req.query(&[("draft", "true")]))
            .await
        {
            Ok(body) => body,
            Err(ClientError::Rejected { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                return Ok(None)
            }
            Err(err) => return Err(err),
        };
        let data = serde_json::from_value::<Envelope<Value>>(body)?.into_inner();
        draft_from_value(data)
    }

    async fn create_proceeding(
        &self,
        payload: &NewProceeding,
        attachment: Option<&AttachmentUpload>,
    ) -> Result<Proceeding, ClientError> {
        let proceeding: Proceeding = self
            .create("/v1/proceedings", payload, attachment)
            .await?;
        info!(
            proceeding_id = %proceeding.id,
            writ_id = %proceeding.writ_id(),
            kind = ?proceeding.kind(),
            draft = proceeding.draft,
            "proceeding created"
        );
        Ok(proceeding)
    }
}

fn multipart_form<P: Serialize>(
    payload: &P,
    upload: &AttachmentUpload,
) -> Result<Form, ClientError> {
    let part = Part::bytes(upload.bytes.clone())
        .file_name(upload.filename.clone())
        .mime_str(&upload.mime_type)
        .map_err(|err| ClientError::Transport(format!("invalid attachment metadata: {err}")))?;
    Ok(Form::new()
        .text("data", serde_json::to_string(payload)?)
        .part("file", part))
}

/// The draft lookup answers with `null`, a single proceeding, or a list.
fn draft_from_value(data: Value) -> Result<Option<Proceeding>, ClientError> {
    match data {
        Value::Null => Ok(None),
        Value::Array(items) => {
            let proceedings: Vec<Proceeding> = serde_json::from_value(Value::Array(items))?;
            Ok(proceedings.into_iter().find(|p| p.draft))
        }
        other => {
            let proceeding: Proceeding = serde_json::from_value(other)?;
            Ok(proceeding.draft.then_some(proceeding))
        }
    }
}

fn is_auth_status(status: u16) -> bool {
    status == 401 || status == 403
}

fn embedded_status(body: &Value) -> Option<u16> {
    body.get("status")
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok())
}

fn body_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(str::to_string)
}

fn fallback_message(status: u16) -> String {
    format!("request failed with status {status}")
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
