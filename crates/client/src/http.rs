use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use models::{
    Account, CreateDailyLog, CreateRecord, DailyLog, Document, LoginRequest, LoginResponse, Page,
    Record, UpdateAccount, UpdateRecord,
    auth::{ForgotPasswordRequest, ResetPasswordRequest},
};
use reqwest::{Method, RequestBuilder, Response, multipart};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{ApiError, map_transport, remote_message};
use crate::gateway::{AccountApi, AgendaApi, AgendaQuery, AuthApi, DocumentsApi, RecordsApi};

/// Source of the bearer token attached to every request. Implemented by the
/// session holder; returns `None` while anonymous.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Token provider for unauthenticated clients.
pub struct NoAuth;

impl TokenProvider for NoAuth {
    fn token(&self) -> Option<String> {
        None
    }
}

/// reqwest-backed gateway. No timeout and no retry at this layer: a failure
/// is terminal for its dispatch and the transport owns the rest.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenProvider>,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error("base url cannot hold path segments: {0}")]
    InvalidBaseUrl(Url),
    #[error("failed to initialize the http client: {0}")]
    Http(#[from] reqwest::Error),
}

impl ApiClient {
    pub fn new(base_url: Url, tokens: Arc<dyn TokenProvider>) -> Result<Self, ClientBuildError> {
        if base_url.cannot_be_a_base() {
            return Err(ClientBuildError::InvalidBaseUrl(base_url));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("dailycare-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url,
            tokens,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .expect("base checked at construction")
            .pop_if_empty()
            .extend(segments);
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let req = self.http.request(method, url);
        match self.tokens.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        op: &'static str,
    ) -> Result<T, ApiError> {
        let res = req.send().await.map_err(|e| map_transport(e, op))?;
        if !res.status().is_success() {
            return Err(remote_error(res, op).await);
        }
        let body = res.bytes().await.map_err(|e| map_transport(e, op))?;
        serde_json::from_slice(&body).map_err(|error| {
            tracing::warn!(%error, op, "response body did not match the expected shape");
            ApiError::Decode {
                message: op.to_string(),
            }
        })
    }

    async fn send_unit(&self, req: RequestBuilder, op: &'static str) -> Result<(), ApiError> {
        let res = req.send().await.map_err(|e| map_transport(e, op))?;
        if !res.status().is_success() {
            return Err(remote_error(res, op).await);
        }
        Ok(())
    }

    async fn send_bytes(&self, req: RequestBuilder, op: &'static str) -> Result<Vec<u8>, ApiError> {
        let res = req.send().await.map_err(|e| map_transport(e, op))?;
        if !res.status().is_success() {
            return Err(remote_error(res, op).await);
        }
        let bytes = res.bytes().await.map_err(|e| map_transport(e, op))?;
        Ok(bytes.to_vec())
    }
}

/// Appends `?s=term` for non-blank search terms; blank input sends nothing.
fn append_search(url: &mut Url, term: Option<&str>) {
    if let Some(term) = term.filter(|term| !term.trim().is_empty()) {
        url.query_pairs_mut().append_pair("s", term);
    }
}

async fn remote_error(res: Response, op: &'static str) -> ApiError {
    let status = res.status().as_u16();
    let body = res.text().await.unwrap_or_default();
    ApiError::Remote {
        status,
        message: remote_message(&body, op),
    }
}

#[async_trait]
impl RecordsApi for ApiClient {
    async fn list_records(&self, search: Option<&str>) -> Result<Vec<Record>, ApiError> {
        let mut url = self.endpoint(&["anagrafica"]);
        append_search(&mut url, search);
        self.send_json(self.request(Method::GET, url), "failed to fetch records")
            .await
    }

    async fn get_record(&self, id: i64) -> Result<Record, ApiError> {
        let url = self.endpoint(&["anagrafica", &id.to_string()]);
        self.send_json(self.request(Method::GET, url), "failed to fetch the record")
            .await
    }

    async fn create_record(&self, data: &CreateRecord) -> Result<Record, ApiError> {
        let url = self.endpoint(&["anagrafica"]);
        self.send_json(
            self.request(Method::POST, url).json(data),
            "failed to create the record",
        )
        .await
    }

    async fn update_record(&self, id: i64, data: &UpdateRecord) -> Result<Record, ApiError> {
        let url = self.endpoint(&["anagrafica", &id.to_string()]);
        self.send_json(
            self.request(Method::PUT, url).json(data),
            "failed to update the record",
        )
        .await
    }

    async fn delete_record(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&["anagrafica", &id.to_string()]);
        self.send_unit(self.request(Method::DELETE, url), "failed to delete the record")
            .await
    }

    async fn archive_record(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&["anagrafica", &id.to_string(), "archive"]);
        self.send_unit(self.request(Method::POST, url), "failed to archive the record")
            .await
    }

    async fn unarchive_record(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&["anagrafica", &id.to_string(), "unarchive"]);
        self.send_unit(
            self.request(Method::POST, url),
            "failed to unarchive the record",
        )
        .await
    }
}

#[async_trait]
impl AgendaApi for ApiClient {
    async fn list_daily_logs(
        &self,
        record_id: i64,
        query: &AgendaQuery,
    ) -> Result<Page<DailyLog>, ApiError> {
        let mut url = self.endpoint(&["giornata", &record_id.to_string()]);
        url.query_pairs_mut()
            .append_pair("page", &query.page.to_string())
            .append_pair("limit", &query.limit.to_string());
        append_search(&mut url, query.search.as_deref());
        self.send_json(self.request(Method::GET, url), "failed to fetch the agenda")
            .await
    }

    async fn get_daily_log(&self, record_id: i64, date: NaiveDate) -> Result<DailyLog, ApiError> {
        let url = self.endpoint(&["giornata", &record_id.to_string(), &date.to_string()]);
        self.send_json(
            self.request(Method::GET, url),
            "failed to fetch the daily log",
        )
        .await
    }

    async fn create_daily_log(&self, data: &CreateDailyLog) -> Result<DailyLog, ApiError> {
        let url = self.endpoint(&["giornata"]);
        self.send_json(
            self.request(Method::POST, url).json(data),
            "failed to create the daily log",
        )
        .await
    }

    async fn delete_daily_log(&self, record_id: i64, date: NaiveDate) -> Result<(), ApiError> {
        let url = self.endpoint(&["giornata", &record_id.to_string(), &date.to_string()]);
        self.send_unit(
            self.request(Method::DELETE, url),
            "failed to delete the daily log",
        )
        .await
    }

    async fn download_daily_log_pdf(
        &self,
        record_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(&["giornata", &record_id.to_string(), &date.to_string(), "pdf"]);
        self.send_bytes(
            self.request(Method::GET, url),
            "failed to download the daily log PDF",
        )
        .await
    }

    async fn download_history_zip(
        &self,
        record_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<u8>, ApiError> {
        let mut url = self.endpoint(&["giornata", &record_id.to_string(), "zip"]);
        url.query_pairs_mut()
            .append_pair("from", &from.to_string())
            .append_pair("to", &to.to_string());
        self.send_bytes(
            self.request(Method::GET, url),
            "failed to download the history archive",
        )
        .await
    }
}

#[async_trait]
impl DocumentsApi for ApiClient {
    async fn upload_document(
        &self,
        record_id: i64,
        name: &str,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<Document, ApiError> {
        const OP: &str = "failed to upload the document";
        let url = self.endpoint(&["anagrafica", &record_id.to_string(), "documento"]);
        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        let part = multipart::Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str(mime.as_ref())
            .map_err(|e| map_transport(e, OP))?;
        let form = multipart::Form::new()
            .text("name", name.to_string())
            .part("file", part);
        self.send_json(self.request(Method::POST, url).multipart(form), OP)
            .await
    }

    async fn delete_document(&self, record_id: i64, document_id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&[
            "anagrafica",
            &record_id.to_string(),
            "documento",
            &document_id.to_string(),
        ]);
        self.send_unit(
            self.request(Method::DELETE, url),
            "failed to delete the document",
        )
        .await
    }

    async fn download_document(
        &self,
        record_id: i64,
        document_id: i64,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(&[
            "anagrafica",
            &record_id.to_string(),
            "documento",
            &document_id.to_string(),
            "download",
        ]);
        self.send_bytes(
            self.request(Method::GET, url),
            "failed to download the document",
        )
        .await
    }
}

#[async_trait]
impl AccountApi for ApiClient {
    async fn get_account(&self) -> Result<Account, ApiError> {
        let url = self.endpoint(&["account"]);
        self.send_json(self.request(Method::GET, url), "failed to fetch the account")
            .await
    }

    async fn update_account(&self, data: &UpdateAccount) -> Result<Account, ApiError> {
        let url = self.endpoint(&["account"]);
        self.send_json(
            self.request(Method::PUT, url).json(data),
            "failed to update the account",
        )
        .await
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let url = self.endpoint(&["auth", "login"]);
        self.send_json(
            self.request(Method::POST, url).json(credentials),
            "authentication failed",
        )
        .await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let url = self.endpoint(&["auth", "logout"]);
        self.send_unit(self.request(Method::POST, url), "logout failed")
            .await
    }

    async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["auth", "forgot-password"]);
        let body = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.send_unit(
            self.request(Method::POST, url).json(&body),
            "failed to request a password reset",
        )
        .await
    }

    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["auth", "reset-password"]);
        let body = ResetPasswordRequest {
            token: token.to_string(),
            new_password: new_password.to_string(),
        };
        self.send_unit(
            self.request(Method::POST, url).json(&body),
            "failed to reset the password",
        )
        .await
    }
}
