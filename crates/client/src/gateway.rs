use async_trait::async_trait;
use chrono::NaiveDate;
use models::{
    Account, CreateDailyLog, CreateRecord, DailyLog, Document, LoginRequest, LoginResponse, Page,
    Record, UpdateAccount, UpdateRecord,
};

use crate::error::ApiError;

/// Query for the paginated agenda list.
#[derive(Debug, Clone)]
pub struct AgendaQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
}

impl Default for AgendaQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 15,
            search: None,
        }
    }
}

#[async_trait]
pub trait RecordsApi: Send + Sync {
    async fn list_records(&self, search: Option<&str>) -> Result<Vec<Record>, ApiError>;
    async fn get_record(&self, id: i64) -> Result<Record, ApiError>;
    async fn create_record(&self, data: &CreateRecord) -> Result<Record, ApiError>;
    async fn update_record(&self, id: i64, data: &UpdateRecord) -> Result<Record, ApiError>;
    async fn delete_record(&self, id: i64) -> Result<(), ApiError>;
    async fn archive_record(&self, id: i64) -> Result<(), ApiError>;
    async fn unarchive_record(&self, id: i64) -> Result<(), ApiError>;
}

#[async_trait]
pub trait AgendaApi: Send + Sync {
    async fn list_daily_logs(
        &self,
        record_id: i64,
        query: &AgendaQuery,
    ) -> Result<Page<DailyLog>, ApiError>;
    async fn get_daily_log(&self, record_id: i64, date: NaiveDate) -> Result<DailyLog, ApiError>;
    async fn create_daily_log(&self, data: &CreateDailyLog) -> Result<DailyLog, ApiError>;
    async fn delete_daily_log(&self, record_id: i64, date: NaiveDate) -> Result<(), ApiError>;
    /// Server-rendered PDF of one log; opaque bytes, never parsed.
    async fn download_daily_log_pdf(
        &self,
        record_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<u8>, ApiError>;
    /// ZIP of all logs in a date range; opaque bytes, never parsed.
    async fn download_history_zip(
        &self,
        record_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<u8>, ApiError>;
}

#[async_trait]
pub trait DocumentsApi: Send + Sync {
    async fn upload_document(
        &self,
        record_id: i64,
        name: &str,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<Document, ApiError>;
    async fn delete_document(&self, record_id: i64, document_id: i64) -> Result<(), ApiError>;
    async fn download_document(
        &self,
        record_id: i64,
        document_id: i64,
    ) -> Result<Vec<u8>, ApiError>;
}

#[async_trait]
pub trait AccountApi: Send + Sync {
    /// The account is resolved from the bearer token; no id in the path.
    async fn get_account(&self) -> Result<Account, ApiError>;
    async fn update_account(&self, data: &UpdateAccount) -> Result<Account, ApiError>;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;
    async fn forgot_password(&self, email: &str) -> Result<(), ApiError>;
    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), ApiError>;
}
