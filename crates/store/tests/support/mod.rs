//! Scripted gateway for store tests: every endpoint pops its next scripted
//! response, optionally waiting on a gate so tests can interleave
//! completions deterministically.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use client::{
    AccountApi, AgendaApi, AgendaQuery, ApiError, AuthApi, DocumentsApi, RecordsApi,
};
use models::{
    Account, CreateDailyLog, CreateRecord, DailyLog, Document, LoginRequest, LoginResponse, Page,
    Record, Sex, UpdateAccount, UpdateRecord,
};
use tokio::sync::Notify;

pub struct Scripted<T> {
    gate: Option<Arc<Notify>>,
    result: Result<T, ApiError>,
}

pub struct Endpoint<T> {
    queue: Mutex<VecDeque<Scripted<T>>>,
}

impl<T> Default for Endpoint<T> {
    fn default() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
        }
    }
}

impl<T> Endpoint<T> {
    pub fn push_ok(&self, value: T) {
        self.queue.lock().unwrap().push_back(Scripted {
            gate: None,
            result: Ok(value),
        });
    }

    pub fn push_err(&self, status: u16, message: &str) {
        self.queue.lock().unwrap().push_back(Scripted {
            gate: None,
            result: Err(ApiError::Remote {
                status,
                message: message.to_string(),
            }),
        });
    }

    /// Scripts a success that is only delivered once `gate` is notified.
    pub fn push_gated(&self, value: T, gate: Arc<Notify>) {
        self.queue.lock().unwrap().push_back(Scripted {
            gate: Some(gate),
            result: Ok(value),
        });
    }

    pub fn remaining(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    async fn take(&self) -> Result<T, ApiError> {
        let scripted = self.queue.lock().unwrap().pop_front();
        let Some(scripted) = scripted else {
            return Err(unscripted());
        };
        if let Some(gate) = scripted.gate {
            gate.notified().await;
        }
        scripted.result
    }
}

fn unscripted() -> ApiError {
    ApiError::Remote {
        status: 599,
        message: "no scripted response".to_string(),
    }
}

#[derive(Default)]
pub struct MockApi {
    pub list_records: Endpoint<Vec<Record>>,
    pub get_record: Endpoint<Record>,
    pub create_record: Endpoint<Record>,
    pub update_record: Endpoint<Record>,
    pub delete_record: Endpoint<()>,
    pub archive_record: Endpoint<()>,
    pub unarchive_record: Endpoint<()>,

    pub list_daily_logs: Endpoint<Page<DailyLog>>,
    pub get_daily_log: Endpoint<DailyLog>,
    pub create_daily_log: Endpoint<DailyLog>,
    pub delete_daily_log: Endpoint<()>,
    pub daily_log_pdf: Endpoint<Vec<u8>>,
    pub history_zip: Endpoint<Vec<u8>>,

    pub upload_document: Endpoint<Document>,
    pub delete_document: Endpoint<()>,
    pub download_document: Endpoint<Vec<u8>>,

    pub get_account: Endpoint<Account>,
    pub update_account: Endpoint<Account>,

    pub login: Endpoint<LoginResponse>,
    pub logout: Endpoint<()>,
    pub forgot_password: Endpoint<()>,
    pub reset_password: Endpoint<()>,
}

#[async_trait]
impl RecordsApi for MockApi {
    async fn list_records(&self, _search: Option<&str>) -> Result<Vec<Record>, ApiError> {
        self.list_records.take().await
    }
    async fn get_record(&self, _id: i64) -> Result<Record, ApiError> {
        self.get_record.take().await
    }
    async fn create_record(&self, _data: &CreateRecord) -> Result<Record, ApiError> {
        self.create_record.take().await
    }
    async fn update_record(&self, _id: i64, _data: &UpdateRecord) -> Result<Record, ApiError> {
        self.update_record.take().await
    }
    async fn delete_record(&self, _id: i64) -> Result<(), ApiError> {
        self.delete_record.take().await
    }
    async fn archive_record(&self, _id: i64) -> Result<(), ApiError> {
        self.archive_record.take().await
    }
    async fn unarchive_record(&self, _id: i64) -> Result<(), ApiError> {
        self.unarchive_record.take().await
    }
}

#[async_trait]
impl AgendaApi for MockApi {
    async fn list_daily_logs(
        &self,
        _record_id: i64,
        _query: &AgendaQuery,
    ) -> Result<Page<DailyLog>, ApiError> {
        self.list_daily_logs.take().await
    }
    async fn get_daily_log(&self, _record_id: i64, _date: NaiveDate) -> Result<DailyLog, ApiError> {
        self.get_daily_log.take().await
    }
    async fn create_daily_log(&self, _data: &CreateDailyLog) -> Result<DailyLog, ApiError> {
        self.create_daily_log.take().await
    }
    async fn delete_daily_log(&self, _record_id: i64, _date: NaiveDate) -> Result<(), ApiError> {
        self.delete_daily_log.take().await
    }
    async fn download_daily_log_pdf(
        &self,
        _record_id: i64,
        _date: NaiveDate,
    ) -> Result<Vec<u8>, ApiError> {
        self.daily_log_pdf.take().await
    }
    async fn download_history_zip(
        &self,
        _record_id: i64,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<Vec<u8>, ApiError> {
        self.history_zip.take().await
    }
}

#[async_trait]
impl DocumentsApi for MockApi {
    async fn upload_document(
        &self,
        _record_id: i64,
        _name: &str,
        _file_name: &str,
        _content: Vec<u8>,
    ) -> Result<Document, ApiError> {
        self.upload_document.take().await
    }
    async fn delete_document(&self, _record_id: i64, _document_id: i64) -> Result<(), ApiError> {
        self.delete_document.take().await
    }
    async fn download_document(
        &self,
        _record_id: i64,
        _document_id: i64,
    ) -> Result<Vec<u8>, ApiError> {
        self.download_document.take().await
    }
}

#[async_trait]
impl AccountApi for MockApi {
    async fn get_account(&self) -> Result<Account, ApiError> {
        self.get_account.take().await
    }
    async fn update_account(&self, _data: &UpdateAccount) -> Result<Account, ApiError> {
        self.update_account.take().await
    }
}

#[async_trait]
impl AuthApi for MockApi {
    async fn login(&self, _credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.login.take().await
    }
    async fn logout(&self) -> Result<(), ApiError> {
        self.logout.take().await
    }
    async fn forgot_password(&self, _email: &str) -> Result<(), ApiError> {
        self.forgot_password.take().await
    }
    async fn reset_password(&self, _token: &str, _new_password: &str) -> Result<(), ApiError> {
        self.reset_password.take().await
    }
}

pub fn record(id: i64, first_name: &str, last_name: &str, archived: bool) -> Record {
    Record {
        id,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        birth_date: NaiveDate::from_ymd_opt(2019, 6, 30).unwrap(),
        fiscal_code: "CFCFCF00C00F000C".to_string(),
        sex: Sex::None,
        residence: "Busto Arsizio".to_string(),
        admission_date: None,
        is_archived: archived,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
        is_staff: false,
        documents: Vec::new(),
    }
}

pub fn daily_log(id: i64, record_id: i64, date: &str) -> DailyLog {
    DailyLog {
        id,
        record_id,
        date: date.parse().unwrap(),
        sleep: None,
        outings: Vec::new(),
        notable_events: None,
    }
}

pub fn document(id: i64, record_id: i64, name: &str) -> Document {
    Document {
        id,
        record_id,
        name: name.to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
    }
}
