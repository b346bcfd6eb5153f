//! Headless list/detail behaviors: what the views dispatch and when.
//!
//! Rendering lives elsewhere; these controllers own the fetch-on-mount,
//! search, pagination, and submit-validation conventions.

use chrono::NaiveDate;
use client::{AccountApi, AgendaApi, AgendaQuery, AuthApi, RecordsApi};
use models::{CreateRecord, LoginRequest, Record, UpdateAccount, validate};

use crate::account::AccountService;
use crate::agenda::AgendaService;
use crate::auth::AuthService;
use crate::notify::Notifier;
use crate::records::RecordService;
use crate::session::Session;

/// Records table: active or archived projection, live search.
pub struct RecordListController<G> {
    service: RecordService<G>,
    pub archived: bool,
    search: String,
}

impl<G: RecordsApi> RecordListController<G> {
    pub fn new(service: RecordService<G>, archived: bool) -> Self {
        Self {
            service,
            archived,
            search: String::new(),
        }
    }

    pub async fn mount(&self) {
        self.service.fetch_records(None).await;
    }

    pub async fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        let term = (!self.search.trim().is_empty()).then_some(self.search.as_str());
        self.service.fetch_records(term).await;
    }

    /// Current projection of the authoritative collection.
    pub fn rows(&self) -> Vec<Record> {
        self.service.store.read(|state| {
            if self.archived {
                state.archived(&self.search)
            } else {
                state.active(&self.search)
            }
        })
    }

    pub fn loading(&self) -> bool {
        self.service.store.read(|state| state.op.loading)
    }
}

/// Record detail form: load by id, validate locally, then create or update.
pub struct RecordDetailController<G> {
    service: RecordService<G>,
    notifier: Notifier,
}

impl<G: RecordsApi> RecordDetailController<G> {
    pub fn new(service: RecordService<G>, notifier: Notifier) -> Self {
        Self { service, notifier }
    }

    pub async fn load(&self, id: i64) -> Option<Record> {
        self.service.fetch_record(id).await
    }

    /// Rejects locally on a validation failure; nothing reaches the
    /// network and the store is untouched.
    pub async fn save(&self, id: Option<i64>, draft: CreateRecord) -> bool {
        if let Err(error) = draft.validate() {
            self.notifier.error(error.to_string());
            return false;
        }
        match id {
            Some(id) => self.service.update(id, &draft).await.is_some(),
            None => self.service.create(&draft).await.is_some(),
        }
    }
}

/// Paginated agenda table for one record.
pub struct AgendaController<G> {
    service: AgendaService<G>,
    notifier: Notifier,
    record_id: i64,
    pub page: u32,
    pub limit: u32,
    search: String,
}

impl<G: AgendaApi> AgendaController<G> {
    pub fn new(service: AgendaService<G>, notifier: Notifier, record_id: i64) -> Self {
        Self {
            service,
            notifier,
            record_id,
            page: 1,
            limit: 15,
            search: String::new(),
        }
    }

    fn query(&self) -> AgendaQuery {
        AgendaQuery {
            page: self.page,
            limit: self.limit,
            search: (!self.search.trim().is_empty()).then(|| self.search.clone()),
        }
    }

    pub async fn mount(&self) {
        self.service.fetch_agenda(self.record_id, &self.query()).await;
    }

    pub async fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
        self.service.fetch_agenda(self.record_id, &self.query()).await;
    }

    pub async fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.service.fetch_agenda(self.record_id, &self.query()).await;
    }

    pub async fn delete(&self, date: NaiveDate) -> bool {
        let deleted = self.service.delete(self.record_id, date).await.is_some();
        if deleted {
            self.notifier.success("daily log deleted");
        }
        deleted
    }

    /// Returns the export bytes; a failure becomes a toast and `None`.
    pub async fn download_history(&self, from: NaiveDate, to: NaiveDate) -> Option<Vec<u8>> {
        match self.service.download_history_zip(self.record_id, from, to).await {
            Ok(bytes) => Some(bytes),
            Err(error) => {
                self.notifier.error(error.to_string());
                None
            }
        }
    }

    pub async fn download_pdf(&self, date: NaiveDate) -> Option<Vec<u8>> {
        match self.service.download_pdf(self.record_id, date).await {
            Ok(bytes) => Some(bytes),
            Err(error) => {
                self.notifier.error(error.to_string());
                None
            }
        }
    }
}

/// Account settings form.
pub struct AccountController<G> {
    service: AccountService<G>,
    notifier: Notifier,
}

impl<G: AccountApi> AccountController<G> {
    pub fn new(service: AccountService<G>, notifier: Notifier) -> Self {
        Self { service, notifier }
    }

    pub async fn mount(&self) {
        self.service.fetch().await;
    }

    pub async fn save(&self, update: UpdateAccount) -> bool {
        if let Err(error) = update.validate() {
            self.notifier.error(error.to_string());
            return false;
        }
        self.service.update(&update).await.is_some()
    }
}

/// Login form: both fields required and the email well-formed before the
/// credentials leave the client.
pub struct LoginController<G> {
    service: AuthService<G>,
    notifier: Notifier,
}

impl<G: AuthApi> LoginController<G> {
    pub fn new(service: AuthService<G>, notifier: Notifier) -> Self {
        Self { service, notifier }
    }

    pub async fn login(&self, email: &str, password: &str) -> Option<Session> {
        let credentials = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        if let Err(error) = credentials.validate() {
            self.notifier.error(error.to_string());
            return None;
        }
        self.service.login(credentials).await
    }

    pub async fn forgot_password(&self, email: &str) -> bool {
        if let Err(error) = validate::validate_email(email) {
            self.notifier.error(error.to_string());
            return false;
        }
        self.service.forgot_password(email).await.is_some()
    }
}
