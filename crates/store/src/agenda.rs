//! Agenda store and dispatcher (giornate).

use std::sync::Arc;

use chrono::NaiveDate;
use client::{AgendaApi, AgendaQuery, ApiError};
use models::{CreateDailyLog, DailyLog, Page};

use crate::notify::ErrorRelay;
use crate::session::SessionGuard;
use crate::shared::Shared;
use crate::status::{OpState, Ticket};

const SOURCE: &str = "agenda";

#[derive(Debug, Default)]
pub struct AgendaState {
    /// Last fetched page; replaced whole on every list fetch.
    pub logs: Vec<DailyLog>,
    pub selected: Option<DailyLog>,
    pub pages: i64,
    pub op: OpState,
}

impl AgendaState {
    fn apply_page(&mut self, ticket: Ticket, page: Page<DailyLog>) {
        if self.op.settle(ticket) {
            self.logs = page.items;
            self.pages = page.pages;
        }
    }

    fn apply_selected(&mut self, ticket: Ticket, log: DailyLog) {
        if self.op.settle(ticket) {
            self.selected = Some(log);
        }
    }

    fn apply_removed(&mut self, ticket: Ticket, date: NaiveDate) {
        if self.op.settle(ticket) {
            // Natural key: the page only ever holds one record's logs.
            self.logs.retain(|log| log.date != date);
            self.selected = None;
        }
    }
}

/// Dispatcher for daily-log operations.
pub struct AgendaService<G> {
    api: Arc<G>,
    pub store: Shared<AgendaState>,
    relay: ErrorRelay,
    guard: SessionGuard,
}

impl<G> Clone for AgendaService<G> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            store: self.store.clone(),
            relay: self.relay.clone(),
            guard: self.guard.clone(),
        }
    }
}

impl<G: AgendaApi> AgendaService<G> {
    pub fn new(api: Arc<G>, relay: ErrorRelay, guard: SessionGuard) -> Self {
        Self {
            api,
            store: Shared::default(),
            relay,
            guard,
        }
    }

    pub async fn fetch_agenda(&self, record_id: i64, query: &AgendaQuery) -> Option<()> {
        let ticket = self.store.write(|state| state.op.begin());
        match self.api.list_daily_logs(record_id, query).await {
            Ok(page) => {
                self.store.write(|state| state.apply_page(ticket, page));
                Some(())
            }
            Err(error) => self.fail(ticket, &error, false),
        }
    }

    pub async fn fetch_daily_log(&self, record_id: i64, date: NaiveDate) -> Option<DailyLog> {
        let ticket = self.store.write(|state| state.op.begin());
        match self.api.get_daily_log(record_id, date).await {
            Ok(log) => {
                self.store
                    .write(|state| state.apply_selected(ticket, log.clone()));
                Some(log)
            }
            Err(error) => self.fail(ticket, &error, true),
        }
    }

    pub async fn create(&self, data: &CreateDailyLog) -> Option<DailyLog> {
        let ticket = self.store.write(|state| state.op.begin());
        match self.api.create_daily_log(data).await {
            Ok(log) => {
                self.store
                    .write(|state| state.apply_selected(ticket, log.clone()));
                Some(log)
            }
            Err(error) => self.fail(ticket, &error, false),
        }
    }

    pub async fn delete(&self, record_id: i64, date: NaiveDate) -> Option<()> {
        let ticket = self.store.write(|state| state.op.begin());
        match self.api.delete_daily_log(record_id, date).await {
            Ok(()) => {
                self.store.write(|state| state.apply_removed(ticket, date));
                Some(())
            }
            Err(error) => self.fail(ticket, &error, false),
        }
    }

    /// Opaque pass-through; no store transitions, the caller owns the bytes
    /// and the failure.
    pub async fn download_pdf(&self, record_id: i64, date: NaiveDate) -> Result<Vec<u8>, ApiError> {
        self.api.download_daily_log_pdf(record_id, date).await
    }

    /// Opaque pass-through for the date-range ZIP export.
    pub async fn download_history_zip(
        &self,
        record_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<u8>, ApiError> {
        self.api.download_history_zip(record_id, from, to).await
    }

    fn fail<T>(&self, ticket: Ticket, error: &ApiError, clears_selected: bool) -> Option<T> {
        self.guard.check(error);
        let entry = self.store.write(|state| {
            let entry = state
                .op
                .fail(ticket, error.to_string(), error.is_not_found());
            if clears_selected && entry.is_some() {
                state.selected = None;
            }
            entry
        });
        // A day without a log is routine; keep it out of the toasts but
        // leave the error readable in the store.
        match entry.as_ref() {
            Some(entry) if entry.not_found => {
                tracing::debug!(occurrence = entry.occurrence, "daily log not found, toast suppressed");
            }
            _ => self.relay.observe(SOURCE, entry.as_ref()),
        }
        None
    }
}
