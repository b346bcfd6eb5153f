//! Records store and dispatcher (anagrafiche).
//!
//! One authoritative collection keyed by id; the active and archived list
//! views are projections over it rather than separate copies.

use std::sync::Arc;

use client::{ApiError, RecordsApi};
use models::{CreateRecord, Document, Record, Searchable, UpdateRecord};

use crate::notify::ErrorRelay;
use crate::session::SessionGuard;
use crate::shared::Shared;
use crate::status::{OpState, Ticket};

const SOURCE: &str = "records";

#[derive(Debug, Default)]
pub struct RecordsState {
    /// Last fetched list result; replaced whole on every list fetch.
    pub records: Vec<Record>,
    pub selected: Option<Record>,
    pub op: OpState,
}

impl RecordsState {
    /// Non-archived projection, filtered by the search term.
    pub fn active(&self, term: &str) -> Vec<Record> {
        self.project(term, false)
    }

    /// Archived projection, filtered by the search term.
    pub fn archived(&self, term: &str) -> Vec<Record> {
        self.project(term, true)
    }

    fn project(&self, term: &str, archived: bool) -> Vec<Record> {
        self.records
            .iter()
            .filter(|record| record.is_archived == archived && record.matches(term))
            .cloned()
            .collect()
    }

    fn apply_list(&mut self, ticket: Ticket, items: Vec<Record>) {
        if self.op.settle(ticket) {
            self.records = items;
        }
    }

    fn apply_selected(&mut self, ticket: Ticket, record: Record) {
        if self.op.settle(ticket) {
            self.selected = Some(record);
        }
    }

    fn apply_updated(&mut self, ticket: Ticket, record: Record) {
        if self.op.settle(ticket) {
            if let Some(slot) = self.records.iter_mut().find(|r| r.id == record.id) {
                *slot = record;
            }
        }
    }

    fn apply_removed(&mut self, ticket: Ticket, id: i64) {
        if self.op.settle(ticket) {
            self.records.retain(|record| record.id != id);
            self.selected = None;
        }
    }

    fn apply_archived(&mut self, ticket: Ticket, id: i64, archived: bool) {
        if self.op.settle(ticket) {
            if let Some(record) = self.records.iter_mut().find(|record| record.id == id) {
                record.is_archived = archived;
            }
            if let Some(selected) = self.selected.as_mut().filter(|s| s.id == id) {
                selected.is_archived = archived;
            }
        }
    }

    /// Cross-store mutation from a successful document upload.
    pub(crate) fn attach_document(&mut self, document: Document) {
        if let Some(record) = self
            .records
            .iter_mut()
            .find(|record| record.id == document.record_id)
        {
            record.documents.push(document.clone());
        }
        if let Some(selected) = self
            .selected
            .as_mut()
            .filter(|s| s.id == document.record_id)
        {
            selected.documents.push(document);
        }
    }

    /// Cross-store mutation from a successful document delete.
    pub(crate) fn detach_document(&mut self, record_id: i64, document_id: i64) {
        if let Some(record) = self.records.iter_mut().find(|record| record.id == record_id) {
            record.documents.retain(|doc| doc.id != document_id);
        }
        if let Some(selected) = self.selected.as_mut().filter(|s| s.id == record_id) {
            selected.documents.retain(|doc| doc.id != document_id);
        }
    }
}

/// Dispatcher for record operations. Failures land in the store's error
/// field and are relayed once; callers get `None` back.
pub struct RecordService<G> {
    api: Arc<G>,
    pub store: Shared<RecordsState>,
    relay: ErrorRelay,
    guard: SessionGuard,
}

impl<G> Clone for RecordService<G> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            store: self.store.clone(),
            relay: self.relay.clone(),
            guard: self.guard.clone(),
        }
    }
}

impl<G: RecordsApi> RecordService<G> {
    pub fn new(api: Arc<G>, relay: ErrorRelay, guard: SessionGuard) -> Self {
        Self {
            api,
            store: Shared::default(),
            relay,
            guard,
        }
    }

    pub async fn fetch_records(&self, term: Option<&str>) -> Option<()> {
        let ticket = self.store.write(|state| state.op.begin());
        match self.api.list_records(term).await {
            Ok(items) => {
                self.store.write(|state| state.apply_list(ticket, items));
                Some(())
            }
            Err(error) => self.fail(ticket, &error, false),
        }
    }

    pub async fn fetch_record(&self, id: i64) -> Option<Record> {
        let ticket = self.store.write(|state| state.op.begin());
        match self.api.get_record(id).await {
            Ok(record) => {
                self.store
                    .write(|state| state.apply_selected(ticket, record.clone()));
                Some(record)
            }
            // A failed refetch must never leave a stale detail visible.
            Err(error) => self.fail(ticket, &error, true),
        }
    }

    pub async fn create(&self, data: &CreateRecord) -> Option<Record> {
        let ticket = self.store.write(|state| state.op.begin());
        match self.api.create_record(data).await {
            Ok(record) => {
                self.store
                    .write(|state| state.apply_selected(ticket, record.clone()));
                Some(record)
            }
            Err(error) => self.fail(ticket, &error, false),
        }
    }

    pub async fn update(&self, id: i64, data: &UpdateRecord) -> Option<Record> {
        let ticket = self.store.write(|state| state.op.begin());
        match self.api.update_record(id, data).await {
            Ok(record) => {
                self.store
                    .write(|state| state.apply_updated(ticket, record.clone()));
                Some(record)
            }
            Err(error) => self.fail(ticket, &error, false),
        }
    }

    pub async fn delete(&self, id: i64) -> Option<()> {
        let ticket = self.store.write(|state| state.op.begin());
        match self.api.delete_record(id).await {
            Ok(()) => {
                self.store.write(|state| state.apply_removed(ticket, id));
                Some(())
            }
            Err(error) => self.fail(ticket, &error, false),
        }
    }

    pub async fn archive(&self, id: i64) -> Option<()> {
        let ticket = self.store.write(|state| state.op.begin());
        match self.api.archive_record(id).await {
            Ok(()) => {
                self.store
                    .write(|state| state.apply_archived(ticket, id, true));
                Some(())
            }
            Err(error) => self.fail(ticket, &error, false),
        }
    }

    pub async fn unarchive(&self, id: i64) -> Option<()> {
        let ticket = self.store.write(|state| state.op.begin());
        match self.api.unarchive_record(id).await {
            Ok(()) => {
                self.store
                    .write(|state| state.apply_archived(ticket, id, false));
                Some(())
            }
            Err(error) => self.fail(ticket, &error, false),
        }
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
        self.relay.observe(SOURCE, entry.as_ref());
        None
    }
}
