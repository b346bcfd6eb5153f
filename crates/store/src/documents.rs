//! Documents store and dispatcher.
//!
//! Documents belong to a record; successful mutations are mirrored into the
//! records store so the owning record's list stays consistent.

use std::sync::Arc;

use client::{ApiError, DocumentsApi};
use models::Document;

use crate::notify::ErrorRelay;
use crate::records::RecordsState;
use crate::session::SessionGuard;
use crate::shared::Shared;
use crate::status::{OpState, Ticket};

const SOURCE: &str = "documents";

#[derive(Debug, Default)]
pub struct DocumentsState {
    pub documents: Vec<Document>,
    pub op: OpState,
}

impl DocumentsState {
    fn apply_uploaded(&mut self, ticket: Ticket, document: Document) {
        if self.op.settle(ticket) {
            self.documents.push(document);
        }
    }

    fn apply_removed(&mut self, ticket: Ticket, document_id: i64) {
        if self.op.settle(ticket) {
            self.documents.retain(|doc| doc.id != document_id);
        }
    }
}

/// Dispatcher for document operations.
pub struct DocumentService<G> {
    api: Arc<G>,
    pub store: Shared<DocumentsState>,
    records: Shared<RecordsState>,
    relay: ErrorRelay,
    guard: SessionGuard,
}

impl<G> Clone for DocumentService<G> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            store: self.store.clone(),
            records: self.records.clone(),
            relay: self.relay.clone(),
            guard: self.guard.clone(),
        }
    }
}

impl<G: DocumentsApi> DocumentService<G> {
    pub fn new(
        api: Arc<G>,
        records: Shared<RecordsState>,
        relay: ErrorRelay,
        guard: SessionGuard,
    ) -> Self {
        Self {
            api,
            store: Shared::default(),
            records,
            relay,
            guard,
        }
    }

    pub async fn upload(
        &self,
        record_id: i64,
        name: &str,
        file_name: &str,
        content: Vec<u8>,
    ) -> Option<Document> {
        let ticket = self.store.write(|state| state.op.begin());
        match self
            .api
            .upload_document(record_id, name, file_name, content)
            .await
        {
            Ok(document) => {
                self.store
                    .write(|state| state.apply_uploaded(ticket, document.clone()));
                self.records
                    .write(|state| state.attach_document(document.clone()));
                Some(document)
            }
            Err(error) => self.fail(ticket, &error),
        }
    }

    pub async fn delete(&self, record_id: i64, document_id: i64) -> Option<()> {
        let ticket = self.store.write(|state| state.op.begin());
        match self.api.delete_document(record_id, document_id).await {
            Ok(()) => {
                self.store
                    .write(|state| state.apply_removed(ticket, document_id));
                self.records
                    .write(|state| state.detach_document(record_id, document_id));
                Some(())
            }
            Err(error) => self.fail(ticket, &error),
        }
    }

    /// Opaque pass-through; the caller owns the bytes and the failure.
    pub async fn download(&self, record_id: i64, document_id: i64) -> Result<Vec<u8>, ApiError> {
        self.api.download_document(record_id, document_id).await
    }

    fn fail<T>(&self, ticket: Ticket, error: &ApiError) -> Option<T> {
        self.guard.check(error);
        let entry = self.store.write(|state| {
            state
                .op
                .fail(ticket, error.to_string(), error.is_not_found())
        });
        self.relay.observe(SOURCE, entry.as_ref());
        None
    }
}
