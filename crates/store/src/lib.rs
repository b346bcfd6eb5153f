//! In-memory state layer between the views and the backend gateway.
//!
//! Each resource gets one store (collection + selected item + status flags)
//! and one dispatcher service that sequences mark-pending → gateway call →
//! apply-success/apply-failure. Stores publish every transition through a
//! version channel; errors flow to the notification relay exactly once.

pub mod account;
pub mod agenda;
pub mod auth;
pub mod controllers;
pub mod documents;
pub mod notify;
pub mod records;
pub mod session;
pub mod shared;
pub mod status;

use std::sync::Arc;

use client::{
    AccountApi, AgendaApi, ApiClient, AuthApi, ClientBuildError, DocumentsApi, RecordsApi,
    TokenProvider, Url,
};
use thiserror::Error;

use crate::account::AccountService;
use crate::agenda::AgendaService;
use crate::auth::{AuthService, AuthState};
use crate::documents::DocumentService;
use crate::notify::{ErrorRelay, Notifier};
use crate::records::RecordService;
use crate::session::{SessionError, SessionGuard, SessionHolder};
use crate::shared::Shared;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Client(#[from] ClientBuildError),
}

/// Top-level wiring: one gateway, five stores, one notifier.
pub struct App<G> {
    pub records: RecordService<G>,
    pub agenda: AgendaService<G>,
    pub documents: DocumentService<G>,
    pub account: AccountService<G>,
    pub auth: AuthService<G>,
    pub notifier: Notifier,
    pub session: Arc<SessionHolder>,
}

impl App<ApiClient> {
    /// Wires the app against the backend at `base_url`, seeding the session
    /// from the platform data directory.
    pub fn new(base_url: Url) -> Result<Self, AppError> {
        let session = Arc::new(SessionHolder::in_user_data_dir()?);
        Self::with_session(base_url, session)
    }

    /// Same, with an explicit session holder (tests point it at a temp
    /// directory).
    pub fn with_session(base_url: Url, session: Arc<SessionHolder>) -> Result<Self, AppError> {
        let tokens: Arc<dyn TokenProvider> = session.clone();
        let api = Arc::new(ApiClient::new(base_url, tokens)?);
        Ok(Self::from_parts(api, session))
    }
}

impl<G> App<G>
where
    G: RecordsApi + AgendaApi + DocumentsApi + AccountApi + AuthApi,
{
    /// Assembles the stores around an already-built gateway.
    pub fn from_parts(api: Arc<G>, session: Arc<SessionHolder>) -> Self {
        let notifier = Notifier::new();
        let relay = ErrorRelay::new(notifier.clone());

        let auth_store = Shared::new(AuthState::seeded(session.current()));
        let guard = SessionGuard::new(session.clone(), auth_store.clone());

        let records = RecordService::new(api.clone(), relay.clone(), guard.clone());
        let documents = DocumentService::new(
            api.clone(),
            records.store.clone(),
            relay.clone(),
            guard.clone(),
        );

        Self {
            agenda: AgendaService::new(api.clone(), relay.clone(), guard.clone()),
            account: AccountService::new(api.clone(), relay.clone(), guard),
            auth: AuthService::new(api, auth_store, session.clone(), relay),
            records,
            documents,
            notifier,
            session,
        }
    }
}
