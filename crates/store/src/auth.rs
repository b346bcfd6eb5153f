//! Auth store and dispatcher.
//!
//! The store mirrors the session holder's identity fields for consumers;
//! the holder owns persistence and the Anonymous/Authenticated transitions.

use std::sync::Arc;

use client::{ApiError, AuthApi};
use models::LoginRequest;

use crate::notify::ErrorRelay;
use crate::session::{Session, SessionHolder};
use crate::shared::Shared;
use crate::status::{OpState, Ticket};

const SOURCE: &str = "auth";

#[derive(Debug, Default)]
pub struct AuthState {
    pub token: Option<String>,
    pub account_id: Option<i64>,
    pub record_id: Option<i64>,
    pub email: Option<String>,
    pub op: OpState,
}

impl AuthState {
    pub fn seeded(session: Option<Session>) -> Self {
        let mut state = Self::default();
        if let Some(session) = session {
            state.apply_session(&session);
        }
        state
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn apply_session(&mut self, session: &Session) {
        self.token = Some(session.token.clone());
        self.account_id = Some(session.account_id);
        self.record_id = Some(session.record_id);
        self.email = Some(session.email.clone());
    }

    pub(crate) fn clear_identity(&mut self) {
        self.token = None;
        self.account_id = None;
        self.record_id = None;
        self.email = None;
    }
}

/// Dispatcher for authentication operations.
pub struct AuthService<G> {
    api: Arc<G>,
    pub store: Shared<AuthState>,
    session: Arc<SessionHolder>,
    relay: ErrorRelay,
}

impl<G> Clone for AuthService<G> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            store: self.store.clone(),
            session: self.session.clone(),
            relay: self.relay.clone(),
        }
    }
}

impl<G: AuthApi> AuthService<G> {
    pub fn new(api: Arc<G>, store: Shared<AuthState>, session: Arc<SessionHolder>, relay: ErrorRelay) -> Self {
        Self {
            api,
            store,
            session,
            relay,
        }
    }

    /// Login success persists the session, then updates the store. On
    /// failure the identity fields are dropped along with the error.
    pub async fn login(&self, credentials: LoginRequest) -> Option<Session> {
        let ticket = self.store.write(|state| state.op.begin());
        match self.api.login(&credentials).await {
            Ok(response) => {
                let session = Session::from_login(response, credentials.email);
                if let Err(error) = self.session.establish(session.clone()) {
                    tracing::warn!(%error, "session persisted in memory only");
                }
                self.store.write(|state| {
                    if state.op.settle(ticket) {
                        state.apply_session(&session);
                    }
                });
                Some(session)
            }
            Err(error) => {
                let entry = self.store.write(|state| {
                    state.clear_identity();
                    state
                        .op
                        .fail(ticket, error.to_string(), error.is_not_found())
                });
                self.relay.observe(SOURCE, entry.as_ref());
                None
            }
        }
    }

    /// The local session is cleared unconditionally after attempting the
    /// remote call; a backend failure is surfaced but cannot keep the user
    /// logged in.
    pub async fn logout(&self) {
        let ticket = self.store.write(|state| state.op.begin());
        let result = self.api.logout().await;

        if let Err(error) = self.session.clear() {
            tracing::warn!(%error, "failed to erase the persisted session");
        }
        let entry = self.store.write(|state| {
            state.clear_identity();
            match &result {
                Ok(()) => {
                    state.op.settle(ticket);
                    None
                }
                Err(error) => state
                    .op
                    .fail(ticket, error.to_string(), error.is_not_found()),
            }
        });
        self.relay.observe(SOURCE, entry.as_ref());
    }

    pub async fn forgot_password(&self, email: &str) -> Option<()> {
        let ticket = self.store.write(|state| state.op.begin());
        match self.api.forgot_password(email).await {
            Ok(()) => {
                self.store.write(|state| state.op.settle(ticket));
                Some(())
            }
            Err(error) => self.fail(ticket, &error),
        }
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Option<()> {
        let ticket = self.store.write(|state| state.op.begin());
        match self.api.reset_password(token, new_password).await {
            Ok(()) => {
                self.store.write(|state| state.op.settle(ticket));
                Some(())
            }
            Err(error) => self.fail(ticket, &error),
        }
    }

    fn fail<T>(&self, ticket: Ticket, error: &ApiError) -> Option<T> {
        let entry = self.store.write(|state| {
            state
                .op
                .fail(ticket, error.to_string(), error.is_not_found())
        });
        self.relay.observe(SOURCE, entry.as_ref());
        None
    }
}
