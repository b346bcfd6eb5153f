//! Account store and dispatcher.

use std::sync::Arc;

use client::{AccountApi, ApiError};
use models::{Account, UpdateAccount};

use crate::notify::ErrorRelay;
use crate::session::SessionGuard;
use crate::shared::Shared;
use crate::status::{OpState, Ticket};

const SOURCE: &str = "account";

#[derive(Debug, Default)]
pub struct AccountState {
    pub selected: Option<Account>,
    pub op: OpState,
}

impl AccountState {
    fn apply_selected(&mut self, ticket: Ticket, account: Account) {
        if self.op.settle(ticket) {
            self.selected = Some(account);
        }
    }
}

/// Dispatcher for the caller's own account. The account is resolved from
/// the bearer token server-side, so there is no id to pass around.
pub struct AccountService<G> {
    api: Arc<G>,
    pub store: Shared<AccountState>,
    relay: ErrorRelay,
    guard: SessionGuard,
}

impl<G> Clone for AccountService<G> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            store: self.store.clone(),
            relay: self.relay.clone(),
            guard: self.guard.clone(),
        }
    }
}

impl<G: AccountApi> AccountService<G> {
    pub fn new(api: Arc<G>, relay: ErrorRelay, guard: SessionGuard) -> Self {
        Self {
            api,
            store: Shared::default(),
            relay,
            guard,
        }
    }

    pub async fn fetch(&self) -> Option<Account> {
        let ticket = self.store.write(|state| state.op.begin());
        match self.api.get_account().await {
            Ok(account) => {
                self.store
                    .write(|state| state.apply_selected(ticket, account.clone()));
                Some(account)
            }
            Err(error) => self.fail(ticket, &error, true),
        }
    }

    /// Updates in place. The displayed account is refreshed by the next
    /// fetch, not by the update response.
    pub async fn update(&self, data: &UpdateAccount) -> Option<Account> {
        let ticket = self.store.write(|state| state.op.begin());
        match self.api.update_account(data).await {
            Ok(account) => {
                self.store.write(|state| state.op.settle(ticket));
                Some(account)
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
