//! HTTP gateway to the DailyCare backend.
//!
//! One `ApiClient` implements the per-resource gateway traits; the state
//! layer talks to the traits so tests can substitute a scripted fake.

pub mod error;
pub mod gateway;
pub mod http;

pub use error::ApiError;
pub use gateway::{AccountApi, AgendaApi, AgendaQuery, AuthApi, DocumentsApi, RecordsApi};
pub use http::{ApiClient, ClientBuildError, NoAuth, TokenProvider};
pub use url::Url;
