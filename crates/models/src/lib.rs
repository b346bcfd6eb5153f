//! Wire models shared by the gateway and the state layer.

pub mod account;
pub mod auth;
pub mod daily_log;
pub mod document;
pub mod page;
pub mod record;
pub mod search;
pub mod validate;

pub use account::{Account, UpdateAccount};
pub use auth::{LoginRequest, LoginResponse};
pub use daily_log::{CreateDailyLog, DailyLog, NotableEvents, Outing, SleepTimes};
pub use document::Document;
pub use page::Page;
pub use record::{CreateRecord, Record, Sex, UpdateRecord};
pub use search::Searchable;
pub use validate::ValidationError;
