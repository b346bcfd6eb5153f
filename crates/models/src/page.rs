use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Envelope returned by paginated list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pages: i64,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pages: 0,
        }
    }
}
