use serde::{Deserialize, Serialize};

/// Body returned by every endpoint. `code` always equals the HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonResponse {
    pub code: u16,
    pub description: String,
}
