use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthzResponse {
    pub code: u16,
    pub description: String,
    pub now: u64,
    pub time_zone: String,
    pub version: String,
}
