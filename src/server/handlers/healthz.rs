use actix_web::http::StatusCode;
use chrono::Local;

use crate::server::response::Response;
use crate::types::healthz::HealthzResponse;

pub struct HealthzHandler;

impl HealthzHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self) -> Response {
        let local = Local::now();
        let offset = format!("{}", local.offset());
        let now = local.timestamp() as u64;
        let response = HealthzResponse {
            code: StatusCode::OK.as_u16(),
            description: String::from("OK"),
            now,
            time_zone: offset,
            version: env!("TOPICGATE_VERSION").to_string(),
        };
        Response::json(StatusCode::OK, response)
    }
}
