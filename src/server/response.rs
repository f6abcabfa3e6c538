use actix_web::http::StatusCode;
use actix_web::{HttpResponse, HttpResponseBuilder};
use serde::Serialize;

use crate::types::response::CommonResponse;

pub const DATABASE_ERROR: &str = "Database error";

/// A wrapper struct for HTTP responses that provides convenient methods
/// for creating common response types
pub struct Response {
    http_response: HttpResponse,
}

impl Response {
    pub fn not_found(message: impl AsRef<str>) -> Self {
        Self::common(StatusCode::NOT_FOUND, message.as_ref().to_string())
    }

    pub fn bad_request(message: impl AsRef<str>) -> Self {
        Self::common(StatusCode::BAD_REQUEST, message.as_ref().to_string())
    }

    pub fn method_not_allowed(message: impl AsRef<str>) -> Self {
        Self::common(StatusCode::METHOD_NOT_ALLOWED, message.as_ref().to_string())
    }

    pub fn error(message: &str) -> Self {
        let message = format!("Server error: {message}");
        Self::common(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn ok(message: impl AsRef<str>) -> Self {
        Self::common(StatusCode::OK, message.as_ref().to_string())
    }

    pub fn json<T: Serialize>(status: StatusCode, data: T) -> Self {
        Self {
            http_response: HttpResponseBuilder::new(status).json(data),
        }
    }

    /// `{code, description}` body with the status mirrored in `code`.
    pub fn common(status: StatusCode, description: String) -> Self {
        let resp = CommonResponse {
            code: status.as_u16(),
            description,
        };
        Self::json(status, resp)
    }
}

impl From<CommonResponse> for Response {
    fn from(resp: CommonResponse) -> Self {
        let status = StatusCode::from_u16(resp.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::json(status, resp)
    }
}

impl From<Response> for HttpResponse {
    fn from(val: Response) -> Self {
        val.http_response
    }
}
