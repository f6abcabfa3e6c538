use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use actix_web::HttpRequest;
use log::{debug, error};

use crate::server::gate::Gate;
use crate::server::request::ForwardedRequest;
use crate::server::response::{self, Response};
use crate::types::response::CommonResponse;

/// Answers the proxy's forward-auth subrequest.
pub struct AuthorizeHandler {
    gate: Gate,
    uri_headers: Vec<String>,
    method_header: String,
}

impl AuthorizeHandler {
    const DEFAULT_METHOD: &'static str = "GET";

    pub fn new(gate: Gate, uri_headers: Vec<String>, method_header: String) -> Self {
        Self {
            gate,
            uri_headers,
            method_header,
        }
    }

    pub fn handle(&self, req: &HttpRequest) -> Response {
        let headers = req.headers();

        let uri = match self.forwarded_uri(headers) {
            Some(uri) => uri,
            None => {
                debug!("Authorize request without forwarded URI header");
                let message = format!(
                    "Missing forwarded URI header ({})",
                    self.uri_headers.join(", ")
                );
                return Response::bad_request(message);
            }
        };
        let method = header_value(headers, &self.method_header)
            .filter(|m| !m.is_empty())
            .unwrap_or(Self::DEFAULT_METHOD);
        let auth_header = header_value(headers, AUTHORIZATION.as_str()).map(String::from);

        let forwarded = ForwardedRequest::parse(uri, method, auth_header);
        match self.gate.authorize(&forwarded) {
            Ok(verdict) => CommonResponse::from(verdict).into(),
            Err(e) => {
                error!("Failed to authorize '{}': {e:#}", forwarded.path);
                Response::error(response::DATABASE_ERROR)
            }
        }
    }

    fn forwarded_uri<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        self.uri_headers
            .iter()
            .find_map(|name| header_value(headers, name))
            .filter(|uri| !uri.is_empty())
    }
}

/// Header names are case-insensitive. Values that are not visible ASCII are
/// treated as absent.
fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim())
}
