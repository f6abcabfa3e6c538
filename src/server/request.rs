use std::collections::HashMap;

use actix_web::web;
use log::warn;

/// The original client request as described by the proxy's forward-auth
/// subrequest. Only the path and query are taken from the forwarded URI;
/// scheme and host are ignored.
#[derive(Debug, Clone, Default)]
pub struct ForwardedRequest {
    pub path: String,
    pub method: String,
    pub query: HashMap<String, String>,
    pub auth_header: Option<String>,
}

impl ForwardedRequest {
    /// Builds a request from the forwarded URI (path and optional query).
    pub fn parse(uri: &str, method: &str, auth_header: Option<String>) -> Self {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (uri, HashMap::new()),
        };
        // Fragments never reach a server, but some clients forward them anyway
        let path = match path.split_once('#') {
            Some((path, _)) => path,
            None => path,
        };

        Self {
            path: path.to_string(),
            method: method.to_string(),
            query,
            auth_header,
        }
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(|v| v.as_str())
    }
}

fn parse_query(query: &str) -> HashMap<String, String> {
    let query = match query.split_once('#') {
        Some((query, _)) => query,
        None => query,
    };
    let pairs = match web::Query::<Vec<(String, String)>>::from_query(query) {
        Ok(pairs) => pairs.into_inner(),
        Err(e) => {
            warn!("Ignore malformed forwarded query: {e}");
            return HashMap::new();
        }
    };

    // A repeated key keeps its first value
    let mut query = HashMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        query.entry(key).or_insert(value);
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let req = ForwardedRequest::parse("/oapi?token=t1", "GET", None);
        assert_eq!(req.path, "/oapi");
        assert_eq!(req.method, "GET");
        assert_eq!(req.query_value("token"), Some("t1"));
        assert!(req.auth_header.is_none());

        let req = ForwardedRequest::parse(
            "/collections/stations/items?f=json&token=a%20b#top",
            "POST",
            Some(String::from("Bearer x")),
        );
        assert_eq!(req.path, "/collections/stations/items");
        assert_eq!(req.method, "POST");
        assert_eq!(req.query_value("f"), Some("json"));
        assert_eq!(req.query_value("token"), Some("a b"));
        assert_eq!(req.auth_header.as_deref(), Some("Bearer x"));

        let req = ForwardedRequest::parse("/admin", "GET", None);
        assert_eq!(req.path, "/admin");
        assert!(req.query.is_empty());

        let req = ForwardedRequest::parse("/admin?", "GET", None);
        assert_eq!(req.path, "/admin");
        assert!(req.query_value("token").is_none());

        let req = ForwardedRequest::parse("/admin#frag", "GET", None);
        assert_eq!(req.path, "/admin");
    }

    #[test]
    fn test_parse_repeated_key() {
        let req = ForwardedRequest::parse("/oapi?token=t1&token=wrong", "GET", None);
        assert_eq!(req.query_value("token"), Some("t1"));

        let req = ForwardedRequest::parse("/oapi?token=t1&f=json&token=", "GET", None);
        assert_eq!(req.query_value("token"), Some("t1"));
        assert_eq!(req.query_value("f"), Some("json"));

        let req = ForwardedRequest::parse("/oapi?token=&token=t1", "GET", None);
        assert_eq!(req.query_value("token"), Some(""));
    }
}
