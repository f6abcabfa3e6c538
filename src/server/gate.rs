use actix_web::http::StatusCode;
use anyhow::{Context, Result};
use log::debug;

use crate::types::response::CommonResponse;

use super::authn::chain::ChainAuthenticator;
use super::authn::{Authenticator, AuthnResponse};
use super::authz::chain::ChainAuthorizer;
use super::authz::{Authorizer, AuthzRequest, AuthzResponse};
use super::request::ForwardedRequest;

/// Final answer for a forwarded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Open,
    Granted(String),
    MissingKey,
    Denied(String),
}

impl Verdict {
    pub fn status(&self) -> StatusCode {
        match self {
            Verdict::Open | Verdict::Granted(_) => StatusCode::OK,
            Verdict::MissingKey | Verdict::Denied(_) => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn description(&self) -> String {
        match self {
            Verdict::Open => String::from("Resource is open"),
            Verdict::Granted(topic) => format!("Access granted for {topic}"),
            Verdict::MissingKey => String::from("Missing API key"),
            Verdict::Denied(topic) => format!("Access denied for {topic}"),
        }
    }
}

impl From<Verdict> for CommonResponse {
    fn from(verdict: Verdict) -> Self {
        CommonResponse {
            code: verdict.status().as_u16(),
            description: verdict.description(),
        }
    }
}

/// The decision engine: finds the offered credential, then lets the
/// authorizer chain decide. It never writes to the registry.
pub struct Gate {
    authn: ChainAuthenticator,
    authz: ChainAuthorizer,
}

impl Gate {
    pub fn new(authn: ChainAuthenticator, authz: ChainAuthorizer) -> Self {
        Self { authn, authz }
    }

    pub fn authorize(&self, req: &ForwardedRequest) -> Result<Verdict> {
        let credential = match self
            .authn
            .authenticate_request(req)
            .context("extract credential")?
        {
            AuthnResponse::Ok(token) => Some(token),
            AuthnResponse::Continue => None,
        };

        let authz_req = AuthzRequest {
            path: req.path.clone(),
            method: req.method.clone(),
            credential,
        };
        let resp = self
            .authz
            .authorize_request(&authz_req)
            .context("authorize request")?;

        let verdict = match resp {
            // Nothing claimed the request
            AuthzResponse::Open | AuthzResponse::Continue => Verdict::Open,
            AuthzResponse::Granted(topic) => Verdict::Granted(topic),
            AuthzResponse::MissingKey(topic) => {
                debug!("No credential offered for topic '{topic}'");
                Verdict::MissingKey
            }
            AuthzResponse::Denied(topic) => Verdict::Denied(topic),
        };
        debug!(
            "Verdict for {} '{}': {}",
            req.method,
            req.path,
            verdict.description()
        );
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::server::authn::config::AuthnConfig;
    use crate::server::authn::factory::AuthnFactory;
    use crate::server::authz::config::AuthzConfig;
    use crate::server::authz::factory::AuthzFactory;
    use crate::server::db::Database;

    use super::*;

    fn build_gate(db: Arc<Database>) -> Gate {
        let authn = AuthnFactory::new().build_authenticator(&AuthnConfig::default());
        let authz = AuthzFactory::new().build_authorizer(&AuthzConfig::default(), db);
        Gate::new(authn, authz)
    }

    fn authorize(gate: &Gate, uri: &str, method: &str, header: Option<&str>) -> Verdict {
        let req = ForwardedRequest::parse(uri, method, header.map(String::from));
        gate.authorize(&req).unwrap()
    }

    #[test]
    fn test_verdict() {
        let resp: CommonResponse = Verdict::Open.into();
        assert_eq!(resp.code, 200);
        assert_eq!(resp.description, "Resource is open");

        let resp: CommonResponse = Verdict::Granted(String::from("oapi")).into();
        assert_eq!(resp.code, 200);
        assert_eq!(resp.description, "Access granted for oapi");

        let resp: CommonResponse = Verdict::MissingKey.into();
        assert_eq!(resp.code, 401);
        assert_eq!(resp.description, "Missing API key");

        let resp: CommonResponse = Verdict::Denied(String::from("oapi")).into();
        assert_eq!(resp.code, 401);
        assert_eq!(resp.description, "Access denied for oapi");
    }

    #[test]
    fn test_open_by_default() {
        let db = Arc::new(Database::new_test());
        let gate = build_gate(db);

        for uri in ["/", "/oapi", "/admin1?token=x", "/collections/obs/items"] {
            assert_eq!(authorize(&gate, uri, "GET", None), Verdict::Open);
            assert_eq!(authorize(&gate, uri, "POST", Some("Bearer k")), Verdict::Open);
        }
    }

    #[test]
    fn test_authorize() {
        let db = Arc::new(Database::new_test());
        let gate = build_gate(db.clone());
        assert!(db.create_token("oapi", "t1").unwrap());

        assert_eq!(
            authorize(&gate, "/oapi?token=t1", "GET", None),
            Verdict::Granted(String::from("oapi"))
        );
        assert_eq!(
            authorize(&gate, "/oapi?token=wrong", "GET", None),
            Verdict::Denied(String::from("oapi"))
        );
        assert_eq!(authorize(&gate, "/oapi", "GET", None), Verdict::MissingKey);
        assert_eq!(authorize(&gate, "/oapi", "GET", Some("Bearer")), Verdict::MissingKey);
        assert_eq!(
            authorize(&gate, "/oapi/items", "PUT", Some("Bearer t1")),
            Verdict::Granted(String::from("oapi"))
        );
        assert_eq!(
            authorize(&gate, "/oapi/items", "PUT", Some("bearer t1")),
            Verdict::MissingKey
        );

        // Query parameter is the one checked when both are offered
        assert_eq!(
            authorize(&gate, "/oapi?token=wrong", "GET", Some("Bearer t1")),
            Verdict::Denied(String::from("oapi"))
        );
        assert_eq!(
            authorize(&gate, "/oapi?token=t1", "GET", Some("Bearer wrong")),
            Verdict::Granted(String::from("oapi"))
        );

        // Repeated parameter: the first value is the credential
        assert_eq!(
            authorize(&gate, "/oapi?token=t1&token=wrong", "GET", None),
            Verdict::Granted(String::from("oapi"))
        );
        assert_eq!(
            authorize(&gate, "/oapi?token=t1&token=", "GET", None),
            Verdict::Granted(String::from("oapi"))
        );
        assert_eq!(
            authorize(&gate, "/oapi?token=wrong&token=t1", "GET", None),
            Verdict::Denied(String::from("oapi"))
        );
    }

    #[test]
    fn test_metadata_bypass() {
        let db = Arc::new(Database::new_test());
        let gate = build_gate(db.clone());
        assert!(db.create_token("collections", "k1").unwrap());
        assert!(db.create_token("data", "k2").unwrap());

        assert_eq!(authorize(&gate, "/collections/stations", "GET", None), Verdict::Open);
        assert_eq!(
            authorize(&gate, "/collections/discovery-metadata/items", "GET", None),
            Verdict::Open
        );
        assert_eq!(authorize(&gate, "/data/metadata/a.json", "GET", None), Verdict::Open);

        assert_eq!(
            authorize(&gate, "/collections/stations", "POST", None),
            Verdict::MissingKey
        );
        assert_eq!(authorize(&gate, "/data/core/a.json", "GET", None), Verdict::MissingKey);
        // Markers in the query string do not count
        assert_eq!(
            authorize(&gate, "/data/core?f=stations", "GET", None),
            Verdict::MissingKey
        );
    }

    #[test]
    fn test_prefix_resolution() {
        let db = Arc::new(Database::new_test());
        let gate = build_gate(db.clone());
        assert!(db.create_token("admin", "k1").unwrap());
        assert!(db.create_token("admin/secret", "k2").unwrap());

        assert_eq!(
            authorize(&gate, "/admin1?token=k1", "GET", None),
            Verdict::Granted(String::from("admin"))
        );
        assert_eq!(
            authorize(&gate, "/admin/secret/x?token=k1", "GET", None),
            Verdict::Denied(String::from("admin/secret"))
        );
        assert_eq!(
            authorize(&gate, "/admin/secret/x?token=k2", "GET", None),
            Verdict::Granted(String::from("admin/secret"))
        );
        assert_eq!(
            authorize(&gate, "/admin/public?token=k2", "GET", None),
            Verdict::Denied(String::from("admin"))
        );

        assert!(db.delete_token("admin", None).unwrap());
        assert_eq!(authorize(&gate, "/admin1", "GET", None), Verdict::Open);
        assert_eq!(authorize(&gate, "/admin/secret", "GET", None), Verdict::MissingKey);
    }

    #[test]
    fn test_cache_coherence() {
        let db = Arc::new(Database::new_test());
        let gate = build_gate(db.clone());
        assert!(db.create_token("oapi", "t1").unwrap());
        assert!(db.create_token("oapi", "t2").unwrap());

        assert_eq!(
            authorize(&gate, "/oapi?token=t1", "GET", None),
            Verdict::Granted(String::from("oapi"))
        );
        assert!(db.delete_token("oapi", Some("t1")).unwrap());
        assert_eq!(
            authorize(&gate, "/oapi?token=t1", "GET", None),
            Verdict::Denied(String::from("oapi"))
        );
        assert!(db.delete_token("oapi", Some("t2")).unwrap());
        assert_eq!(authorize(&gate, "/oapi?token=t1", "GET", None), Verdict::Open);
    }
}
