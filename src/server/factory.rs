use std::sync::Arc;

use anyhow::{Context, Result};
use openssl::ssl::{SslAcceptor, SslAcceptorBuilder, SslFiletype, SslMethod};

use super::authn::factory::AuthnFactory;
use super::authz::factory::AuthzFactory;
use super::config::ServerConfig;
use super::db::factory::DbFactory;
use super::db::Database;
use super::gate::Gate;
use super::handlers::authorize::AuthorizeHandler;
use super::handlers::healthz::HealthzHandler;
use super::handlers::token::TokenHandler;
use super::restful::{RestfulContext, RestfulServer};

pub struct ServerFactory {
    db: Arc<Database>,
    cfg: ServerConfig,
}

impl ServerFactory {
    pub fn new(cfg: ServerConfig) -> Result<Self> {
        let db_factory = DbFactory::new();
        let db = db_factory.build_db(&cfg.db).context("init database")?;
        Ok(Self { cfg, db })
    }

    pub fn build_server(&self) -> Result<RestfulServer> {
        let ssl = self.build_ssl()?;
        let ctx = self.build_context();

        let mut srv =
            RestfulServer::new(self.cfg.bind.clone(), ssl, ctx, self.cfg.form_limit_bytes());
        if self.cfg.keep_alive_secs > 0 {
            srv.set_keep_alive_secs(self.cfg.keep_alive_secs);
        }
        if self.cfg.workers > 0 {
            srv.set_workers(self.cfg.workers);
        }

        Ok(srv)
    }

    pub fn build_ssl(&self) -> Result<Option<SslAcceptorBuilder>> {
        if !self.cfg.ssl {
            return Ok(None);
        }

        let mut builder =
            SslAcceptor::mozilla_intermediate(SslMethod::tls()).context("init ssl acceptor")?;

        builder
            .set_private_key_file(&self.cfg.key_path, SslFiletype::PEM)
            .context("load ssl key file")?;
        builder
            .set_certificate_chain_file(&self.cfg.cert_path)
            .context("load ssl cert file")?;

        Ok(Some(builder))
    }

    pub fn build_context(&self) -> Arc<RestfulContext> {
        let authn_factory = AuthnFactory::new();
        let authn = authn_factory.build_authenticator(&self.cfg.authn);

        let authz_factory = AuthzFactory::new();
        let authz = authz_factory.build_authorizer(&self.cfg.authz, self.db.clone());

        let gate = Gate::new(authn, authz);
        let authorize_handler = AuthorizeHandler::new(
            gate,
            self.cfg.forwarded.uri_headers.clone(),
            self.cfg.forwarded.method_header.clone(),
        );
        let token_handler = TokenHandler::new(self.db.clone());
        let healthz_handler = HealthzHandler::new();

        let ctx = RestfulContext {
            authorize_handler,
            token_handler,
            healthz_handler,
        };
        Arc::new(ctx)
    }
}
