use std::sync::Arc;
use std::time::Duration;

use actix_web::error::InternalError;
use actix_web::web::{self, Data, Form, FormConfig, ServiceConfig};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use openssl::ssl::SslAcceptorBuilder;
use sd_notify::NotifyState;

use crate::types::token::{AddTokenForm, RemoveTokenForm};

use super::handlers::authorize::AuthorizeHandler;
use super::handlers::healthz::HealthzHandler;
use super::handlers::token::TokenHandler;
use super::response::Response;

pub struct RestfulServer {
    ssl: Option<SslAcceptorBuilder>,
    ctx: Arc<RestfulContext>,

    keep_alive_secs: Option<u64>,
    workers: Option<u64>,

    bind: String,

    form_limit: usize,
}

pub struct RestfulContext {
    pub authorize_handler: AuthorizeHandler,
    pub token_handler: TokenHandler,
    pub healthz_handler: HealthzHandler,
}

impl RestfulServer {
    const AUTHORIZE_PATH: &'static str = "/authorize";
    const ADD_TOKEN_PATH: &'static str = "/add_token";
    const REMOVE_TOKEN_PATH: &'static str = "/remove_token";
    const HEALTHZ_PATH: &'static str = "/healthz";

    pub fn new(
        bind: String,
        ssl: Option<SslAcceptorBuilder>,
        ctx: Arc<RestfulContext>,
        form_limit: usize,
    ) -> Self {
        Self {
            ssl,
            ctx,
            keep_alive_secs: None,
            workers: None,
            bind,
            form_limit,
        }
    }

    pub fn set_keep_alive_secs(&mut self, keep_alive_secs: u64) {
        self.keep_alive_secs = Some(keep_alive_secs);
    }

    pub fn set_workers(&mut self, workers: u64) {
        self.workers = Some(workers);
    }

    /// Registers all routes, the shared context and the form limits on an
    /// app. `form_limit` is in bytes.
    pub fn configure(cfg: &mut ServiceConfig, ctx: Arc<RestfulContext>, form_limit: usize) {
        let form_cfg = FormConfig::default()
            .limit(form_limit)
            .error_handler(|err, req| {
                debug!("Reject form for {}: {err}", req.path());
                let resp: HttpResponse =
                    Response::bad_request(format!("Invalid form: {err}")).into();
                InternalError::from_response(err, resp).into()
            });

        cfg.app_data(Data::new(ctx))
            .app_data(form_cfg)
            // Proxies keep the original method on the subrequest, any is accepted
            .service(
                web::resource(Self::AUTHORIZE_PATH).route(web::route().to(Self::handle_authorize)),
            )
            .service(
                web::resource(Self::ADD_TOKEN_PATH)
                    .route(web::post().to(Self::handle_add_token))
                    .default_service(web::route().to(Self::method_not_allowed)),
            )
            .service(
                web::resource(Self::REMOVE_TOKEN_PATH)
                    .route(web::post().to(Self::handle_remove_token))
                    .default_service(web::route().to(Self::method_not_allowed)),
            )
            .service(
                web::resource(Self::HEALTHZ_PATH).route(web::get().to(Self::handle_healthz)),
            )
            .default_service(web::route().to(Self::default_handler));
    }

    pub async fn run(mut self) -> Result<()> {
        let ctx = self.ctx.clone();
        let form_limit = self.form_limit;
        let mut srv = HttpServer::new(move || {
            App::new().configure(|cfg| Self::configure(cfg, ctx.clone(), form_limit))
        });

        if let Some(ssl) = self.ssl.take() {
            info!("Binding to https://{}", self.bind);
            srv = srv.bind_openssl(&self.bind, ssl).context("bind with ssl")?
        } else {
            info!("Binding to http://{}", self.bind);
            srv = srv.bind(&self.bind).context("bind without ssl")?
        };

        if let Some(keep_alive) = self.keep_alive_secs {
            srv = srv.keep_alive(Duration::from_secs(keep_alive));
        }
        if let Some(workers) = self.workers {
            srv = srv.workers(workers as usize);
        }

        if let Err(e) = sd_notify::notify(true, &[NotifyState::Ready]) {
            warn!("Failed to notify systemd: {e:#}");
        }
        info!("Starting restful server");
        srv.run().await.context("run server")?;

        info!("Server stopped by user");
        Ok(())
    }

    async fn handle_authorize(req: HttpRequest, ctx: Data<Arc<RestfulContext>>) -> HttpResponse {
        ctx.authorize_handler.handle(&req).into()
    }

    async fn handle_add_token(
        form: Form<AddTokenForm>,
        ctx: Data<Arc<RestfulContext>>,
    ) -> HttpResponse {
        ctx.token_handler.add_token(form.into_inner()).into()
    }

    async fn handle_remove_token(
        form: Form<RemoveTokenForm>,
        ctx: Data<Arc<RestfulContext>>,
    ) -> HttpResponse {
        ctx.token_handler.remove_token(form.into_inner()).into()
    }

    async fn handle_healthz(ctx: Data<Arc<RestfulContext>>) -> HttpResponse {
        ctx.healthz_handler.handle().into()
    }

    async fn method_not_allowed(req: HttpRequest) -> HttpResponse {
        let message = format!("Method {} not allowed for {}", req.method(), req.path());
        Response::method_not_allowed(message).into()
    }

    async fn default_handler(req: HttpRequest) -> HttpResponse {
        let path = req.uri().path().to_string();
        let method = req.method().as_str().to_string();
        Response::not_found(format!("No route to {method} {path}")).into()
    }
}
