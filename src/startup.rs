use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::web;
use actix_web::web::Data;
use actix_web::App;
use actix_web::HttpServer;
use anyhow::Context;
use tera::Tera;
use tracing_actix_web::TracingLogger;

use crate::configuration::Settings;
use crate::mailing_list_client::MailingListClient;
use crate::routes::health_check;
use crate::routes::list_index;
use crate::routes::subscribe;
use crate::routes::subscribe_form;
use crate::routes::templates;
use crate::routes::DoubleOptin;

/// Wrapper for actix's `Server` with access to the bound port. Not to be
/// confused with actix's `App`!
pub struct Application {
    /// Left private; use `get_port` to access
    port: u16,
    server: Server,
}

impl Application {
    /// Bind the listener and build everything the handlers share: the
    /// provider client and the compiled templates.
    pub fn build(cfg: Settings) -> Result<Self, anyhow::Error> {
        let addr = format!("{}:{}", cfg.application.host, cfg.application.port);
        let listener = TcpListener::bind(&addr).with_context(|| format!("could not bind {addr}"))?;
        // with port 0, the OS picks one; this is the only way to find out which
        let port = listener.local_addr()?.port();

        let client = cfg
            .mailing_list
            .client()
            .context("could not build mailing list client")?;
        let templates = templates().context("could not compile templates")?;

        let server = run(
            listener,
            client,
            templates,
            DoubleOptin(cfg.mailing_list.double_optin),
        )?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 { self.port }

    /// Because this consumes `self`, this should be the final function call (or
    /// passed to `tokio::spawn`)
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> { self.server.await }
}

/// The server is not responsible for binding to an address, it only listens to
/// an already bound address.
///
/// Declares all endpoints.
pub fn run(
    listener: TcpListener,
    client: MailingListClient,
    templates: Tera,
    double_optin: DoubleOptin,
) -> Result<Server, anyhow::Error> {
    // `Data` is an `Arc`; every worker gets a clone of the same client, so
    // connections to the provider are pooled across workers
    let client = Data::new(client);
    let templates = Data::new(templates);
    let double_optin = Data::new(double_optin);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/", web::get().to(list_index))
            .route("/health_check", web::get().to(health_check))
            .route("/{list_id}/subscribe/", web::get().to(subscribe_form))
            .route("/{list_id}/subscribe/", web::post().to(subscribe))
            .app_data(client.clone())
            .app_data(templates.clone())
            .app_data(double_optin.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
