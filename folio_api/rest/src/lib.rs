use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{http::HeaderValue, Router};
use folio_core_contact_contracts::ContactFeatureService;
use folio_di::Build;
use folio_utils::Apply;
use tokio::net::TcpListener;
use tracing::info;

mod middlewares;
mod models;
mod routes;


#[derive(Debug, Clone, Build)]
pub struct RestServer<Contact> {
    contact: Contact,
    config: Arc<RestServerConfig>,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub addr: SocketAddr,
    pub real_ip_config: Option<Arc<RestServerRealIpConfig>>,
    /// Origins allowed to make cross-origin requests. CORS is disabled if
    /// this is empty.
    pub allowed_origins: Vec<String>,
}

#[derive(Debug)]
pub struct RestServerRealIpConfig {
    /// Header containing the client ip, e.g. `X-Real-Ip`.
    pub header: String,
    /// The reverse proxy that is trusted to set the header.
    pub set_from: IpAddr,
}

impl<Contact> RestServer<Contact>
where
    Contact: ContactFeatureService,
{
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = self.config.addr;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind to {addr}"))?;
        self.serve_on(listener).await
    }

    /// Serve requests accepted by an already bound listener.
    pub async fn serve_on(self, listener: TcpListener) -> anyhow::Result<()> {
        let router = self.router()?;
        info!("Listening on {}", listener.local_addr()?);
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .map_err(Into::into)
    }

    fn router(self) -> anyhow::Result<Router<()>> {
        let allowed_origins = self
            .config
            .allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("Invalid allowed origin: {origin:?}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Router::new()
            .merge(routes::contact::router(self.contact.into()))
            .apply(middlewares::cors::add(allowed_origins))
            .apply(middlewares::panic_handler::add)
            .apply(middlewares::trace::add)
            .apply(middlewares::client_ip::add(
                self.config.real_ip_config.clone(),
            ))
            .apply(middlewares::request_id::add))
    }
}
