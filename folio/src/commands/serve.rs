use folio_config::Config;
use folio_di::Provide;
use folio_email_contracts::transport::TransportConfig;
use tracing::{info, warn};

use crate::environment::{mail_settings, types::RestServer, Provider};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    match TransportConfig::from_settings(&mail_settings(&config.smtp)) {
        Ok(transport) => info!(?transport, "Mail transport configured"),
        Err(err) => warn!("{err}, contact form submissions will fail"),
    }

    if config.llm.api_key.is_none() {
        info!("No chat completion API key configured, replies will use the static template");
    }

    let mut provider = Provider::new(&config);
    let server: RestServer = provider.provide();
    info!("Starting http server on {}", config.http.address);
    server.serve().await
}
