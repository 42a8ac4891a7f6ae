use anyhow::Context;
use clap::Subcommand;
use folio_config::Config;
use folio_di::Provide;
use folio_email_contracts::{
    transport::TransportConfig, ContentType, Email, EmailService, EmailTransport,
};
use folio_models::email_address::EmailAddressWithName;
use tracing::info;

use crate::environment::{mail_settings, types, Provider};

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Test email deliverability
    Test { recipient: EmailAddressWithName },
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            EmailCommand::Test { recipient } => test(config, recipient).await,
        }
    }
}

async fn test(config: Config, recipient: EmailAddressWithName) -> anyhow::Result<()> {
    let transport_config = TransportConfig::from_settings(&mail_settings(&config.smtp))?;

    let email_service: types::Email = Provider::new(&config).provide();

    info!(?transport_config, "Verifying mail transport");
    let transport = email_service
        .connect(&transport_config)
        .await
        .context("Failed to verify the mail transport")?;

    transport
        .send(Email {
            recipient: recipient.clone(),
            subject: "Email Deliverability Test".into(),
            body: "Email deliverability seems to be working!".into(),
            content_type: ContentType::Text,
            reply_to: None,
        })
        .await
        .context("Failed to send email")?;

    info!("Sent test email to {recipient}");

    Ok(())
}
