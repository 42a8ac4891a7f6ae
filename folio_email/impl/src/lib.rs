use std::time::Duration;

use anyhow::anyhow;
use folio_di::Build;
use folio_email_contracts::{
    transport::{SmtpCredentials, TransportConfig},
    ContentType, Email, EmailError, EmailErrorKind, EmailService, EmailTransport,
};
use folio_models::email_address::EmailAddressWithName;
use folio_utils::{trace_instrument, Apply};
use lettre::{
    message::{header, MessageBuilder},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
        AsyncSmtpTransportBuilder,
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

mod classify;

const SENDGRID_HOST: &str = "smtp.sendgrid.net";
const GMAIL_HOST: &str = "smtp.gmail.com";

#[derive(Debug, Clone, Build)]
pub struct EmailServiceImpl {
    config: EmailServiceConfig,
}

#[derive(Debug, Clone)]
pub struct EmailServiceConfig {
    /// Sender of all outgoing emails.
    pub from: EmailAddressWithName,
    /// Applies to connecting and to every SMTP command.
    pub timeout: Duration,
}

impl EmailServiceImpl {
    pub fn new(config: EmailServiceConfig) -> Self {
        Self { config }
    }
}

impl EmailService for EmailServiceImpl {
    type Transport = SmtpTransport;

    #[trace_instrument(skip(self))]
    async fn connect(&self, config: &TransportConfig) -> Result<SmtpTransport, EmailError> {
        let transport = build_transport(config, self.config.timeout)?;

        match transport.test_connection().await {
            Ok(true) => Ok(SmtpTransport {
                from: self.config.from.clone(),
                transport,
            }),
            Ok(false) => Err(EmailError::new(
                EmailErrorKind::Unknown,
                anyhow!("SMTP server did not respond to NOOP"),
            )),
            Err(err) => Err(classify::smtp_error(err)),
        }
    }
}

/// A verified SMTP transport, see [`EmailService::connect`].
#[derive(Debug, Clone)]
pub struct SmtpTransport {
    from: EmailAddressWithName,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailTransport for SmtpTransport {
    #[trace_instrument(skip(self, email), fields(recipient = %email.recipient, subject = %email.subject))]
    async fn send(&self, email: Email) -> Result<(), EmailError> {
        let message = Message::builder()
            .from(self.from.0.clone())
            .to(email.recipient.0)
            .apply_map(email.reply_to.map(|x| x.0), MessageBuilder::reply_to)
            .subject(email.subject)
            .header(match email.content_type {
                ContentType::Text => header::ContentType::TEXT_PLAIN,
                ContentType::Html => header::ContentType::TEXT_HTML,
            })
            .body(email.body)
            .map_err(|err| EmailError::new(EmailErrorKind::Unknown, err))?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(classify::smtp_error)
    }
}

fn build_transport(
    config: &TransportConfig,
    timeout: Duration,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
    let (builder, credentials) = match config {
        TransportConfig::SendGrid { credentials } => (
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(SENDGRID_HOST),
            credentials,
        ),
        TransportConfig::Gmail { credentials } => (
            AsyncSmtpTransport::<Tokio1Executor>::relay(GMAIL_HOST),
            credentials,
        ),
        TransportConfig::Smtp {
            host,
            port,
            secure,
            credentials,
        } => (smtp_builder(host, *port, *secure), credentials),
    };

    let SmtpCredentials { user, password } = credentials;

    builder
        .map(|builder| {
            builder
                .credentials(Credentials::new(user.clone(), (**password).clone()))
                .timeout(Some(timeout))
                .build()
        })
        .map_err(|err| EmailError::new(EmailErrorKind::Unknown, err))
}

fn smtp_builder(
    host: &str,
    port: u16,
    secure: bool,
) -> Result<AsyncSmtpTransportBuilder, lettre::transport::smtp::Error> {
    if secure {
        return AsyncSmtpTransport::<Tokio1Executor>::relay(host).map(|builder| builder.port(port));
    }

    let tls = TlsParameters::new(host.into())?;
    Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        .port(port)
        .tls(Tls::Opportunistic(tls)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> SmtpCredentials {
        SmtpCredentials {
            user: "mailer".into(),
            password: "secret".to_owned().into(),
        }
    }

    #[tokio::test]
    async fn build_all_transport_kinds() {
        for config in [
            TransportConfig::SendGrid {
                credentials: credentials(),
            },
            TransportConfig::Gmail {
                credentials: credentials(),
            },
            TransportConfig::Smtp {
                host: "smtp.example.com".into(),
                port: 465,
                secure: true,
                credentials: credentials(),
            },
            TransportConfig::Smtp {
                host: "smtp.example.com".into(),
                port: 587,
                secure: false,
                credentials: credentials(),
            },
        ] {
            build_transport(&config, Duration::from_secs(1)).unwrap();
        }
    }
}
