use std::future::Future;

use folio_models::email_address::EmailAddressWithName;
use thiserror::Error;
use transport::TransportConfig;

pub mod transport;

/// Opens connections to an outbound mail relay.
#[cfg_attr(feature = "mock", mockall::automock(type Transport = MockEmailTransport;))]
pub trait EmailService: Send + Sync + 'static {
    type Transport: EmailTransport;

    /// Connect to the relay described by `config` and verify the connection
    /// (handshake, TLS and authentication) without sending anything.
    fn connect(
        &self,
        config: &TransportConfig,
    ) -> impl Future<Output = Result<Self::Transport, EmailError>> + Send;
}

/// A verified connection to a mail relay.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait EmailTransport: Send + Sync + 'static {
    fn send(&self, email: Email) -> impl Future<Output = Result<(), EmailError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub recipient: EmailAddressWithName,
    pub subject: String,
    pub body: String,
    pub content_type: ContentType,
    pub reply_to: Option<EmailAddressWithName>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Text,
    Html,
}

#[derive(Debug, Error)]
#[error("{kind}")]
pub struct EmailError {
    pub kind: EmailErrorKind,
    #[source]
    pub source: anyhow::Error,
}

impl EmailError {
    pub fn new(kind: EmailErrorKind, source: impl Into<anyhow::Error>) -> Self {
        Self {
            kind,
            source: source.into(),
        }
    }
}

/// Coarse classification of a mail relay failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailErrorKind {
    ConnectionRefused,
    TimedOut,
    AuthenticationFailed,
    /// The relay answered with a permanent (5xx) error.
    ServerError,
    /// The relay answered with a transient (4xx) error.
    ClientError,
    Unknown,
}

impl std::fmt::Display for EmailErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::ConnectionRefused => "connection refused",
            Self::TimedOut => "connection timed out",
            Self::AuthenticationFailed => "authentication failed",
            Self::ServerError => "smtp server error",
            Self::ClientError => "smtp client error",
            Self::Unknown => "unknown smtp error",
        })
    }
}

#[cfg(feature = "mock")]
impl MockEmailService {
    pub fn with_connect(mut self, config: TransportConfig, transport: MockEmailTransport) -> Self {
        self.expect_connect()
            .once()
            .with(mockall::predicate::eq(config))
            .return_once(move |_| Box::pin(std::future::ready(Ok(transport))));
        self
    }

    pub fn with_connect_error(mut self, config: TransportConfig, kind: EmailErrorKind) -> Self {
        self.expect_connect()
            .once()
            .with(mockall::predicate::eq(config))
            .return_once(move |_| {
                Box::pin(std::future::ready(Err(EmailError::new(
                    kind,
                    anyhow::anyhow!("{kind}"),
                ))))
            });
        self
    }
}

#[cfg(feature = "mock")]
impl MockEmailTransport {
    pub fn with_send(mut self, email: Email, result: Result<(), EmailErrorKind>) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| {
                Box::pin(std::future::ready(result.map_err(|kind| {
                    EmailError::new(kind, anyhow::anyhow!("{kind}"))
                })))
            });
        self
    }
}
