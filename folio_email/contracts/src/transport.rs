//! Selection of the outbound mail relay.

use folio_models::Sensitive;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Raw mail relay settings as supplied by the operator (usually through the
/// `EMAIL_SERVICE` and `SMTP_*` environment variables).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MailSettings {
    pub service: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
    pub secure: Option<String>,
    pub user: Option<String>,
    pub password: Option<Sensitive<String>>,
}

/// Connection settings for one of the supported relay kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportConfig {
    /// SendGrid's SMTP relay.
    SendGrid { credentials: SmtpCredentials },
    /// Gmail's SMTP relay.
    Gmail { credentials: SmtpCredentials },
    /// Any other SMTP relay.
    Smtp {
        host: String,
        port: u16,
        /// Use implicit TLS instead of (opportunistic) STARTTLS.
        secure: bool,
        credentials: SmtpCredentials,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpCredentials {
    pub user: String,
    pub password: Sensitive<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Missing mail setting: {0}")]
    Missing(&'static str),
    #[error("Invalid SMTP port: {0:?}")]
    InvalidPort(String),
}

impl TransportConfig {
    /// Derive the transport configuration from the raw settings.
    ///
    /// A known `service` name (`sendgrid`, `gmail`, case-insensitive) only
    /// needs credentials. Everything else is treated as a generic SMTP relay
    /// which additionally needs a host.
    pub fn from_settings(settings: &MailSettings) -> Result<Self, ConfigurationError> {
        let service = settings
            .service
            .as_deref()
            .map(str::trim)
            .map(str::to_ascii_lowercase);

        match service.as_deref() {
            Some("sendgrid") => Ok(Self::SendGrid {
                credentials: credentials(settings)?,
            }),
            Some("gmail") => Ok(Self::Gmail {
                credentials: credentials(settings)?,
            }),
            _ => {
                let host = non_empty(settings.host.as_deref())
                    .ok_or(ConfigurationError::Missing("SMTP_HOST"))?;
                let credentials = credentials(settings)?;
                let port = match non_empty(settings.port.as_deref()) {
                    Some(port) => port
                        .trim()
                        .parse()
                        .map_err(|_| ConfigurationError::InvalidPort(port.into()))?,
                    None => DEFAULT_SMTP_PORT,
                };
                let secure = settings.secure.as_deref() == Some("true");

                Ok(Self::Smtp {
                    host: host.into(),
                    port,
                    secure,
                    credentials,
                })
            }
        }
    }
}

fn credentials(settings: &MailSettings) -> Result<SmtpCredentials, ConfigurationError> {
    let user =
        non_empty(settings.user.as_deref()).ok_or(ConfigurationError::Missing("SMTP_USER"))?;
    let password = settings
        .password
        .as_ref()
        .filter(|password| !password.is_empty())
        .ok_or(ConfigurationError::Missing("SMTP_PASSWORD"))?;

    Ok(SmtpCredentials {
        user: user.into(),
        password: password.clone(),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use folio_utils::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;

    fn settings() -> MailSettings {
        MailSettings {
            service: None,
            host: Some("smtp.example.com".into()),
            port: None,
            secure: None,
            user: Some("mailer".into()),
            password: Some("secret".to_owned().into()),
        }
    }

    fn credentials() -> SmtpCredentials {
        SmtpCredentials {
            user: "mailer".into(),
            password: "secret".to_owned().into(),
        }
    }

    #[test]
    fn generic_smtp_defaults() {
        // Act
        let result = TransportConfig::from_settings(&settings());

        // Assert
        assert_eq!(
            result.unwrap(),
            TransportConfig::Smtp {
                host: "smtp.example.com".into(),
                port: 587,
                secure: false,
                credentials: credentials(),
            }
        );
    }

    #[test]
    fn generic_smtp_port_and_secure() {
        // Arrange
        let input = MailSettings {
            port: Some("465".into()),
            secure: Some("true".into()),
            ..settings()
        };

        // Act
        let result = TransportConfig::from_settings(&input);

        // Assert
        assert_eq!(
            result.unwrap(),
            TransportConfig::Smtp {
                host: "smtp.example.com".into(),
                port: 465,
                secure: true,
                credentials: credentials(),
            }
        );
    }

    #[test]
    fn secure_requires_literal_true() {
        for secure in ["TRUE", "1", "yes", "false", ""] {
            let input = MailSettings {
                secure: Some(secure.into()),
                ..settings()
            };
            assert_matches!(
                TransportConfig::from_settings(&input),
                Ok(TransportConfig::Smtp { secure: false, .. })
            );
        }
    }

    #[test]
    fn known_services() {
        for service in ["sendgrid", "SendGrid", " SENDGRID "] {
            let input = MailSettings {
                service: Some(service.into()),
                host: None,
                ..settings()
            };
            assert_eq!(
                TransportConfig::from_settings(&input).unwrap(),
                TransportConfig::SendGrid {
                    credentials: credentials()
                }
            );
        }

        let input = MailSettings {
            service: Some("Gmail".into()),
            host: None,
            ..settings()
        };
        assert_eq!(
            TransportConfig::from_settings(&input).unwrap(),
            TransportConfig::Gmail {
                credentials: credentials()
            }
        );
    }

    #[test]
    fn unknown_service_falls_back_to_smtp() {
        let input = MailSettings {
            service: Some("mailgun".into()),
            ..settings()
        };
        assert_matches!(
            TransportConfig::from_settings(&input),
            Ok(TransportConfig::Smtp { .. })
        );
    }

    #[test]
    fn missing_host() {
        let input = MailSettings {
            host: None,
            ..settings()
        };
        assert_eq!(
            TransportConfig::from_settings(&input),
            Err(ConfigurationError::Missing("SMTP_HOST"))
        );
    }

    #[test]
    fn missing_credentials() {
        let input = MailSettings {
            user: Some(String::new()),
            ..settings()
        };
        assert_eq!(
            TransportConfig::from_settings(&input),
            Err(ConfigurationError::Missing("SMTP_USER"))
        );

        let input = MailSettings {
            service: Some("gmail".into()),
            password: None,
            ..settings()
        };
        assert_eq!(
            TransportConfig::from_settings(&input),
            Err(ConfigurationError::Missing("SMTP_PASSWORD"))
        );
    }

    #[test]
    fn invalid_port() {
        let input = MailSettings {
            port: Some("smtp".into()),
            ..settings()
        };
        assert_eq!(
            TransportConfig::from_settings(&input),
            Err(ConfigurationError::InvalidPort("smtp".into()))
        );
    }
}
