use std::{
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
};

use anyhow::Context;
use config::{File, FileFormat};
pub use duration::Duration;
use folio_models::{contact::SocialLink, email_address::EmailAddressWithName, Sensitive};
use serde::Deserialize;
use url::Url;

mod duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Colon separated list of config files to load on top of the defaults.
pub const CONFIG_PATHS_VAR: &str = "FOLIO_CONFIG";

/// Environment variables overriding single config keys.
pub const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("GROQ_API_KEY", "llm.api_key"),
    ("EMAIL_SERVICE", "smtp.service"),
    ("SMTP_HOST", "smtp.host"),
    ("SMTP_PORT", "smtp.port"),
    ("SMTP_SECURE", "smtp.secure"),
    ("SMTP_USER", "smtp.user"),
    ("SMTP_PASSWORD", "smtp.password"),
];

/// Load the configuration using the process environment.
pub fn load() -> anyhow::Result<Config> {
    let env = |key: &str| std::env::var(key).ok();

    let mut paths = vec![PathBuf::from(DEFAULT_CONFIG_PATH)];
    if let Some(extra) = env(CONFIG_PATHS_VAR) {
        paths.extend(
            extra
                .split(':')
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        );
    }

    load_with_env(&paths, env)
}

/// Load the given config files in order, then apply the [`ENV_OVERRIDES`]
/// looked up through `env`. Empty variables are ignored.
pub fn load_with_env(
    paths: &[impl AsRef<Path>],
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Config> {
    let builder = paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?;

    ENV_OVERRIDES
        .iter()
        .try_fold(builder, |builder, &(var, key)| {
            let value = env(var).filter(|value| !value.is_empty());
            builder.set_override_option(key, value)
        })?
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub contact: ContactConfig,
    pub smtp: SmtpConfig,
    pub llm: LlmConfig,
    pub sentry: Option<SentryConfig>,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub address: SocketAddr,
    pub real_ip: Option<HttpRealIpConfig>,
    /// Origins allowed to submit the contact form from a browser.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct HttpRealIpConfig {
    pub header: String,
    pub set_from: IpAddr,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    /// Recipient of the notifications.
    pub owner: EmailAddressWithName,
    pub owner_name: String,
    /// Sender of all emails.
    pub from: EmailAddressWithName,
    pub cta_url: Url,
    #[serde(default)]
    pub socials: Vec<SocialLink>,
}

#[derive(Debug, Deserialize)]
pub struct SmtpConfig {
    pub service: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
    pub secure: Option<String>,
    pub user: Option<String>,
    pub password: Option<Sensitive<String>>,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
pub struct LlmConfig {
    pub endpoint: Url,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub max_retries: u32,
    /// Replies are drafted by the model only if an API key is set.
    pub api_key: Option<Sensitive<String>>,
}

#[derive(Debug, Deserialize)]
pub struct SentryConfig {
    pub dsn: Url,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn load_default_config() {
        // Act
        let config = load_with_env(&[DEFAULT_CONFIG_PATH], |_| None).unwrap();

        // Assert
        assert_eq!(config.smtp.port, None);
        assert_eq!(config.smtp.host, None);
        assert_eq!(config.llm.api_key, None);
        assert_eq!(*config.smtp.timeout, std::time::Duration::from_secs(30));
        assert_eq!(*config.llm.timeout, std::time::Duration::from_secs(120));
        assert!(config.sentry.is_none());
    }

    #[test]
    fn env_overrides() {
        // Arrange
        let env = HashMap::from([
            ("GROQ_API_KEY", "gsk_test"),
            ("EMAIL_SERVICE", "SendGrid"),
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "2525"),
            ("SMTP_SECURE", "true"),
            ("SMTP_USER", "mailer"),
            ("SMTP_PASSWORD", "secret"),
        ]);

        // Act
        let config = load_with_env(&[DEFAULT_CONFIG_PATH], |key| {
            env.get(key).map(|&value| value.to_owned())
        })
        .unwrap();

        // Assert
        assert_eq!(config.llm.api_key, Some("gsk_test".to_owned().into()));
        assert_eq!(config.smtp.service.as_deref(), Some("SendGrid"));
        assert_eq!(config.smtp.host.as_deref(), Some("smtp.example.com"));
        assert_eq!(config.smtp.port.as_deref(), Some("2525"));
        assert_eq!(config.smtp.secure.as_deref(), Some("true"));
        assert_eq!(config.smtp.user.as_deref(), Some("mailer"));
        assert_eq!(config.smtp.password, Some("secret".to_owned().into()));
    }

    #[test]
    fn empty_env_values_are_ignored() {
        // Act
        let config = load_with_env(&[DEFAULT_CONFIG_PATH], |key| {
            (key == "GROQ_API_KEY").then(String::new)
        })
        .unwrap();

        // Assert
        assert_eq!(config.llm.api_key, None);
    }
}
