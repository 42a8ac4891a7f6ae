use std::sync::Arc;

use folio_api_rest::{RestServerConfig, RestServerRealIpConfig};
use folio_config::{Config, SmtpConfig};
use folio_core_contact_impl::{reply::ContactReplyComposerConfig, ContactFeatureConfig};
use folio_di::provider;
use folio_email_contracts::transport::MailSettings;
use folio_email_impl::EmailServiceConfig;
use folio_extern_impl::chat::ChatCompletionApiServiceConfig;

pub mod types;

provider! {
    /// The default provider, capable of providing all the dependencies
    pub Provider {
        // API
        rest_server_config: Arc<RestServerConfig>,

        // Extern
        chat_completion_api_service_config: Arc<ChatCompletionApiServiceConfig>,

        // Email
        email_service_config: EmailServiceConfig,

        // Core
        contact_feature_config: Arc<ContactFeatureConfig>,
        contact_reply_composer_config: Arc<ContactReplyComposerConfig>,
    }
}

impl Provider {
    pub fn new(config: &Config) -> Self {
        // API
        let rest_server_config = RestServerConfig {
            addr: config.http.address,
            real_ip_config: config.http.real_ip.as_ref().map(|real_ip_config| {
                Arc::new(RestServerRealIpConfig {
                    header: real_ip_config.header.clone(),
                    set_from: real_ip_config.set_from,
                })
            }),
            allowed_origins: config.http.allowed_origins.clone(),
        };

        // Extern
        let chat_completion_api_service_config = ChatCompletionApiServiceConfig {
            endpoint: config.llm.endpoint.clone(),
            model: config.llm.model.clone(),
            api_key: config.llm.api_key.clone(),
            timeout: config.llm.timeout.into(),
            max_retries: config.llm.max_retries,
        };

        // Email
        let email_service_config = EmailServiceConfig {
            from: config.contact.from.clone(),
            timeout: config.smtp.timeout.into(),
        };

        // Core
        let contact_feature_config = ContactFeatureConfig {
            mail: mail_settings(&config.smtp),
            owner: config.contact.owner.clone(),
            owner_name: config.contact.owner_name.clone(),
            cta_url: config.contact.cta_url.to_string(),
            socials: config.contact.socials.clone(),
        };

        let contact_reply_composer_config = ContactReplyComposerConfig {
            owner_name: config.contact.owner_name.clone(),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
        };

        Self {
            _cache: Default::default(),
            rest_server_config: rest_server_config.into(),
            chat_completion_api_service_config: chat_completion_api_service_config.into(),
            email_service_config,
            contact_feature_config: contact_feature_config.into(),
            contact_reply_composer_config: contact_reply_composer_config.into(),
        }
    }
}

/// The raw mail relay settings, as taken from the environment.
pub fn mail_settings(config: &SmtpConfig) -> MailSettings {
    MailSettings {
        service: config.service.clone(),
        host: config.host.clone(),
        port: config.port.clone(),
        secure: config.secure.clone(),
        user: config.user.clone(),
        password: config.password.clone(),
    }
}
