use std::sync::Arc;

use folio_core_contact_contracts::reply::MockContactReplyComposerService;
use folio_demo::{CTA_URL, OWNER, OWNER_NAME, SOCIALS};
use folio_email_contracts::{
    transport::{MailSettings, SmtpCredentials, TransportConfig},
    MockEmailService,
};
use folio_models::contact::{ComposedReply, ContactSubmission, ReplySource};
use folio_shared_contracts::time::MockTimeService;
use folio_templates_contracts::{
    ContactConfirmationTemplate, ContactNotificationTemplate, MockTemplateService,
};

use crate::{ContactFeatureConfig, ContactFeatureServiceImpl};


type Sut = ContactFeatureServiceImpl<
    MockTimeService,
    MockEmailService,
    MockTemplateService,
    MockContactReplyComposerService,
>;

impl Default for Sut {
    fn default() -> Self {
        Self {
            time: MockTimeService::new(),
            email: MockEmailService::new(),
            template: MockTemplateService::new(),
            reply_composer: MockContactReplyComposerService::new(),
            config: Arc::new(config()),
        }
    }
}

fn config() -> ContactFeatureConfig {
    ContactFeatureConfig {
        mail: MailSettings {
            host: Some("smtp.example.com".into()),
            port: Some("587".into()),
            user: Some("mailer".into()),
            password: Some("secret".to_owned().into()),
            ..Default::default()
        },
        owner: OWNER.clone(),
        owner_name: OWNER_NAME.into(),
        cta_url: CTA_URL.into(),
        socials: SOCIALS.clone(),
    }
}

fn transport_config() -> TransportConfig {
    TransportConfig::Smtp {
        host: "smtp.example.com".into(),
        port: 587,
        secure: false,
        credentials: SmtpCredentials {
            user: "mailer".into(),
            password: "secret".to_owned().into(),
        },
    }
}

fn notification(
    submission: &ContactSubmission,
    reply: &ComposedReply,
) -> ContactNotificationTemplate {
    ContactNotificationTemplate {
        name: (*submission.name).clone(),
        email: (*submission.email).clone(),
        subject: (*submission.subject).clone(),
        message: (*submission.message).clone(),
        reply: Some(reply.reply.clone()),
        ai_generated: reply.source == ReplySource::Ai,
        year: 2024,
    }
}

fn confirmation(reply: &ComposedReply) -> ContactConfirmationTemplate {
    ContactConfirmationTemplate {
        greeting: reply.reply.greeting.clone(),
        response: reply.reply.response.clone(),
        closing: reply.reply.closing.clone(),
        owner_name: OWNER_NAME.into(),
        cta_url: CTA_URL.into(),
        socials: SOCIALS.clone(),
        year: 2024,
    }
}
