use std::sync::Arc;

use folio_core_contact_contracts::{
    reply::ContactReplyComposerService, ContactFeatureService, ContactSubmitError,
    DispatchedEmail,
};
use folio_di::Build;
use folio_email_contracts::{
    transport::{MailSettings, TransportConfig},
    ContentType, Email, EmailError, EmailErrorKind, EmailService, EmailTransport,
};
use folio_models::{
    contact::{ComposedReply, ContactSubmission, ReplySource, SocialLink},
    email_address::EmailAddressWithName,
};
use folio_shared_contracts::time::TimeService;
use folio_templates_contracts::{
    ContactConfirmationTemplate, ContactNotificationTemplate, TemplateService,
};
use folio_utils::trace_instrument;
use tracing::{error, info};

pub mod reply;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Build)]
pub struct ContactFeatureServiceImpl<Time, Email, Template, ReplyComposer> {
    time: Time,
    email: Email,
    template: Template,
    reply_composer: ReplyComposer,
    config: Arc<ContactFeatureConfig>,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    /// Mail relay settings, turned into a transport for every submission.
    pub mail: MailSettings,
    /// Recipient of the notifications.
    pub owner: EmailAddressWithName,
    pub owner_name: String,
    pub cta_url: String,
    pub socials: Vec<SocialLink>,
}

impl<Time, EmailS, Template, ReplyComposer> ContactFeatureService
    for ContactFeatureServiceImpl<Time, EmailS, Template, ReplyComposer>
where
    Time: TimeService,
    EmailS: EmailService,
    Template: TemplateService,
    ReplyComposer: ContactReplyComposerService,
{
    #[trace_instrument(skip(self))]
    async fn submit(&self, submission: ContactSubmission) -> Result<(), ContactSubmitError> {
        let transport_config = TransportConfig::from_settings(&self.config.mail).inspect_err(
            |err| error!("Mail transport is not configured: {err}"),
        )?;

        let transport = self
            .email
            .connect(&transport_config)
            .await
            .map_err(|err| {
                error!(kind = ?err.kind, "Failed to verify mail transport: {:#}", err.source);
                ContactSubmitError::Transport(err.kind)
            })?;

        let ComposedReply { source, reply } = self.reply_composer.compose(&submission).await;
        info!(?source, "Composed reply");

        let year = self.time.current_year();

        let notification = self.template.render(&ContactNotificationTemplate {
            name: (*submission.name).clone(),
            email: (*submission.email).clone(),
            subject: (*submission.subject).clone(),
            message: (*submission.message).clone(),
            reply: Some(reply.clone()),
            ai_generated: source == ReplySource::Ai,
            year,
        })?;

        let confirmation = self.template.render(&ContactConfirmationTemplate {
            greeting: reply.greeting,
            response: reply.response,
            closing: reply.closing,
            owner_name: self.config.owner_name.clone(),
            cta_url: self.config.cta_url.clone(),
            socials: self.config.socials.clone(),
            year,
        })?;

        let visitor = submission.email.parse::<EmailAddressWithName>().ok();

        transport
            .send(Email {
                recipient: self.config.owner.clone(),
                subject: format!("[Contact Form] {}", *submission.subject),
                body: notification,
                content_type: ContentType::Html,
                reply_to: visitor.clone(),
            })
            .await
            .map_err(|err| dispatch_error(DispatchedEmail::Notification, err))?;
        info!("Sent notification to the site owner");

        let Some(visitor) = visitor else {
            error!(
                email = %submission.email.as_str(),
                "Cannot send confirmation to invalid address"
            );
            return Err(ContactSubmitError::Dispatch {
                email: DispatchedEmail::Confirmation,
                kind: EmailErrorKind::Unknown,
            });
        };

        transport
            .send(Email {
                recipient: visitor,
                subject: format!("Re: {}", *submission.subject),
                body: confirmation,
                content_type: ContentType::Html,
                reply_to: None,
            })
            .await
            .map_err(|err| dispatch_error(DispatchedEmail::Confirmation, err))?;
        info!("Sent confirmation to the visitor");

        Ok(())
    }
}

fn dispatch_error(email: DispatchedEmail, err: EmailError) -> ContactSubmitError {
    error!(kind = ?err.kind, "Failed to send the {email}: {:#}", err.source);
    ContactSubmitError::Dispatch {
        email,
        kind: err.kind,
    }
}
