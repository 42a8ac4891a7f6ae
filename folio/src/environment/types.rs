use folio_core_contact_impl::{reply::ContactReplyComposerServiceImpl, ContactFeatureServiceImpl};
use folio_email_impl::EmailServiceImpl;
use folio_extern_impl::chat::ChatCompletionApiServiceImpl;
use folio_shared_impl::time::TimeServiceImpl;
use folio_templates_impl::TemplateServiceImpl;

// API
pub type RestServer = folio_api_rest::RestServer<ContactFeature>;

// Core
pub type ContactFeature =
    ContactFeatureServiceImpl<Time, Email, Template, ContactReplyComposer>;
pub type ContactReplyComposer = ContactReplyComposerServiceImpl<ChatCompletionApi>;

// Extern
pub type ChatCompletionApi = ChatCompletionApiServiceImpl;

// Email
pub type Email = EmailServiceImpl;

// Shared
pub type Time = TimeServiceImpl;

// Templates
pub type Template = TemplateServiceImpl;
