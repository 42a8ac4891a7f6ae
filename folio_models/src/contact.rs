use nutype::nutype;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A message submitted through the contact form.
///
/// All four fields are guaranteed to be non-empty. The email address is taken
/// as submitted; it is only parsed when a reply is actually sent to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: ContactName,
    pub email: ContactEmail,
    pub subject: ContactSubject,
    pub message: ContactMessage,
}

#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactName(String);

#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactEmail(String);

#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactSubject(String);

#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessage(String);

/// The raw, unvalidated fields of a contact form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmissionFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(ContactField),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Subject,
    Message,
}

impl std::fmt::Display for ContactField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        })
    }
}

impl ContactSubmission {
    /// Check that every field is present and non-empty.
    pub fn validate(fields: ContactSubmissionFields) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required(fields.name, ContactField::Name)?,
            email: required(fields.email, ContactField::Email)?,
            subject: required(fields.subject, ContactField::Subject)?,
            message: required(fields.message, ContactField::Message)?,
        })
    }
}

fn required<T: TryFrom<String>>(
    value: Option<String>,
    field: ContactField,
) -> Result<T, ValidationError> {
    value
        .and_then(|value| T::try_from(value).ok())
        .ok_or(ValidationError::MissingField(field))
}

/// Reply drafted for a contact submission, shown to the visitor and echoed to
/// the site owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftedReply {
    pub greeting: String,
    pub response: String,
    #[serde(default)]
    pub closing: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    /// Generated by the language model.
    Ai,
    /// The static template, used when the language model is disabled or failed.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedReply {
    pub source: ReplySource,
    pub reply: DraftedReply,
}

/// A link to one of the site owner's profiles, shown below replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
}
