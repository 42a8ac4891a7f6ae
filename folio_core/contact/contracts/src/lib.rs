use std::future::Future;

use folio_email_contracts::{transport::ConfigurationError, EmailErrorKind};
use folio_models::contact::ContactSubmission;
use thiserror::Error;

pub mod reply;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Handle a validated contact form submission.
    ///
    /// Verifies the mail transport, drafts a reply and sends a notification to
    /// the site owner followed by a confirmation to the visitor.
    fn submit(
        &self,
        submission: ContactSubmission,
    ) -> impl Future<Output = Result<(), ContactSubmitError>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactSubmitError {
    #[error("The mail transport is not configured: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Failed to verify the mail transport: {0}")]
    Transport(EmailErrorKind),
    #[error("Failed to send the {email}: {kind}")]
    Dispatch {
        email: DispatchedEmail,
        kind: EmailErrorKind,
    },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The emails sent for every submission, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchedEmail {
    /// The notification to the site owner.
    Notification,
    /// The confirmation to the visitor.
    Confirmation,
}

impl std::fmt::Display for DispatchedEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Notification => "owner notification",
            Self::Confirmation => "visitor confirmation",
        })
    }
}

#[cfg(feature = "mock")]
impl MockContactFeatureService {
    pub fn with_submit(
        mut self,
        submission: ContactSubmission,
        result: Result<(), ContactSubmitError>,
    ) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
