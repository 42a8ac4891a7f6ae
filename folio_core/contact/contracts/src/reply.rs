use std::future::Future;

use folio_models::contact::{ComposedReply, ContactSubmission};

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactReplyComposerService: Send + Sync + 'static {
    /// Draft the reply sent to the visitor.
    ///
    /// Never fails: if the language model is disabled or does not produce a
    /// usable reply, a static reply is returned instead.
    fn compose(&self, submission: &ContactSubmission) -> impl Future<Output = ComposedReply> + Send;
}

#[cfg(feature = "mock")]
impl MockContactReplyComposerService {
    pub fn with_compose(mut self, submission: ContactSubmission, result: ComposedReply) -> Self {
        self.expect_compose()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
